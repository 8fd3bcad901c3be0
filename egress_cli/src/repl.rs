//! Line-oriented interactive session.
//!
//! One command per line; each command maps to one `Session` handler. Errors
//! from the engine are printed and the loop continues.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use chrono::Utc;

use egress_core::calculations::EgressInput;
use egress_core::errors::CalcError;
use egress_core::file_io::{default_project_filename, default_summary_filename, save_report};
use egress_core::tables::{find_state, CodeVersion, Occupancy};
use egress_core::Session;

use crate::display;

const HELP: &str = "\
Commands:
  add                 add a building and select it
  remove [n]          remove building n (default: current)
  next | prev         move between buildings
  select <n>          select building n
  name <text>         set the project name
  units               toggle imperial/metric
  advanced on|off     show travel distance and exit-door inputs
  calc                enter inputs and calculate the current building
  show                show the current building's result
  report [path]       write the plain-text summary
  save [path]         save the project as JSON
  load <path>         load a project file
  history             list recent calculations
  clear-history       clear the calculation history
  new                 start a new project
  help                this list
  quit                exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add,
    Remove(Option<usize>),
    Next,
    Prev,
    Select(usize),
    Name(String),
    Units,
    Advanced(bool),
    Calc,
    Show,
    Report(Option<PathBuf>),
    Save(Option<PathBuf>),
    Load(PathBuf),
    History,
    ClearHistory,
    New,
    Help,
    Quit,
}

/// Parse a 1-based building number into an index
fn parse_building_number(arg: &str) -> Result<usize, String> {
    match arg.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(format!("'{}' is not a building number", arg)),
    }
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    let arg = (!rest.is_empty()).then_some(rest);

    match (verb.to_lowercase().as_str(), arg) {
        ("add", None) => Ok(Command::Add),
        ("remove", None) => Ok(Command::Remove(None)),
        ("remove", Some(n)) => parse_building_number(n).map(|i| Command::Remove(Some(i))),
        ("next", None) => Ok(Command::Next),
        ("prev", None) => Ok(Command::Prev),
        ("select", Some(n)) => parse_building_number(n).map(Command::Select),
        ("name", name) => Ok(Command::Name(name.unwrap_or_default().to_string())),
        ("units", None) => Ok(Command::Units),
        ("advanced", Some("on")) => Ok(Command::Advanced(true)),
        ("advanced", Some("off")) => Ok(Command::Advanced(false)),
        ("calc", None) => Ok(Command::Calc),
        ("show", None) => Ok(Command::Show),
        ("report", path) => Ok(Command::Report(path.map(PathBuf::from))),
        ("save", path) => Ok(Command::Save(path.map(PathBuf::from))),
        ("load", Some(path)) => Ok(Command::Load(PathBuf::from(path))),
        ("history", None) => Ok(Command::History),
        ("clear-history", None) => Ok(Command::ClearHistory),
        ("new", None) => Ok(Command::New),
        ("help", _) | ("?", _) => Ok(Command::Help),
        ("quit", None) | ("exit", None) => Ok(Command::Quit),
        _ => Err(format!("Unrecognized command '{}' - type 'help'", line)),
    }
}

pub struct Repl<R, W> {
    session: Session,
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Repl<R, W> {
    pub fn new(session: Session, input: R, out: W) -> Self {
        Repl { session, input, out }
    }

    #[cfg(test)]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.out
    }

    /// Read a line; `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Prompt for a value, returning the default on an empty answer.
    fn prompt(&mut self, label: &str, default: Option<String>) -> io::Result<Option<String>> {
        match &default {
            Some(d) => write!(self.out, "{} [{}]: ", label, d)?,
            None => write!(self.out, "{}: ", label)?,
        }
        self.out.flush()?;

        Ok(match self.read_line()? {
            Some(answer) if !answer.is_empty() => Some(answer),
            _ => default,
        })
    }

    fn report_error(&mut self, error: &CalcError) -> io::Result<()> {
        writeln!(self.out, "Error: {}", error)
    }

    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.out, "Egress & Occupant Load Calculator")?;
        writeln!(self.out, "=================================")?;
        writeln!(self.out, "Type 'help' for commands.")?;

        loop {
            display::write_status(&mut self.out, &self.session)?;
            write!(self.out, "> ")?;
            self.out.flush()?;

            let Some(line) = self.read_line()? else {
                break;
            };
            if line.is_empty() {
                continue;
            }

            match parse_command(&line) {
                Ok(Command::Quit) => break,
                Ok(command) => self.execute(command)?,
                Err(message) => writeln!(self.out, "{}", message)?,
            }
        }

        self.out.flush()
    }

    fn execute(&mut self, command: Command) -> io::Result<()> {
        match command {
            Command::Add => {
                let index = self.session.add_building();
                writeln!(self.out, "Added Building {}.", index + 1)?;
            }
            Command::Remove(index) => {
                let index = index.unwrap_or_else(|| self.session.current_index());
                match self.session.remove_building(index) {
                    Ok(building) => writeln!(self.out, "Removed {}.", building.name)?,
                    Err(e) => self.report_error(&e)?,
                }
            }
            Command::Next => {
                self.session.next_building();
            }
            Command::Prev => {
                self.session.previous_building();
            }
            Command::Select(index) => {
                if let Err(e) = self.session.select_building(index) {
                    self.report_error(&e)?;
                }
            }
            Command::Name(name) => self.session.set_project_name(name),
            Command::Units => {
                let units = self.session.toggle_units();
                writeln!(self.out, "Units: {}", units)?;
            }
            Command::Advanced(show) => self.session.set_show_advanced(show),
            Command::Calc => self.calculate()?,
            Command::Show => self.show()?,
            Command::Report(path) => self.report(path)?,
            Command::Save(path) => {
                let path = path.unwrap_or_else(|| PathBuf::from(default_project_filename(Utc::now())));
                match self.session.save_to(&path) {
                    Ok(()) => writeln!(self.out, "Saved {}.", path.display())?,
                    Err(e) => self.report_error(&e)?,
                }
            }
            Command::Load(path) => match self.session.load_from(&path) {
                Ok(project) => {
                    let name = project.display_name().to_string();
                    writeln!(self.out, "Project '{}' loaded successfully!", name)?;
                }
                Err(e) => self.report_error(&e)?,
            },
            Command::History => display::write_history(&mut self.out, self.session.history())?,
            Command::ClearHistory => {
                self.session.clear_history();
                writeln!(self.out, "History cleared.")?;
            }
            Command::New => self.session.new_project(),
            Command::Help => writeln!(self.out, "{}", HELP)?,
            Command::Quit => {}
        }
        Ok(())
    }

    fn show(&mut self) -> io::Result<()> {
        let building = match self.session.current_building() {
            Some(b) => b.clone(),
            None => return self.report_error(&CalcError::NoBuilding),
        };
        match &building.results {
            Some(result) => display::write_result(&mut self.out, &building.inputs, result),
            None => writeln!(self.out, "{} has not been calculated yet.", building.name),
        }
    }

    fn report(&mut self, path: Option<PathBuf>) -> io::Result<()> {
        let text = match self.session.export_report() {
            Ok(text) => text,
            Err(e) => return self.report_error(&e),
        };
        let path = path.unwrap_or_else(|| PathBuf::from(default_summary_filename(Utc::now())));
        match save_report(&text, &path) {
            Ok(()) => writeln!(self.out, "Wrote {}.", path.display()),
            Err(e) => self.report_error(&e),
        }
    }

    /// Prompt for every field, then calculate. Blank answers keep the
    /// building's previous value; a field with no value is left missing.
    fn calculate(&mut self) -> io::Result<()> {
        if self.session.current_building().is_none() {
            return self.report_error(&CalcError::NoBuilding);
        }
        let previous = self
            .session
            .current_building()
            .map(|b| b.inputs.clone())
            .unwrap_or_default();
        let units = self.session.units();
        let mut input = EgressInput::default();

        input.jurisdiction = self
            .prompt("State/Jurisdiction", previous.jurisdiction.clone())?
            .map(|j| find_state(&j).map(str::to_string).unwrap_or(j));

        let versions: Vec<&str> = CodeVersion::ALL.iter().map(|v| v.code()).collect();
        let answer = self.prompt(
            &format!("IBC Code Version ({})", versions.join("/")),
            previous.code_version.map(|v| v.code().to_string()),
        )?;
        input.code_version = match answer.as_deref().map(CodeVersion::from_str_flexible).transpose() {
            Ok(v) => v,
            Err(e) => return self.report_error(&e),
        };

        for (i, occupancy) in Occupancy::ALL.iter().enumerate() {
            writeln!(self.out, "  {}. {} ({} area)", i + 1, occupancy, occupancy.area_type())?;
        }
        let answer = self.prompt(
            "Occupancy Classification (number or name)",
            previous.occupancy.map(|o| o.display_name().to_string()),
        )?;
        input.occupancy = match answer.as_deref().map(parse_occupancy).transpose() {
            Ok(o) => o,
            Err(e) => return self.report_error(&e),
        };
        if let Some(occupancy) = input.occupancy {
            writeln!(self.out, "  Note: {}", occupancy.area_type().hint())?;
        }

        let answer = self.prompt(
            &format!("Floor Area ({})", units.area_label()),
            previous.floor_area.map(|a| a.to_string()),
        )?;
        input.floor_area = match parse_number(answer.as_deref(), "floor_area") {
            Ok(a) => a,
            Err(e) => return self.report_error(&e),
        };

        let answer = self.prompt(
            "Automatic Sprinkler System (yes/no)",
            previous.sprinklered.map(|s| if s { "yes" } else { "no" }.to_string()),
        )?;
        input.sprinklered = match answer.as_deref().map(parse_yes_no).transpose() {
            Ok(s) => s,
            Err(e) => return self.report_error(&e),
        };

        if self.session.show_advanced() {
            let answer = self.prompt(
                &format!("Max Travel Distance ({})", units.distance_label()),
                previous.travel_distance.map(|d| d.to_string()),
            )?;
            input.travel_distance = match parse_number(answer.as_deref(), "travel_distance") {
                Ok(d) => d,
                Err(e) => return self.report_error(&e),
            };

            let default_doors = previous
                .exit_doors
                .unwrap_or(self.session.settings().default_exit_doors);
            let answer = self.prompt("Number of Exit Doors", Some(default_doors.to_string()))?;
            input.exit_doors = match answer.as_deref().map(|a| {
                a.parse::<u32>()
                    .map_err(|_| CalcError::invalid_input("exit_doors", a, "Expected a whole number"))
            }) {
                Some(Ok(n)) => Some(n),
                Some(Err(e)) => return self.report_error(&e),
                None => None,
            };
        }

        match self.session.calculate_current(input.clone()) {
            Ok(result) => {
                writeln!(self.out, "Calculation completed successfully!")?;
                display::write_result(&mut self.out, &input, &result)
            }
            Err(e) => self.report_error(&e),
        }
    }
}

fn parse_occupancy(answer: &str) -> Result<Occupancy, CalcError> {
    match answer.parse::<usize>() {
        Ok(n) if (1..=Occupancy::ALL.len()).contains(&n) => Ok(Occupancy::ALL[n - 1]),
        _ => Occupancy::from_str_flexible(answer),
    }
}

fn parse_yes_no(answer: &str) -> Result<bool, CalcError> {
    match answer.to_lowercase().as_str() {
        "y" | "yes" | "true" => Ok(true),
        "n" | "no" | "false" => Ok(false),
        _ => Err(CalcError::invalid_input("sprinklered", answer, "Expected yes or no")),
    }
}

fn parse_number(answer: Option<&str>, field: &str) -> Result<Option<f64>, CalcError> {
    answer
        .map(|a| {
            a.replace(',', "")
                .parse::<f64>()
                .map_err(|_| CalcError::invalid_input(field, a, "Expected a number"))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use egress_core::SessionSettings;
    use std::fs;
    use std::io::Cursor;

    fn run_script(script: &str, settings: SessionSettings) -> (Session, String) {
        let mut repl = Repl::new(Session::new(settings), Cursor::new(script.to_string()), Vec::new());
        repl.run().unwrap();
        let session = repl.session().clone();
        let output = String::from_utf8(repl.into_output()).unwrap();
        (session, output)
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("add"), Ok(Command::Add));
        assert_eq!(parse_command("  REMOVE 2 "), Ok(Command::Remove(Some(1))));
        assert_eq!(parse_command("select 1"), Ok(Command::Select(0)));
        assert_eq!(parse_command("name Harbor Point"), Ok(Command::Name("Harbor Point".to_string())));
        assert_eq!(parse_command("advanced on"), Ok(Command::Advanced(true)));
        assert_eq!(parse_command("save"), Ok(Command::Save(None)));
        assert_eq!(parse_command("load p.json"), Ok(Command::Load(PathBuf::from("p.json"))));
        assert!(parse_command("select 0").is_err());
        assert!(parse_command("load").is_err());
        assert!(parse_command("fly").is_err());
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_occupancy("3").unwrap(), Occupancy::Business);
        assert_eq!(parse_occupancy("residential").unwrap(), Occupancy::Residential);
        assert!(parse_occupancy("9").is_err());
        assert_eq!(parse_yes_no("Y").unwrap(), true);
        assert!(parse_yes_no("maybe").is_err());
        assert_eq!(parse_number(Some("1,000"), "floor_area").unwrap(), Some(1000.0));
        assert_eq!(parse_number(None, "floor_area").unwrap(), None);
    }

    #[test]
    fn test_calculate_session_script() {
        let script = "name Harbor Point\nadd\ncalc\ntexas\n2021\n3\n1000\nyes\nquit\n";
        let (session, output) = run_script(script, SessionSettings::default());

        let building = session.current_building().unwrap();
        let result = building.results.as_ref().unwrap();
        assert_eq!(result.occupant_load, 7);
        assert_eq!(building.inputs.jurisdiction.as_deref(), Some("Texas"));
        assert_eq!(session.history().len(), 1);
        assert!(output.contains("Occupant Load:          7 occupants"));
    }

    #[test]
    fn test_advanced_script_uses_default_doors() {
        let script = "advanced on\nadd\ncalc\nOhio\n2018\nbusiness\n1000\nno\n150\n\nquit\n";
        let (session, _) = run_script(script, SessionSettings::default());

        let building = session.current_building().unwrap();
        assert_eq!(building.inputs.exit_doors, Some(2));
        assert_eq!(building.inputs.travel_distance, Some(150.0));
        assert_eq!(building.results.as_ref().unwrap().door_width, Some(32));
    }

    #[test]
    fn test_missing_field_reported() {
        let script = "add\ncalc\nOhio\n2021\n\n1000\nyes\nquit\n";
        let (session, output) = run_script(script, SessionSettings::default());
        assert!(output.contains("Error: Missing required field: occupancy"));
        assert!(session.current_building().unwrap().results.is_none());
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_save_and_load_script() {
        let path = std::env::temp_dir().join("egress_cli_test_project.json");
        let script = format!(
            "name Depot\nadd\nadd\nsave {}\nnew\nload {}\nquit\n",
            path.display(),
            path.display()
        );
        let (session, output) = run_script(&script, SessionSettings::default());

        assert!(fs::read_to_string(&path).unwrap().contains("\"Depot\""));
        assert_eq!(session.project().name, "Depot");
        assert_eq!(session.project().building_count(), 2);
        assert!(output.contains("Project 'Depot' loaded successfully!"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_end_of_input_exits() {
        let (session, output) = run_script("add\n", SessionSettings::default());
        assert_eq!(session.project().building_count(), 1);
        assert!(output.contains("Added Building 1."));
    }
}
