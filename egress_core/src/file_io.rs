//! # File I/O Module
//!
//! Whole-document reads and writes for project files and report exports:
//! - **Atomic saves**: Write to .tmp, sync, rename so a reader never sees a
//!   partial file
//! - **Version validation**: Reject files from an incompatible schema
//! - **Structure validation**: Reject files whose building ids collide
//!
//! ## File Format
//!
//! Projects are pretty-printed JSON:
//!
//! ```json
//! {
//!   "name": "Harbor Point",
//!   "buildings": [{ "id": "...", "name": "Building 1", "inputs": {}, "results": null }],
//!   "created_date": "2026-10-19T14:03:00Z",
//!   "version": "2.0"
//! }
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use egress_core::file_io::{save_project, load_project};
//! use egress_core::project::Project;
//! use std::path::Path;
//!
//! let project = Project::new("Harbor Point");
//! save_project(&project, Path::new("harbor_point.json"))?;
//!
//! let loaded = load_project(Path::new("harbor_point.json"))?;
//! assert_eq!(loaded.name, "Harbor Point");
//! # Ok::<(), egress_core::errors::CalcError>(())
//! ```

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::errors::{CalcError, CalcResult};
use crate::project::{Project, SCHEMA_VERSION};

/// Serialize a project to pretty JSON.
pub fn project_to_json(project: &Project) -> CalcResult<String> {
    serde_json::to_string_pretty(project).map_err(|e| CalcError::SerializationError {
        reason: e.to_string(),
    })
}

/// Parse and validate a project document.
///
/// # Returns
///
/// * `Ok(Project)` - Parsed project
/// * `Err(CalcError::SerializationError)` - Invalid JSON or wrong structure
/// * `Err(CalcError::VersionMismatch)` - Incompatible schema version
pub fn parse_project(json: &str) -> CalcResult<Project> {
    let project: Project = serde_json::from_str(json).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid project file: {}", e),
    })?;

    validate_version(&project.version)?;
    validate_structure(&project)?;

    Ok(project)
}

/// Get the temp file path used during an atomic write
fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp_path = path.to_path_buf();
    let extension = tmp_path
        .extension()
        .map(|e| format!("{}.tmp", e.to_string_lossy()))
        .unwrap_or_else(|| "tmp".to_string());
    tmp_path.set_extension(extension);
    tmp_path
}

/// Write bytes to `path` with atomic write semantics.
///
/// 1. Write to a temporary file (.tmp)
/// 2. Sync to disk (fsync)
/// 3. Rename over the destination (atomic on most filesystems)
fn write_atomic(path: &Path, contents: &[u8]) -> CalcResult<()> {
    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(contents).map_err(|e| {
        CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        // Clean up temp file if rename fails
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}

/// Save a project to a file with atomic write semantics.
///
/// # Example
///
/// ```rust,no_run
/// use egress_core::file_io::save_project;
/// use egress_core::project::Project;
/// use std::path::Path;
///
/// let project = Project::new("Depot");
/// save_project(&project, Path::new("depot.json"))?;
/// # Ok::<(), egress_core::errors::CalcError>(())
/// ```
pub fn save_project(project: &Project, path: &Path) -> CalcResult<()> {
    let json = project_to_json(project)?;
    write_atomic(path, json.as_bytes())?;

    tracing::info!(
        path = %path.display(),
        buildings = project.building_count(),
        "project saved"
    );
    Ok(())
}

/// Load a project from a file.
///
/// # Returns
///
/// * `Ok(Project)` - Successfully loaded project
/// * `Err(CalcError::VersionMismatch)` - File version is incompatible
/// * `Err(CalcError::SerializationError)` - Invalid JSON
/// * `Err(CalcError::FileError)` - I/O error
pub fn load_project(path: &Path) -> CalcResult<Project> {
    let mut file = File::open(path).map_err(|e| {
        CalcError::file_error("open", path.display().to_string(), e.to_string())
    })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        CalcError::file_error("read", path.display().to_string(), e.to_string())
    })?;

    let project = parse_project(&contents).map_err(|e| match e {
        CalcError::SerializationError { reason } => CalcError::SerializationError {
            reason: format!("{} ({})", reason, path.display()),
        },
        other => other,
    })?;

    tracing::info!(
        path = %path.display(),
        name = %project.name,
        buildings = project.building_count(),
        "project loaded"
    );
    Ok(project)
}

/// Save a plain-text report with atomic write semantics.
pub fn save_report(text: &str, path: &Path) -> CalcResult<()> {
    write_atomic(path, text.as_bytes())?;
    tracing::info!(path = %path.display(), bytes = text.len(), "report saved");
    Ok(())
}

/// Default project export name: `egress_project_YYYYMMDD_HHMMSS.json`
pub fn default_project_filename(now: DateTime<Utc>) -> String {
    format!("egress_project_{}.json", now.format("%Y%m%d_%H%M%S"))
}

/// Default report export name: `egress_summary_YYYYMMDD_HHMMSS.txt`
pub fn default_summary_filename(now: DateTime<Utc>) -> String {
    format!("egress_summary_{}.txt", now.format("%Y%m%d_%H%M%S"))
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file_parts = file_version
        .trim()
        .split('.')
        .map(|p| p.parse::<u32>())
        .collect::<Result<Vec<u32>, _>>()
        .map_err(|_| mismatch())?;
    let current_major = SCHEMA_VERSION
        .split('.')
        .next()
        .and_then(|p| p.parse::<u32>().ok())
        .ok_or_else(mismatch)?;

    // Major version must match
    if file_parts.first() != Some(&current_major) {
        return Err(mismatch());
    }

    Ok(())
}

/// Reject documents whose buildings cannot be addressed unambiguously.
fn validate_structure(project: &Project) -> CalcResult<()> {
    let mut seen = HashSet::with_capacity(project.buildings.len());
    for building in &project.buildings {
        if !seen.insert(building.id) {
            return Err(CalcError::SerializationError {
                reason: format!("Duplicate building id {}", building.id),
            });
        }
    }
    Ok(())
}
