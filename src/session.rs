//! Saved sign-in session, kept as YAML between runs.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use recipebook_core::Session;

#[derive(Debug)]
pub enum SessionError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    WriteError(PathBuf, String),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::ReadError(path, e) => {
                write!(f, "Failed to read session file '{}': {}", path.display(), e)
            }
            SessionError::ParseError(path, e) => {
                write!(
                    f,
                    "Failed to parse session file '{}': {}. Run 'recipebook auth signin' again.",
                    path.display(),
                    e
                )
            }
            SessionError::WriteError(path, e) => {
                write!(f, "Failed to write session file '{}': {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for SessionError {}

/// Read the saved session, if there is one.
pub fn load(path: &Path) -> Result<Option<Session>, SessionError> {
    if !path.exists() {
        return Ok(None);
    }
    let contents =
        fs::read_to_string(path).map_err(|e| SessionError::ReadError(path.to_path_buf(), e))?;
    let session = serde_yaml::from_str(&contents)
        .map_err(|e| SessionError::ParseError(path.to_path_buf(), e))?;
    Ok(Some(session))
}

pub fn save(path: &Path, session: &Session) -> Result<(), SessionError> {
    let write_error = |e: String| SessionError::WriteError(path.to_path_buf(), e);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| write_error(e.to_string()))?;
    }
    let yaml = serde_yaml::to_string(session).map_err(|e| write_error(e.to_string()))?;

    let mut file = open_private(path).map_err(|e| write_error(e.to_string()))?;
    file.write_all(yaml.as_bytes())
        .map_err(|e| write_error(e.to_string()))?;
    Ok(())
}

/// Open for writing with owner-only permissions from the moment it exists.
#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // `mode` only applies on creation; tighten a file left by an older run.
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

/// Remove the saved session. Returns false if there was none.
pub fn delete(path: &Path) -> Result<bool, SessionError> {
    if !path.exists() {
        return Ok(false);
    }
    fs::remove_file(path).map_err(|e| SessionError::WriteError(path.to_path_buf(), e.to_string()))?;
    Ok(true)
}
