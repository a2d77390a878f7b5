//! Environment variable overrides from a local file

use std::path::Path;

use crate::error::{BootstrapError, BootstrapResult};

/// File probed in the working directory for environment overrides
pub const ENV_OVERRIDE_FILE: &str = ".env";

/// Apply environment overrides from `.env` in the working directory
///
/// A missing file is not an error; services run fine without overrides.
pub fn load_env_file() -> BootstrapResult<()> {
    load_env_file_from(Path::new(ENV_OVERRIDE_FILE))
}

/// Apply environment overrides from an explicit path
///
/// Each `KEY=VALUE` line is written into the process environment,
/// overwriting any inherited value. Blank lines, `#` comments and lines
/// without a `=` are skipped. No quoting or escape handling is performed.
pub fn load_env_file_from(path: &Path) -> BootstrapResult<()> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => {
            return Err(BootstrapError::EnvFile { path: path.to_path_buf(), source: e });
        }
    };

    for line in contents.lines() {
        if let Some((key, value)) = parse_override(line) {
            std::env::set_var(key, value);
        }
    }

    Ok(())
}

/// Parse a single override line into a key/value pair
fn parse_override(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (key, value) = line.split_once('=')?;
    // set_var cannot represent empty keys or embedded NUL bytes
    if key.is_empty() || key.contains('\0') || value.contains('\0') {
        return None;
    }

    Some((key, value))
}
