//! Locations and defaults shared by the library and the command line.
//!
//! The credential table lives at `~/.slack` unless overridden.

use std::path::PathBuf;

use crate::error::ConfigError;

/// Credential file name in the home directory
const CREDENTIALS_FILE: &str = ".slack";

/// Environment variable overriding the credential file location
pub const CONFIG_ENV: &str = "SLACKER_CONFIG";

/// Environment variable overriding the Web API root
pub const API_URL_ENV: &str = "SLACKER_API_URL";

/// Default path of the credential table.
pub fn default_credentials_path() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::HomeDirectory)?;
    Ok(home.join(CREDENTIALS_FILE))
}
