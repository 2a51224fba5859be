use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::{debug, warn};

use crate::error::ConfigError;

/// Read-only mapping of account name to API token.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    tokens: BTreeMap<String, String>,
}

impl CredentialStore {
    /// Load the credential file at `path`, keeping only accounts in `filter`
    /// (or every account when `filter` is empty).
    pub fn load(path: &Path, filter: &[String]) -> Result<Self, ConfigError> {
        let contents = std::fs::read(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Loaded credential file");
        Self::parse_bytes(&contents, filter)
    }

    /// Parse credential lines. Malformed lines are logged and skipped.
    pub fn parse(contents: &str, filter: &[String]) -> Result<Self, ConfigError> {
        Self::parse_bytes(contents.as_bytes(), filter)
    }

    /// Like [`parse`](Self::parse), but a line that is not valid UTF-8 counts
    /// as malformed instead of failing the whole load.
    pub fn parse_bytes(contents: &[u8], filter: &[String]) -> Result<Self, ConfigError> {
        let wanted: BTreeSet<&str> = filter.iter().map(String::as_str).collect();
        let mut tokens = BTreeMap::new();

        for (index, raw) in contents.split(|b| *b == b'\n').enumerate() {
            let Ok(raw) = std::str::from_utf8(raw) else {
                warn!(line = index + 1, "Credential line is not valid UTF-8, skipping");
                continue;
            };
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((account, token)) = Self::parse_line(line) else {
                warn!(line = index + 1, "Malformed credential line, expected `account token`");
                continue;
            };

            if !wanted.is_empty() && !wanted.contains(account) {
                debug!(account, "Skipping account not requested");
                continue;
            }

            if tokens.insert(account.to_string(), token.to_string()).is_some() {
                debug!(account, line = index + 1, "Duplicate account, later entry wins");
            }
        }

        for missing in wanted.iter().filter(|name| !tokens.contains_key(**name)) {
            debug!(account = *missing, "Requested account has no token");
        }

        if tokens.is_empty() {
            return Err(ConfigError::NoAccounts {
                filter: filter.to_vec(),
            });
        }

        Ok(Self { tokens })
    }

    /// Split a trimmed line into exactly two fields.
    fn parse_line(line: &str) -> Option<(&str, &str)> {
        let mut fields = line.split_whitespace();
        let account = fields.next()?;
        let token = fields.next()?;
        if fields.next().is_some() {
            return None;
        }
        Some((account, token))
    }

    pub fn get(&self, account: &str) -> Option<&str> {
        self.tokens.get(account).map(String::as_str)
    }

    /// Iterate accounts in name order.
    pub fn accounts(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tokens.iter().map(|(a, t)| (a.as_str(), t.as_str()))
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
