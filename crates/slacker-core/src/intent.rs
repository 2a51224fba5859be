//! Validation of requested actions.
//!
//! Raw flag values are turned into an immutable [`Intent`] exactly once,
//! before any network traffic. Every contradiction maps to its own
//! [`UsageError`] variant.

use std::fmt;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use tracing::warn;

use crate::error::UsageError;

/// Accepted layout for absolute expirations (local time, no offset).
pub const EXPIRES_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Flag values as typed by the user, before validation.
#[derive(Debug, Clone, Default)]
pub struct IntentFlags {
    pub away: bool,
    pub online: bool,
    pub clear: bool,
    pub emoji: String,
    pub text: String,
    pub expires_in: Option<String>,
    pub expires_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Away,
    Online,
}

impl Presence {
    /// Value understood by `users.setPresence`.
    pub fn as_api_str(self) -> &'static str {
        match self {
            Presence::Away => "away",
            Presence::Online => "auto",
        }
    }
}

impl fmt::Display for Presence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Presence::Away => write!(f, "away"),
            Presence::Online => write!(f, "online"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomStatus {
    pub emoji: String,
    pub text: String,
}

/// A validated set of actions to apply to every account.
///
/// `clear` never coexists with a custom status or an expiration, and at most
/// one presence is requested. Clearing may be combined with a presence change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intent {
    clear: bool,
    presence: Option<Presence>,
    status: Option<CustomStatus>,
    expiration: Option<i64>,
}

impl Intent {
    /// Validate `flags`, resolving relative expirations against `now`.
    pub fn from_flags(flags: &IntentFlags, now: DateTime<Utc>) -> Result<Self, UsageError> {
        let has_status = !flags.emoji.is_empty() || !flags.text.is_empty();

        if !(flags.clear || flags.away || flags.online || has_status) {
            return Err(UsageError::NoAction);
        }
        if flags.clear && has_status {
            return Err(UsageError::ClearWithStatus);
        }
        if flags.away && flags.online {
            return Err(UsageError::AwayAndOnline);
        }

        let expiration = resolve_expiration(
            non_blank(flags.expires_in.as_deref()),
            non_blank(flags.expires_at.as_deref()),
            now,
        )?;
        if expiration.is_some() && flags.clear {
            return Err(UsageError::ExpirationWithClear);
        }
        if expiration.is_some() && !has_status {
            warn!("Expiration only applies to a custom status, ignoring it");
        }

        let presence = if flags.online {
            Some(Presence::Online)
        } else if flags.away {
            Some(Presence::Away)
        } else {
            None
        };

        let status = has_status.then(|| CustomStatus {
            emoji: flags.emoji.clone(),
            text: flags.text.clone(),
        });

        Ok(Self {
            clear: flags.clear,
            presence,
            expiration: status.as_ref().and(expiration),
            status,
        })
    }

    pub fn clear(&self) -> bool {
        self.clear
    }

    pub fn presence(&self) -> Option<Presence> {
        self.presence
    }

    pub fn status(&self) -> Option<&CustomStatus> {
        self.status.as_ref()
    }

    /// Absolute Unix timestamp at which the custom status expires.
    pub fn expiration(&self) -> Option<i64> {
        self.expiration
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn resolve_expiration(
    expires_in: Option<&str>,
    expires_at: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Option<i64>, UsageError> {
    match (expires_in, expires_at) {
        (Some(_), Some(_)) => Err(UsageError::ConflictingExpiration),
        (Some(relative), None) => parse_relative(relative, now),
        (None, Some(absolute)) => parse_absolute(absolute).map(Some),
        (None, None) => Ok(None),
    }
}

/// `1h`, `1h15m30s`, `90s`... added to `now`. A zero duration means no expiration.
fn parse_relative(value: &str, now: DateTime<Utc>) -> Result<Option<i64>, UsageError> {
    let invalid = |reason: String| UsageError::InvalidExpiration {
        value: value.to_string(),
        reason,
    };

    let duration = humantime::parse_duration(value).map_err(|e| invalid(e.to_string()))?;
    if duration.is_zero() {
        return Ok(None);
    }

    let delta = chrono::Duration::from_std(duration).map_err(|e| invalid(e.to_string()))?;
    now.checked_add_signed(delta)
        .map(|at| Some(at.timestamp()))
        .ok_or_else(|| invalid("duration out of range".to_string()))
}

/// `YYYY-MM-DDTHH:MM:SS` interpreted in the local time zone.
fn parse_absolute(value: &str) -> Result<i64, UsageError> {
    let invalid = |reason: String| UsageError::InvalidExpiration {
        value: value.to_string(),
        reason,
    };

    let naive = NaiveDateTime::parse_from_str(value, EXPIRES_AT_FORMAT)
        .map_err(|e| invalid(e.to_string()))?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|at| at.timestamp())
        .ok_or_else(|| invalid("time does not exist in the local time zone".to_string()))
}
