//! Core library for slacker.
//!
//! Updates presence and custom status on several Slack workspaces at once:
//!
//! - `auth`: the credential table mapping account names to API tokens
//! - `intent`: validation of the requested actions into an immutable `Intent`
//! - `api`: the per-account HTTP client for the Slack Web API
//! - `dispatcher`: concurrent application of an `Intent` to every account
//! - `diagnostics`: rendering of per-account failures

pub mod api;
pub mod auth;
pub mod config;
pub mod diagnostics;
pub mod dispatcher;
pub mod error;
pub mod intent;

pub use api::{AccountClient, ActionError, StatusClient};
pub use auth::CredentialStore;
pub use dispatcher::{dispatch, AccountReport, Action, ActionOutcome, DispatchReport, Failure};
pub use error::{ConfigError, Error, UsageError};
pub use intent::{CustomStatus, Intent, IntentFlags, Presence};
