//! Slack Web API client module.
//!
//! This module provides the `StatusClient` for the handful of Web API
//! methods slacker needs: `users.setPresence` and `users.profile.set`.
//!
//! Requests are form-encoded POSTs carrying the account token as a field.
//! Every response is a JSON envelope `{"ok": bool, "error": "..."}`.

pub mod client;
pub mod error;

pub use client::{AccountClient, StatusClient};
pub use error::ActionError;
