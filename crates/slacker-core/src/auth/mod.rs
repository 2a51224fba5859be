//! Account credentials.
//!
//! Tokens are read from a two-column text file, one `account token` pair per
//! line. Comments and blank lines are ignored.

pub mod credentials;

pub use credentials::CredentialStore;
