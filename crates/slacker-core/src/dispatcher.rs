//! Concurrent application of an [`Intent`] to every account.
//!
//! Each account gets its own unit of work bound to its own token. Units run
//! concurrently and are joined before `dispatch` returns; a failing action is
//! recorded in that account's report and never affects the other accounts.

use std::fmt;
use std::future::Future;

use futures::future::join_all;
use tracing::debug;

use crate::api::{AccountClient, ActionError, StatusClient};
use crate::auth::CredentialStore;
use crate::intent::{Intent, Presence};

/// One remote call performed on behalf of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ClearStatus,
    SetStatus,
    SetPresence(Presence),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::ClearStatus => write!(f, "clear status"),
            Action::SetStatus => write!(f, "set custom status"),
            Action::SetPresence(presence) => write!(f, "set presence to {}", presence),
        }
    }
}

#[derive(Debug)]
pub struct ActionOutcome {
    pub action: Action,
    pub result: Result<(), ActionError>,
}

/// Everything that happened to one account, in execution order.
#[derive(Debug)]
pub struct AccountReport {
    pub account: String,
    pub outcomes: Vec<ActionOutcome>,
}

/// A failed action, borrowed from a [`DispatchReport`].
#[derive(Debug, Clone, Copy)]
pub struct Failure<'a> {
    pub account: &'a str,
    pub action: Action,
    pub error: &'a ActionError,
}

#[derive(Debug, Default)]
pub struct DispatchReport {
    pub accounts: Vec<AccountReport>,
}

impl DispatchReport {
    /// Failed actions, grouped by account name.
    pub fn failures(&self) -> impl Iterator<Item = Failure<'_>> {
        self.accounts.iter().flat_map(|report| {
            report.outcomes.iter().filter_map(move |outcome| {
                outcome.result.as_ref().err().map(|error| Failure {
                    account: &report.account,
                    action: outcome.action,
                    error,
                })
            })
        })
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    pub fn account(&self, name: &str) -> Option<&AccountReport> {
        self.accounts.iter().find(|r| r.account == name)
    }
}

/// Apply `intent` to every account in `store` and wait for all of them.
///
/// `client` supplies the connection pool and API root; each account gets a
/// handle bound to its own token.
pub async fn dispatch(
    client: &StatusClient,
    intent: &Intent,
    store: &CredentialStore,
) -> DispatchReport {
    let units: Vec<_> = store
        .accounts()
        .map(|(account, token)| {
            let client = client.with_token(token);
            async move { apply(&client, intent, account).await }
        })
        .collect();

    let accounts = join_all(units).await;
    DispatchReport { accounts }
}

/// Runs clear, then custom status, then presence.
async fn apply(client: &AccountClient, intent: &Intent, account: &str) -> AccountReport {
    debug!(account, "Updating account");
    let mut outcomes = Vec::new();

    if intent.clear() {
        outcomes.push(run(account, Action::ClearStatus, client.clear_status()).await);
    }

    if let Some(status) = intent.status() {
        let call = client.set_status(&status.emoji, &status.text, intent.expiration());
        outcomes.push(run(account, Action::SetStatus, call).await);
    }

    if let Some(presence) = intent.presence() {
        let call = client.set_presence(presence);
        outcomes.push(run(account, Action::SetPresence(presence), call).await);
    }

    AccountReport {
        account: account.to_string(),
        outcomes,
    }
}

async fn run<F>(account: &str, action: Action, call: F) -> ActionOutcome
where
    F: Future<Output = Result<(), ActionError>>,
{
    let result = call.await;
    match &result {
        Ok(()) => debug!(account, action = %action, "Action succeeded"),
        Err(e) => debug!(account, action = %action, error = %e, "Action failed"),
    }
    ActionOutcome { action, result }
}
