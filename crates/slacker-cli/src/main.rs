//! slacker - set presence and custom status on several Slack workspaces.
//!
//! Tokens come from a two-column file (`~/.slack` by default). Every account
//! is updated concurrently; failures are printed per account and do not change
//! the exit status.

mod cli;

use std::io;
use std::process::ExitCode;

use chrono::Utc;
use clap::{CommandFactory, Parser};
use slacker_core::config::default_credentials_path;
use slacker_core::diagnostics::write_failures;
use slacker_core::error::USAGE_EXIT_CODE;
use slacker_core::{dispatch, CredentialStore, DispatchReport, Error, Intent, StatusClient, UsageError};
use tracing::{debug, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::Cli;

/// Initialize the tracing subscriber for logging
fn init_tracing(debug: bool) {
    // --debug wins over RUST_LOG; otherwise only warnings are shown
    let filter = if debug {
        EnvFilter::new("slacker=debug,slacker_core=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(USAGE_EXIT_CODE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_tracing(cli.debug);

    let outcome = run(cli).await;
    match &outcome {
        Ok(report) => {
            if let Err(e) = write_failures(report, &mut io::stderr().lock()) {
                warn!(error = %e, "Failed to write failure report");
            }
            debug!(
                accounts = report.accounts.len(),
                failures = report.failure_count(),
                "Done"
            );
        }
        Err(e) => {
            if matches!(e, Error::Usage(UsageError::NoAction)) {
                eprintln!("{}", Cli::command().render_help());
            }
            eprintln!("{}", e);
        }
    }
    ExitCode::from(exit_code(&outcome))
}

/// Remote failures never change the exit status; only fatal errors do.
fn exit_code(outcome: &Result<DispatchReport, Error>) -> u8 {
    match outcome {
        Ok(_) => 0,
        Err(e) => e.exit_code(),
    }
}

async fn run(cli: Cli) -> Result<DispatchReport, Error> {
    let intent = Intent::from_flags(&cli.intent_flags(), Utc::now())?;

    let path = match cli.config {
        Some(path) => path,
        None => default_credentials_path()?,
    };
    let store = CredentialStore::load(&path, &cli.accounts)?;

    let mut client = StatusClient::new()?;
    if let Some(url) = cli.api_url {
        client = client.with_base_url(url);
    }

    debug!(accounts = store.len(), "Updating accounts");
    Ok(dispatch(&client, &intent, &store).await)
}
