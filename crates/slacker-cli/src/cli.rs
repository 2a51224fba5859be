//! Command line surface.

use std::path::PathBuf;

use clap::Parser;
use slacker_core::config::{API_URL_ENV, CONFIG_ENV};
use slacker_core::IntentFlags;

#[derive(Debug, Parser)]
#[command(
    name = "slacker",
    version,
    about = "Set presence and custom status on several Slack workspaces at once"
)]
pub struct Cli {
    /// Set yourself away
    #[arg(long)]
    pub away: bool,

    /// Set yourself online
    #[arg(long)]
    pub online: bool,

    /// Clear your custom status
    #[arg(long)]
    pub clear: bool,

    /// Set status emoji
    #[arg(long, default_value = "")]
    pub emoji: String,

    /// Set status text
    #[arg(long, default_value = "")]
    pub text: String,

    /// Credential file to use [default: ~/.slack]
    #[arg(long, env = CONFIG_ENV, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long)]
    pub debug: bool,

    /// Relative expiration of the custom status (e.g. 1h15m30s)
    #[arg(long, value_name = "DURATION")]
    pub expires_in: Option<String>,

    /// Absolute expiration of the custom status, local time
    #[arg(long, value_name = "YYYY-MM-DDTHH:MM:SS")]
    pub expires_at: Option<String>,

    #[arg(long, env = API_URL_ENV, hide = true)]
    pub api_url: Option<String>,

    /// Only update these accounts [default: all]
    #[arg(value_name = "ACCOUNT")]
    pub accounts: Vec<String>,
}

impl Cli {
    pub fn intent_flags(&self) -> IntentFlags {
        IntentFlags {
            away: self.away,
            online: self.online,
            clear: self.clear,
            emoji: self.emoji.clone(),
            text: self.text.clone(),
            expires_in: self.expires_in.clone(),
            expires_at: self.expires_at.clone(),
        }
    }
}
