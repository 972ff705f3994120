use anyhow::Result;
use clap::{Parser, Subcommand};

mod expiry;
mod scan;
mod watch;

#[derive(Parser)]
#[command(
    name = "consentlens",
    about = "Offline driver for the ConsentLens detection and auto-revoke core",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one scan pass over a serialized DOM snapshot and print the
    /// detected artifacts as JSON lines.
    Scan(scan::ScanArgs),
    /// Compute the expiry instant for an auto-revoke rule.
    Expiry(expiry::ExpiryArgs),
    /// Replay a recorded mutation feed through the full pipeline and
    /// print the resulting consent rows.
    Watch(watch::WatchArgs),
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Scan(args) => scan::run(args),
            Command::Expiry(args) => expiry::run(args),
            Command::Watch(args) => watch::run(args).await,
        }
    }
}
