use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;

use consentlens_revoke_engine::{compute_expiry, RuleTemplate};

#[derive(Args)]
pub struct ExpiryArgs {
    /// Rule template: Time-based, Visit-based or Inactivity.
    #[arg(long)]
    pub template: RuleTemplate,
    /// Template option literal, e.g. "1 month" or "10 visits".
    #[arg(long)]
    pub value: String,
    /// Reference instant (RFC 3339); defaults to now.
    #[arg(long)]
    pub from: Option<DateTime<Utc>>,
}

pub fn run(args: ExpiryArgs) -> Result<()> {
    let reference = args.from.unwrap_or_else(Utc::now);
    match compute_expiry(args.template, &args.value, reference)? {
        Some(expiry) => println!("{}", expiry.to_rfc3339()),
        None => println!(
            "{} rules have no expiry instant: the required usage counters \
             are not tracked",
            args.template.as_str()
        ),
    }
    Ok(())
}
