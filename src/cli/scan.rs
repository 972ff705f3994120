use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use consentlens_detector::{MemoryDom, NodeSpec, Scanner};

#[derive(Args)]
pub struct ScanArgs {
    /// Path to a JSON document snapshot (a NodeSpec tree).
    pub dom: PathBuf,
    /// Page URL recorded on each artifact.
    #[arg(long, default_value = "https://example.com/")]
    pub url: String,
}

pub fn run(args: ScanArgs) -> Result<()> {
    let raw = std::fs::read_to_string(&args.dom)
        .with_context(|| format!("reading {}", args.dom.display()))?;
    let spec: NodeSpec = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", args.dom.display()))?;

    let dom = Arc::new(MemoryDom::from_spec(&args.url, &spec));
    let scanner = Scanner::new(dom);

    let artifacts = scanner.scan();
    for artifact in &artifacts {
        println!("{}", serde_json::to_string(artifact)?);
    }
    eprintln!("{} artifact(s)", artifacts.len());
    Ok(())
}
