use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use serde::Deserialize;
use tracing::info;

use consentlens_auth_bridge::MemoryIdentity;
use consentlens_consent_store::{BackgroundHandler, ConsentGateway, MemoryRecordStore};
use consentlens_core_types::UserId;
use consentlens_detector::{ChangeWatcher, MemoryDom, NodeSpec, Scanner};
use consentlens_event_bus::boundary_channel;

#[derive(Args)]
pub struct WatchArgs {
    /// Path to the initial JSON document snapshot (a NodeSpec tree).
    pub dom: PathBuf,
    /// Path to a JSON array of mutations to replay.
    pub mutations: PathBuf,
    /// Page URL recorded on each artifact.
    #[arg(long, default_value = "https://example.com/")]
    pub url: String,
}

/// One recorded insertion: a subtree attached under `parent` (the body
/// when omitted).
#[derive(Deserialize)]
struct MutationSpec {
    #[serde(default)]
    parent: u64,
    node: NodeSpec,
}

pub async fn run(args: WatchArgs) -> Result<()> {
    let raw = std::fs::read_to_string(&args.dom)
        .with_context(|| format!("reading {}", args.dom.display()))?;
    let spec: NodeSpec = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", args.dom.display()))?;
    let raw = std::fs::read_to_string(&args.mutations)
        .with_context(|| format!("reading {}", args.mutations.display()))?;
    let mutations: Vec<MutationSpec> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", args.mutations.display()))?;

    let dom = Arc::new(MemoryDom::from_spec(&args.url, &spec));
    let scanner = Arc::new(Scanner::new(Arc::clone(&dom)));

    let user = UserId::new();
    let store = Arc::new(MemoryRecordStore::new());
    let handler = Arc::new(BackgroundHandler::new(
        ConsentGateway::new(Arc::clone(&store)),
        Arc::new(MemoryIdentity::signed_in(user.clone())),
    ));

    let (content, background) = boundary_channel(16);
    let serve = tokio::spawn(background.serve(handler));
    let watcher = tokio::spawn(ChangeWatcher::new(scanner, content).run());

    for (index, mutation) in mutations.into_iter().enumerate() {
        let parent = consentlens_core_types::ElementId(mutation.parent);
        if dom.insert(parent, mutation.node).is_none() {
            dom.close();
            anyhow::bail!(
                "mutation {index} in {}: parent {parent} is not a live element",
                args.mutations.display()
            );
        }
    }
    dom.close();

    watcher.await?;
    serve.await?;

    let gateway = ConsentGateway::new(Arc::clone(&store));
    let rows = gateway.list_consents(&user, None).await?;
    info!(rows = rows.len(), "replay complete");
    for row in &rows {
        println!("{}", serde_json::to_string(row)?);
    }
    Ok(())
}
