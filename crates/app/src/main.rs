//! Relay API Client - Main Entry Point
//!
//! Wires the infrastructure adapters into the application workbench and
//! reports the loaded collection. The interactive surface drives the
//! workbench from here.

use std::env;

use relay_application::Workbench;
use relay_infrastructure::{JsonFileStore, ReqwestTransport};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Collection file path: `RELAY_COLLECTION` env var, or a file next to the
/// working directory.
fn collection_path() -> String {
    env::var("RELAY_COLLECTION").unwrap_or_else(|_| "relay-collection.json".to_string())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let path = collection_path();
    let workbench = Workbench::new(JsonFileStore::new(&path));
    let _transport = ReqwestTransport::new()?;

    info!(
        collection = %path,
        requests = workbench.store().request_count(),
        folders = workbench.store().folder_count(),
        "relay ready"
    );

    Ok(())
}
