mod app;
mod core;

use crate::app::replay::{self, ReplaySession};
use crate::core::adapter::{BidderAdapter, FluxAdapter};
use crate::core::config_manager::ConfigManager;
use crate::core::observability;
use anyhow::anyhow;
use std::path::PathBuf;
use tracing::info;

const USAGE: &str = "usage: flux-bidder <config.yaml> <session.json>";

fn main() -> Result<(), anyhow::Error> {
    let mut args = std::env::args().skip(1);
    let config_path: PathBuf = args.next().ok_or_else(|| anyhow!(USAGE))?.into();
    let session_path: PathBuf = args.next().ok_or_else(|| anyhow!(USAGE))?.into();

    let manager = ConfigManager::new(config_path);
    manager.start()?;
    let cfg = manager.get()?.clone();

    let _log_guards = observability::init(&cfg.logging)?;

    let adapter = FluxAdapter::new(cfg.bidder);
    info!(
        "Adapter {} ready, media types {:?}",
        adapter.code(),
        adapter.supported_media_types()
    );

    let session = ReplaySession::load(&session_path)?;
    let report = replay::run(&adapter, &session)?;

    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
