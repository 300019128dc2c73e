use crate::app::config::FluxConfig;
use anyhow::{Error, bail};
use parking_lot::{RwLock, RwLockReadGuard};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Owns the loaded adapter config. Readers take a snapshot
/// through ['ConfigManager::get'] once it has been started
pub struct ConfigManager {
    path: PathBuf,
    cfg: Arc<RwLock<FluxConfig>>,
    started: AtomicBool,
}

impl ConfigManager {
    fn reload(&self) -> Result<(), Error> {
        let cfg = FluxConfig::load(&self.path)?;
        *self.cfg.write() = cfg;

        Ok(())
    }

    pub fn new(cfg_path: PathBuf) -> ConfigManager {
        ConfigManager {
            path: cfg_path,
            cfg: Arc::new(RwLock::new(FluxConfig::default())),
            started: AtomicBool::new(false),
        }
    }

    /// Loads initial config
    pub fn start(&self) -> Result<(), Error> {
        self.reload()?;
        self.started.store(true, Ordering::Release);

        Ok(())
    }

    /// Get an immutable read for the current config
    pub fn get(&self) -> Result<RwLockReadGuard<'_, FluxConfig>, Error> {
        if !self.started.load(Ordering::Acquire) {
            bail!("ConfigManager not started yet but fetching config");
        }

        Ok(self.cfg.read())
    }
}
