pub mod assessment;
pub mod catalog;
pub mod init;
pub mod report;
pub mod score;
pub mod serve;

use anyhow::Context;
use readiness_core::catalog::Catalog;
use readiness_core::config::Config;
use readiness_core::store::Store;
use readiness_core::{paths, ReadinessError};
use std::path::Path;

/// Project config, or defaults when `root` has not been initialized.
pub(crate) fn config_or_default(root: &Path) -> anyhow::Result<Config> {
    match Config::load(root) {
        Ok(cfg) => Ok(cfg),
        Err(ReadinessError::NotInitialized) => Ok(Config::default()),
        Err(e) => Err(e).context("failed to load config.yaml"),
    }
}

/// The catalog this project scores against.
pub(crate) fn load_catalog(root: &Path) -> anyhow::Result<Catalog> {
    let config = config_or_default(root)?;
    config.load_catalog(root).context("failed to load catalog")
}

/// Open the assessment database of an initialized project.
pub(crate) fn open_store(root: &Path) -> anyhow::Result<Store> {
    Config::load(root)?;
    let path = paths::db_path(root);
    Store::open(&path).with_context(|| format!("failed to open {}", path.display()))
}
