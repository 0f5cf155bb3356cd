use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use readiness_core::catalog::Catalog;
use readiness_core::config::Config;
use readiness_core::store::Store;
use readiness_core::{paths, ReadinessError};

use crate::auth::Sessions;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
    pub config: Arc<Config>,
    pub catalog: Arc<Catalog>,
    pub store: Arc<Store>,
    pub sessions: Sessions,
}

impl AppState {
    /// Load config and catalog for `root` and open its database.
    ///
    /// An uninitialized root runs on default config; the database file is
    /// created on first open.
    pub fn open(root: PathBuf) -> anyhow::Result<Self> {
        let config = match Config::load(&root) {
            Ok(cfg) => cfg,
            Err(ReadinessError::NotInitialized) => Config::default(),
            Err(e) => return Err(e.into()),
        };
        let catalog = config.load_catalog(&root)?;
        let store = Store::open(&paths::db_path(&root))?;
        let ttl = Duration::from_secs(config.server.session_ttl_minutes.saturating_mul(60));

        tracing::debug!(
            questions = catalog.len(),
            page_size = config.assessment.page_size,
            "loaded catalog"
        );

        Ok(Self {
            root,
            config: Arc::new(config),
            catalog: Arc::new(catalog),
            store: Arc::new(store),
            sessions: Sessions::new(ttl),
        })
    }

    pub fn page_size(&self) -> usize {
        self.config.assessment.page_size.max(1)
    }
}
