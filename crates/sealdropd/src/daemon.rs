use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

use sealdrop_core::RelayConfig;
use sealdrop_storage::{ShortNameTable, StorageGateway};

use crate::routes::{self, AppState};

pub async fn run(config: RelayConfig) -> Result<()> {
    info!("daemon starting");

    // ── Storage ──────────────────────────────────────────────────────────
    let gateway = StorageGateway::from_config(&config.storage)
        .context("building storage gateway")?;
    info!(
        permanent = %config.storage.permanent_dir.display(),
        temporary = %config.storage.temporary_dir.display(),
        writer = %config.storage.writer,
        readers = ?config.storage.readers,
        "storage ready"
    );

    if let Err(e) = sealdrop_storage::check_health(&gateway).await {
        warn!("storage health check failed: {e}  (serving anyway)");
    }

    // ── Short names ──────────────────────────────────────────────────────
    let shortener = ShortNameTable::open(&config.storage.shortener_db)
        .with_context(|| {
            format!(
                "opening short-name table: {}",
                config.storage.shortener_db.display()
            )
        })?;
    info!(
        path = %config.storage.shortener_db.display(),
        entries = shortener.len(),
        "short-name table loaded"
    );

    // ── HTTP ─────────────────────────────────────────────────────────────
    let state = AppState {
        gateway: Arc::new(gateway),
        shortener: Arc::new(shortener),
        public_url: config.server.public_url.clone(),
    };
    let app = routes::router(state, config.server.max_upload_bytes);

    routes::serve(&config.server.listen, app).await?;

    info!("daemon stopped");
    Ok(())
}
