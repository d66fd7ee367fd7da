//! Storage health check

use anyhow::Result;

use crate::gateway::StorageGateway;

/// Verify both upload locations are reachable by listing their roots.
pub async fn check_health(gateway: &StorageGateway) -> Result<()> {
    for (location, op) in gateway.operators() {
        op.list("/")
            .await
            .map_err(|e| anyhow::anyhow!("{location} storage health check failed: {e}"))?;
    }
    Ok(())
}

/// Returns true if storage is reachable, false otherwise (non-panicking)
pub async fn is_healthy(gateway: &StorageGateway) -> bool {
    check_health(gateway).await.is_ok()
}
