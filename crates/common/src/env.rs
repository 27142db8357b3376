//! Environment/runtime helpers
//!
//! Sanity checks to ensure the data directory is usable at startup.

use std::path::Path;

use tracing::{info, warn};

/// Create the data directory if needed and make sure it is writable.
pub async fn ensure_data_dir(data_dir: &Path) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(data_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", data_dir.display()))?;
    let meta = tokio::fs::metadata(data_dir).await?;
    if meta.permissions().readonly() {
        warn!(data_dir = %data_dir.display(), "data directory is read-only; writes will fail");
    } else {
        info!(data_dir = %data_dir.display(), "data directory ready");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_nested_dir() -> anyhow::Result<()> {
        let dir = std::env::temp_dir().join(format!("blog_env_{}", uuid::Uuid::new_v4())).join("data");
        ensure_data_dir(&dir).await?;
        assert!(tokio::fs::metadata(&dir).await?.is_dir());
        let _ = tokio::fs::remove_dir_all(dir.parent().unwrap()).await;
        Ok(())
    }
}
