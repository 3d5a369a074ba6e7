//! Delivery - Persist the finished batch as JSON

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use crate::types::*;

/// Writes the batch to a JSON file, one array element per selection
pub struct JsonFileDeliverer {
    path: PathBuf,
}

impl JsonFileDeliverer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl Deliverer for JsonFileDeliverer {
    async fn deliver(&self, batch: &[Selection]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let mut json = serde_json::to_vec(batch)?;
        json.push(b'\n');
        fs::write(&self.path, json).await?;

        info!("Selections successfully delivered to {}", self.path.display());
        Ok(())
    }
}
