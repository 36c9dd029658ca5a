use std::path::{Path, PathBuf};

use bs_core::{ModelDescriptor, Result};
use futures_util::StreamExt;
use kdam::{tqdm, BarExt};
use reqwest::Client;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::catalog;

const ARTIFACT_BASE_URL: &str = "https://drive.google.com/uc";

/// Downloads model artifacts into a local cache directory, skipping the
/// network entirely when the file is already present.
pub struct ArtifactFetcher {
    client: Client,
    cache_dir: PathBuf,
}

impl ArtifactFetcher {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            client: Client::new(),
            cache_dir: cache_dir.into(),
        }
    }

    pub fn artifact_path(&self, descriptor: &ModelDescriptor) -> PathBuf {
        self.cache_dir.join(catalog::artifact_filename(descriptor.name))
    }

    /// Make sure the artifact is on disk and return its path. The cache
    /// directory is created on demand; an existing file is reused as-is.
    pub async fn ensure_artifact(&self, descriptor: &ModelDescriptor) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.cache_dir).await?;
        let path = self.artifact_path(descriptor);
        if tokio::fs::try_exists(&path).await? {
            info!("📦 {} already cached at {}", descriptor.name, path.display());
            return Ok(path);
        }
        self.download(descriptor, &path).await?;
        Ok(path)
    }

    async fn download(&self, descriptor: &ModelDescriptor, path: &Path) -> Result<()> {
        let url = format!(
            "{}?id={}&export=download",
            ARTIFACT_BASE_URL, descriptor.artifact_id
        );
        info!("⬇️ Downloading {} from {}", descriptor.name, url);

        let response = self.client.get(&url).send().await?.error_for_status()?;
        let mut progress = response.content_length().map(|total| {
            tqdm!(
                total = total as usize,
                unit_scale = true,
                desc = descriptor.name.to_string()
            )
        });

        // Stream into a sibling .part file so an interrupted download never
        // masquerades as a valid cached artifact.
        let part_path = path.with_extension("onnx.part");
        let mut file = tokio::fs::File::create(&part_path).await?;
        let mut stream = response.bytes_stream();
        let written: Result<()> = async {
            while let Some(chunk) = stream.next().await {
                let chunk = chunk?;
                file.write_all(&chunk).await?;
                if let Some(bar) = progress.as_mut() {
                    let _ = bar.update(chunk.len());
                }
            }
            file.flush().await?;
            Ok(())
        }
        .await;

        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&part_path).await;
            return Err(e);
        }

        tokio::fs::rename(&part_path, path).await?;
        info!("✨ {} cached at {}", descriptor.name, path.display());
        Ok(())
    }
}
