use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bs_core::Result;
use tokio::sync::Mutex;
use tracing::info;

use crate::catalog;
use crate::fetch::ArtifactFetcher;
use crate::loader::LoadedModel;

type LoaderFn = fn(&str, &Path) -> bs_core::Result<LoadedModel>;

/// Process-wide keyed model cache: at most one load attempt and one cached
/// instance per display name.
pub struct ModelRegistry {
    fetcher: ArtifactFetcher,
    loader: LoaderFn,
    loaded: Mutex<HashMap<String, Arc<LoadedModel>>>,
}

impl ModelRegistry {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self::with_loader(cache_dir, LoadedModel::load)
    }

    fn with_loader(cache_dir: impl Into<PathBuf>, loader: LoaderFn) -> Self {
        Self {
            fetcher: ArtifactFetcher::new(cache_dir),
            loader,
            loaded: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve a display name to a loaded model, fetching and deserializing
    /// the artifact on first use. The lock is held across the load, so
    /// concurrent requests for the same name perform a single fetch and all
    /// receive the same instance.
    pub async fn get_or_load(&self, name: &str) -> Result<Arc<LoadedModel>> {
        let descriptor = catalog::find(name)?;
        let mut loaded = self.loaded.lock().await;
        if let Some(model) = loaded.get(name) {
            return Ok(model.clone());
        }

        let path = self.fetcher.ensure_artifact(descriptor).await?;
        info!("🧠 Loading {} from {}", name, path.display());
        let model = Arc::new((self.loader)(name, &path)?);
        loaded.insert(name.to_string(), model.clone());
        Ok(model)
    }

    /// Display names with a live in-memory instance.
    pub async fn loaded_names(&self) -> Vec<String> {
        self.loaded.lock().await.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bs_core::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn second_lookup_reuses_the_loaded_instance() {
        static LOADS: AtomicUsize = AtomicUsize::new(0);
        fn counting_loader(name: &str, _path: &Path) -> bs_core::Result<LoadedModel> {
            LOADS.fetch_add(1, Ordering::SeqCst);
            Ok(LoadedModel::passthrough(name, 8, 8))
        }

        let dir = tempfile::tempdir().unwrap();
        // Seed the artifact so provisioning never reaches the network.
        let descriptor = catalog::find("MobileNet").unwrap();
        let path = dir.path().join(catalog::artifact_filename(descriptor.name));
        tokio::fs::write(&path, b"weights").await.unwrap();

        let registry = ModelRegistry::with_loader(dir.path(), counting_loader);
        let first = registry.get_or_load("MobileNet").await.unwrap();
        let second = registry.get_or_load("MobileNet").await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(LOADS.load(Ordering::SeqCst), 1);
        assert_eq!(registry.loaded_names().await, ["MobileNet"]);
    }

    #[tokio::test]
    async fn unknown_name_fails_before_any_io() {
        // Point the cache at a directory that must never be created: a
        // catalog miss resolves before filesystem or network access.
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("untouched");
        let registry = ModelRegistry::new(&cache);

        match registry.get_or_load("ResNet50").await {
            Err(Error::Catalog(name)) => assert_eq!(name, "ResNet50"),
            other => panic!("expected catalog error, got {:?}", other.map(|m| m.name().to_string())),
        }
        assert!(!cache.exists());
        assert!(registry.loaded_names().await.is_empty());
    }

    #[tokio::test]
    async fn corrupt_cached_artifact_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ModelRegistry::new(dir.path());

        // Seed a corrupt artifact so provisioning skips the network and the
        // failure comes from deserialization.
        let descriptor = catalog::find("MobileNet").unwrap();
        let path = dir.path().join(catalog::artifact_filename(descriptor.name));
        tokio::fs::write(&path, b"truncated garbage").await.unwrap();

        assert!(registry.get_or_load("MobileNet").await.is_err());
        assert!(registry.loaded_names().await.is_empty());
    }
}
