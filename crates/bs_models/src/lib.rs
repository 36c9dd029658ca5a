pub mod catalog;
pub mod fetch;
pub mod loader;
pub mod registry;

pub use fetch::ArtifactFetcher;
pub use loader::LoadedModel;
pub use registry::ModelRegistry;
