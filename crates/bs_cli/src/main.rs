use std::path::PathBuf;
use std::sync::Arc;

use bs_core::{recommend, Result};
use bs_models::{catalog, ArtifactFetcher, ModelRegistry};
use bs_web::AppState;
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "X-ray fracture screening and prescription service", long_about = None)]
struct Cli {
    /// Directory where downloaded model artifacts are cached
    #[arg(long, default_value = "models")]
    cache_dir: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the HTTP service
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: String,
    },
    /// List the models available in the catalog
    Models,
    /// Download a model artifact into the local cache
    Fetch {
        /// Display name, e.g. DenseNet169
        model: String,
    },
    /// Classify a single X-ray image from disk
    Analyze {
        image: PathBuf,
        #[arg(long, default_value = "DenseNet169")]
        model: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    let registry = Arc::new(ModelRegistry::new(&cli.cache_dir));

    match cli.command {
        Commands::Serve { addr } => {
            let app = bs_web::create_app(AppState { registry }).await;
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            info!("🦴 Serving on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Models => {
            for name in catalog::model_names() {
                println!("{}", name);
            }
        }
        Commands::Fetch { model } => {
            let descriptor = catalog::find(&model)?;
            let fetcher = ArtifactFetcher::new(&cli.cache_dir);
            let path = fetcher.ensure_artifact(descriptor).await?;
            info!("✨ {} available at {}", model, path.display());
        }
        Commands::Analyze { image, model } => {
            let bytes = tokio::fs::read(&image).await?;
            let loaded = registry.get_or_load(&model).await?;
            let result = bs_inference::analyze(&loaded, &bytes)?;
            println!("Status: {}", result.verdict.label());
            println!("Confidence: {}", result.confidence_display());
            for line in recommend::recommendations(result.verdict) {
                println!("- {}", line);
            }
        }
    }

    Ok(())
}
