//! Shelf gateway server binary.
//!
//! Resolves configuration from the environment, builds the GitHub-backed
//! store, and serves the REST surface. A gateway with missing required
//! settings still starts: it answers every request with the configuration
//! error until the environment is fixed and the process restarted, so a
//! misconfiguration is visible at the HTTP surface rather than a crash
//! loop.
//!
//! # Environment Variables
//! - `GITHUB_TOKEN`: write-scoped access token for the storage repository
//! - `GITHUB_OWNER`: account or organisation owning the repository
//! - `GITHUB_REPO`: repository name
//! - `GITHUB_BRANCH`: branch to store on (default: "main")
//! - `GITHUB_API_URL`: upstream API root (default: "https://api.github.com")
//! - `SHELF_ADDR`: server address (default: "0.0.0.0:3000")

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use shelf_core::{ContentsStore, GatewayConfig};
use shelf_github::GithubStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("shelf_run=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("shelf_github=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("SHELF_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let store: Option<Arc<dyn ContentsStore>> = match GatewayConfig::from_env() {
        Ok(cfg) => {
            tracing::info!(
                "++ Storage repository {}/{} (branch {})",
                cfg.owner(),
                cfg.repo(),
                cfg.branch()
            );
            let store: Arc<dyn ContentsStore> = Arc::new(GithubStore::new(Arc::new(cfg))?);
            Some(store)
        }
        Err(e) => {
            tracing::warn!("{e} Requests will be rejected until configured.");
            None
        }
    };

    tracing::info!("++ Starting Shelf gateway on {}", addr);

    let app = api_rest::app(AppState::new(store));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
