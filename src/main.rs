mod config;
mod error;
mod freshness;
mod handlers;
mod keys;
mod storage;

use std::collections::HashSet;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use config::Config;
pub use error::{AppError, Result};

pub struct AppState {
    pub config: Config,
    pub templates: tera::Tera,
    pub s3_client: aws_sdk_s3::Client,
    pub allowed_apps: HashSet<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load config file if present, fall back to plain environment variables
    dotenvy::from_filename("app.config").ok();
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load config; missing required settings are fatal here
    let config = Config::from_env()?;
    let allowed_apps = config.allowed_apps();

    // Initialize templates
    let templates = tera::Tera::new("templates/**/*")?;

    // Initialize S3 client (avoid aws-config to reduce dependencies/compile time)
    let mut s3_config = aws_sdk_s3::Config::builder()
        .credentials_provider(aws_sdk_s3::config::Credentials::new(
            &config.s3_access_key_id,
            &config.s3_secret_access_key,
            None,
            None,
            "backup-dashboard",
        ))
        .region(aws_sdk_s3::config::Region::new(config.s3_region.clone()));
    if let Some(endpoint) = &config.s3_endpoint {
        s3_config = s3_config.endpoint_url(endpoint);
    }
    let s3_client = aws_sdk_s3::Client::from_conf(s3_config.build());

    let state = Arc::new(AppState {
        config: config.clone(),
        templates,
        s3_client,
        allowed_apps,
    });

    // Build router
    let app = Router::new()
        .route("/", get(handlers::dashboard::index))
        .route("/health", get(handlers::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
