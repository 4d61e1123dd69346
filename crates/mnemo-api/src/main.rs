//! mnemo-api - HTTP API server for mnemo

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mnemo_api::services::purge::PurgeConfig;
use mnemo_api::{router, AppState};
use mnemo_auth::{CredentialVault, IdentityManager, TokenService};
use mnemo_core::{ExtractionService, StubExtraction, VectorIndex};
use mnemo_index::MemoryVectorIndex;
use mnemo_store::{FilesystemObjectStorage, MemoryObjectStorage, ObjectStorage, Store};

/// Development fallback signing secret.
///
/// Rotating the real secret invalidates all outstanding tokens, and so
/// does restarting with this fallback — deployments must set
/// `TOKEN_SECRET`.
const DEV_TOKEN_SECRET: &str = "mnemo-dev-secret-change-me";

/// Parse allowed origins from comma-separated environment variable.
///
/// `ALLOWED_ORIGINS` - comma-separated list of allowed origins.
/// Defaults to the local dev frontends when unset or empty.
fn parse_allowed_origins() -> Vec<HeaderValue> {
    let origins_str = std::env::var("ALLOWED_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://localhost:5173".to_string());

    if origins_str.trim().is_empty() {
        return vec![
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://localhost:5173"),
        ];
    }

    origins_str
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!("Invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with configurable output
    //
    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   LOG_FILE    - path to log file (optional, enables file logging)
    //   LOG_ANSI    - "true"/"false" override ANSI colors
    //   RUST_LOG    - standard env filter (default: "mnemo_api=debug,tower_http=debug")
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "mnemo_api=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    // Optionally create a file appender with daily rotation
    let _file_guard = if let Some(ref path) = log_file {
        let file_dir = std::path::Path::new(path)
            .parent()
            .unwrap_or(std::path::Path::new("."));
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("mnemo-api.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false), // no ANSI in files
                )
                .init();
        }
        Some(guard)
    } else {
        // Console-only output
        if log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer();
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );

    // Get configuration from environment
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "8000".to_string())
        .parse()
        .unwrap_or(8000);

    let token_secret = std::env::var("TOKEN_SECRET").unwrap_or_else(|_| {
        warn!("TOKEN_SECRET not set; falling back to the built-in development secret");
        DEV_TOKEN_SECRET.to_string()
    });

    // Initialize object storage; FILE_STORAGE_PATH switches the backend
    // from memory to the filesystem
    let objects: Arc<dyn ObjectStorage> = match std::env::var("FILE_STORAGE_PATH") {
        Ok(path) => {
            let storage = FilesystemObjectStorage::new(&path);
            if let Err(e) = storage.validate().await {
                anyhow::bail!("file storage validation failed at {}: {}", path, e);
            }
            info!("File storage initialized at {}", path);
            Arc::new(storage)
        }
        Err(_) => {
            info!("Using in-memory object storage");
            Arc::new(MemoryObjectStorage::default())
        }
    };

    // Remaining collaborators: in-memory vector index, placeholder
    // extraction
    let index: Arc<dyn VectorIndex> = Arc::new(MemoryVectorIndex::new());
    let extraction: Arc<dyn ExtractionService> = Arc::new(StubExtraction);

    // Create store and identity manager
    let store = Store::new();
    let identity = Arc::new(IdentityManager::new(
        store.users.clone(),
        CredentialVault::new(),
        TokenService::new(token_secret.as_bytes()),
    ));

    let state = AppState::new(
        store,
        identity,
        extraction,
        objects,
        index,
        PurgeConfig::default(),
    );

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(parse_allowed_origins()))
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let app = router(state).layer(cors);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("mnemo-api listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
