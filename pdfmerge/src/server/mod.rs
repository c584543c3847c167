//! HTTP server exposing the merge endpoint and the ordering page.
//!
//! Routes:
//! - `GET /` serves `views/index.html`
//! - `POST /merge` merges the uploaded `pdfs` parts (see [`handlers::merge_pdfs`])
//! - anything else is looked up in `public/`

pub mod error;
pub mod handlers;

pub use error::AppError;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get_service, post};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::config::{Layout, ServerConfig};
use crate::error::Result;
use crate::io::WriteOptions;
use crate::merge::{LopdfMerger, MergePrimitive};
use crate::staging::StagingArea;

/// Shared state of the running server.
#[derive(Clone)]
pub struct AppState {
    /// Effective configuration.
    pub config: ServerConfig,
    /// Working directories.
    pub layout: Layout,
    /// Upload and output storage.
    pub staging: StagingArea,
    /// The merge implementation.
    pub merger: Arc<dyn MergePrimitive>,
}

impl AppState {
    /// State backed by the `lopdf` merger.
    pub fn new(config: ServerConfig) -> Self {
        let merger = LopdfMerger::with_options(WriteOptions {
            compress: config.compress,
            ..Default::default()
        });
        Self::with_merger(config, Arc::new(merger))
    }

    /// State backed by a custom merge implementation.
    pub fn with_merger(config: ServerConfig, merger: Arc<dyn MergePrimitive>) -> Self {
        let layout = config.layout();
        let staging = StagingArea::new(&layout);
        Self {
            config,
            layout,
            staging,
            merger,
        }
    }
}

/// Build the application router.
pub fn create_app(state: AppState) -> Router {
    let index = ServeFile::new(state.layout.index_page());
    let assets = ServeDir::new(&state.layout.public);
    let body_limit = state.config.max_body_size;

    Router::new()
        .route("/", get_service(index))
        .route("/merge", post(handlers::merge_pdfs))
        .fallback_service(assets)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Run the server described by `config` until Ctrl+C or SIGTERM.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, a working directory
/// cannot be created or the address cannot be bound.
pub async fn serve(config: ServerConfig) -> Result<()> {
    config.validate()?;

    let state = AppState::new(config);
    state.layout.ensure().await?;

    let listener = TcpListener::bind(state.config.bind_address()).await?;
    serve_on(listener, state, shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` completes.
pub async fn serve_on<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!(
        "Merging up to {} PDFs per request, output compression {}",
        state.config.max_files,
        if state.config.compress { "on" } else { "off" }
    );

    let app = create_app(state).layer(TraceLayer::new_for_http());

    tracing::info!("Server ready at http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
