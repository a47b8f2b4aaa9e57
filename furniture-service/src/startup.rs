//! Application startup and lifecycle management.

use crate::config::{FurnitureConfig, StoreBackend};
use crate::handlers;
use crate::services::{DocumentStore, MemoryStore, MongoStore};
use axum::{middleware::from_fn, routing::get, Router};
use service_core::error::AppError;
use service_core::middleware::{metrics_middleware, permissive_cors, request_id_middleware};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: FurnitureConfig,
    pub store: Arc<dyn DocumentStore>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/api/hello", get(handlers::hello))
        .route("/test", get(handlers::test_database))
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route(
            "/api/furniture",
            get(handlers::list_furniture).post(handlers::create_furniture),
        )
        .route(
            "/api/furniture/:id",
            get(handlers::get_furniture)
                .put(handlers::update_furniture)
                .delete(handlers::delete_furniture),
        )
        .route_layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(permissive_cors())
        .with_state(state)
}

/// Opens the configured store. A Mongo store that cannot connect comes back
/// disconnected rather than failing startup.
pub async fn connect_store(config: &FurnitureConfig) -> Arc<dyn DocumentStore> {
    let store: Arc<dyn DocumentStore> = match config.store {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory document store");
            Arc::new(MemoryStore::new(
                config.database.name.as_deref().unwrap_or("furniture_db"),
            ))
        }
        StoreBackend::Mongo => Arc::new(
            MongoStore::connect(
                config.database.url.as_deref(),
                config.database.name.as_deref(),
            )
            .await,
        ),
    };

    tracing::info!(
        database = ?store.database_name(),
        connected = store.is_connected(),
        "Document store ready"
    );
    store
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the store selected by `config`.
    pub async fn build(config: FurnitureConfig) -> Result<Self, AppError> {
        let store = connect_store(&config).await;
        Self::with_store(config, store).await
    }

    /// Build the application around an already opened store.
    pub async fn with_store(
        config: FurnitureConfig,
        store: Arc<dyn DocumentStore>,
    ) -> Result<Self, AppError> {
        // Port 0 picks a free port, used by the tests
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Furniture service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state: AppState { config, store },
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.state.store
    }

    /// Serve until Ctrl+C or SIGTERM, then release the store handle.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);

        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server stopped, closing store connection");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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
