use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use quad_store::Database;

use crate::handlers;

/// Server configuration.
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 5000 }
    }
}

/// Shared application state passed to Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/colleges", post(handlers::add_college))
        .route(
            "/students",
            post(handlers::add_student).get(handlers::list_students),
        )
        .route("/events", post(handlers::add_event))
        .route("/register", post(handlers::register))
        .route("/attendance", post(handlers::mark_attendance))
        .route("/feedback", post(handlers::submit_feedback))
        .route("/reports/popularity", get(handlers::report_popularity))
        .route("/reports/participation", get(handlers::report_participation))
        .route("/reports/top-students", get(handlers::report_top_students))
        .route(
            "/reports/attendance-percentage",
            get(handlers::report_attendance_percentage),
        )
        .route("/reports/avg-feedback", get(handlers::report_avg_feedback))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Create and start the server. Returns a handle with the bound port.
pub async fn start(config: ServerConfig, db: Database) -> Result<ServerHandle, std::io::Error> {
    let router = build_router(AppState { db });

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(port = local_addr.port(), "quad server started");

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    Ok(ServerHandle {
        port: local_addr.port(),
        _server: server_handle,
    })
}

/// Handle returned by `start()` — keeps the serve task alive.
pub struct ServerHandle {
    pub port: u16,
    _server: tokio::task::JoinHandle<()>,
}
