pub mod frontend;
pub mod routes;
pub mod state;

use anyhow::Result;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(frontend::home_page))
        .route("/login", get(frontend::login_page))
        .route("/admin", get(frontend::admin_root))
        .route("/admin/dashboard", get(frontend::dashboard_page))
        .route("/assets/{*path}", get(frontend::asset_handler))
        .nest("/api", routes::api_router(state.clone()))
        .fallback(frontend::fallback)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(state: AppState, addr: &str) -> Result<()> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("octech-server listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
