pub mod admin;
pub mod auth;
pub mod bookings;
pub mod chat;
pub mod site;

use axum::{middleware::from_fn_with_state, Router};

use crate::state::AppState;

pub fn api_router(state: AppState) -> Router<AppState> {
    let admin = admin::router().route_layer(from_fn_with_state(state.clone(), auth::require_admin));

    Router::new()
        .nest("/auth", auth::router(state))
        .nest("/site", site::router())
        .nest("/bookings", bookings::router())
        .nest("/chat", chat::router())
        .nest("/admin", admin)
}
