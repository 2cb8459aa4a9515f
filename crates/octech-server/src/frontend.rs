use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use rust_embed::Embed;

use crate::routes::auth::session_token;
use crate::state::AppState;

#[derive(Embed)]
#[folder = "../../web"]
struct Assets;

pub async fn home_page() -> Response {
    page("index.html")
}

pub async fn login_page() -> Response {
    page("login.html")
}

/// Anonymous visitors are sent to the login form.
pub async fn dashboard_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(token) = session_token(&headers) else {
        return Redirect::to("/login").into_response();
    };

    match state.auth.verify(&token).await {
        Ok(_) => page("dashboard.html"),
        Err(e) => {
            tracing::debug!(error = %e, "dashboard session rejected");
            Redirect::to("/login").into_response()
        }
    }
}

pub async fn admin_root() -> Redirect {
    Redirect::to("/admin/dashboard")
}

pub async fn asset_handler(Path(path): Path<String>) -> Response {
    let path = format!("assets/{path}");
    match Assets::get(&path) {
        Some(content) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, mime.as_ref().to_string()),
                    (header::CACHE_CONTROL, "public, max-age=60".to_string()),
                ],
                content.data.into_response(),
            )
                .into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Unknown paths go back to the marketing page.
pub async fn fallback() -> Redirect {
    Redirect::to("/")
}

fn page(name: &str) -> Response {
    match Assets::get(name) {
        Some(content) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
                (
                    header::CACHE_CONTROL,
                    "no-cache, no-store, must-revalidate".to_string(),
                ),
            ],
            content.data.into_response(),
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Html(format!("<h1>Page not found</h1><p>{name} is not bundled.</p>")),
        )
            .into_response(),
    }
}
