use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{from_fn_with_state, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use octech_auth::{AdminProfile, AuthError};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

pub const SESSION_COOKIE: &str = "octech_session";
pub const DASHBOARD_PATH: &str = "/admin/dashboard";

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: AdminProfile,
    pub redirect: &'static str,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub redirect: &'static str,
}

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route_layer(from_fn_with_state(state, require_admin))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

pub async fn login(State(state): State<AppState>, Json(body): Json<LoginBody>) -> Response {
    match state.auth.login(&body.email, &body.password).await {
        Ok(grant) => {
            let cookie = session_cookie(&grant.token, state.auth.ttl_seconds());
            (
                [(header::SET_COOKIE, cookie)],
                Json(LoginResponse {
                    token: grant.token,
                    user: grant.user,
                    redirect: DASHBOARD_PATH,
                }),
            )
                .into_response()
        }
        Err(AuthError::InvalidCredentials) => {
            unauthorized(&AuthError::InvalidCredentials.to_string())
        }
        Err(e) => {
            tracing::error!(error = %e, "login failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers) {
        state.auth.logout(&token).await;
    }
    (
        [(header::SET_COOKIE, session_cookie("", 0))],
        Json(LogoutResponse { redirect: "/" }),
    )
        .into_response()
}

pub async fn me(Extension(profile): Extension<AdminProfile>) -> Json<AdminProfile> {
    Json(profile)
}

/// Verifies the bearer token or session cookie on every request and hands
/// the profile to the handler as an extension.
pub async fn require_admin(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let Some(token) = session_token(req.headers()) else {
        return unauthorized("Missing session token");
    };

    match state.auth.verify(&token).await {
        Ok(profile) => {
            req.extensions_mut().insert(profile);
            next.run(req).await
        }
        Err(e) => unauthorized(&e.to_string()),
    }
}

/// `Authorization: Bearer <token>` wins over the session cookie.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    bearer_token(headers).or_else(|| cookie_token(headers))
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == SESSION_COOKIE && !value.is_empty()).then(|| value.to_string())
        })
}

fn session_cookie(token: &str, max_age: i64) -> String {
    format!("{SESSION_COOKIE}={token}; HttpOnly; Path=/; SameSite=Lax; Max-Age={max_age}")
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}
