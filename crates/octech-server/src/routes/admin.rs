use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use octech_core::{
    filter_appointments, filter_clients, fixtures, AppointmentError, AppointmentTab, ClientTab,
};
use octech_schema::{Appointment, AppointmentStatus, Client, DashboardOverview};
use serde::Deserialize;

use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub tab: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: AppointmentStatus,
}

/// Mounted behind `require_admin`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/clients", get(list_clients))
        .route("/appointments", get(list_appointments))
        .route("/appointments/{id}", get(get_appointment))
        .route("/appointments/{id}/status", patch(update_status))
        .route("/dashboard", get(dashboard))
}

pub async fn list_clients(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Client>>, StatusCode> {
    let tab = parse_tab::<ClientTab>(params.tab.as_deref())?;
    let search = params.search.unwrap_or_default();
    Ok(Json(filter_clients(&state.clients, tab, &search)))
}

pub async fn list_appointments(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Appointment>>, StatusCode> {
    let tab = parse_tab::<AppointmentTab>(params.tab.as_deref())?;
    let search = params.search.unwrap_or_default();
    let book = state.appointments.read().await;
    Ok(Json(filter_appointments(book.list(), tab, &search)))
}

pub async fn get_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Appointment>, StatusCode> {
    state
        .appointments
        .read()
        .await
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<StatusBody>,
) -> Result<Json<Appointment>, StatusCode> {
    let mut book = state.appointments.write().await;
    match book.set_status(&id, body.status) {
        Ok(appointment) => Ok(Json(appointment.clone())),
        Err(AppointmentError::NotFound(_)) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!(error = %e, "appointment status update failed");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

pub async fn dashboard() -> Json<DashboardOverview> {
    Json(fixtures::dashboard())
}

fn parse_tab<T>(raw: Option<&str>) -> Result<T, StatusCode>
where
    T: Default + std::str::FromStr,
{
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(T::default()),
        Some(name) => name.parse().map_err(|_| StatusCode::BAD_REQUEST),
    }
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::Request, middleware::from_fn_with_state, response::Response};
    use tower::ServiceExt;

    use super::*;
    use crate::routes::auth::require_admin;
    use crate::state::test_support;

    fn app(state: AppState) -> Router {
        router()
            .route_layer(from_fn_with_state(state.clone(), require_admin))
            .with_state(state)
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn authed(method: &str, uri: &str, token: &str, body: Body) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", format!("Bearer {token}"))
            .header("content-type", "application/json")
            .body(body)
            .unwrap()
    }

    #[tokio::test]
    async fn admin_routes_reject_missing_or_bad_token() {
        let state = test_support::state();
        let app = app(state);

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/clients").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(authed("GET", "/dashboard", "forged", Body::empty()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn clients_filter_by_tab_and_search() {
        let state = test_support::state();
        let token = test_support::admin_token(&state).await;

        let response = app(state)
            .oneshot(authed(
                "GET",
                "/clients?tab=leads&search=sarah",
                &token,
                Body::empty(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let names: Vec<_> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["Sarah Johnson"]);
    }

    #[tokio::test]
    async fn unknown_tab_is_bad_request() {
        let state = test_support::state();
        let token = test_support::admin_token(&state).await;

        let response = app(state)
            .oneshot(authed("GET", "/appointments?tab=someday", &token, Body::empty()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn status_change_moves_appointment_between_tabs() {
        let state = test_support::state();
        let token = test_support::admin_token(&state).await;
        let app = app(state);

        let response = app
            .clone()
            .oneshot(authed(
                "PATCH",
                "/appointments/2/status",
                &token,
                Body::from(r#"{"status":"confirmed"}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "confirmed");

        let response = app
            .clone()
            .oneshot(authed("GET", "/appointments?tab=pending", &token, Body::empty()))
            .await
            .unwrap();
        assert!(body_json(response).await.as_array().unwrap().is_empty());

        let response = app
            .oneshot(authed("GET", "/appointments/2", &token, Body::empty()))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["status"], "confirmed");
    }

    #[tokio::test]
    async fn status_change_on_missing_appointment_is_not_found() {
        let state = test_support::state();
        let token = test_support::admin_token(&state).await;

        let response = app(state)
            .oneshot(authed(
                "PATCH",
                "/appointments/99/status",
                &token,
                Body::from(r#"{"status":"cancelled"}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn dashboard_lists_stats() {
        let state = test_support::state();
        let token = test_support::admin_token(&state).await;

        let response = app(state)
            .oneshot(authed("GET", "/dashboard", &token, Body::empty()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["stats"].as_array().unwrap().len(), 4);
        assert!(!json["upcoming_appointments"].as_array().unwrap().is_empty());
    }
}
