use axum::{routing::get, Json, Router};
use octech_core::fixtures;
use octech_schema::{ServiceListing, Testimonial};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/services", get(services))
        .route("/testimonials", get(testimonials))
}

pub async fn services() -> Json<Vec<ServiceListing>> {
    Json(fixtures::services())
}

pub async fn testimonials() -> Json<Vec<Testimonial>> {
    Json(fixtures::testimonials())
}
