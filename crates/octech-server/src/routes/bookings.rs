use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use octech_core::{send_booking_confirmation, BookingReceipt, BookingRequest};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(create_booking))
}

/// Confirms by email then SMS. A booking whose time parses also lands in
/// the appointment book as `pending`, unless the book is full.
pub async fn create_booking(
    State(state): State<AppState>,
    Json(request): Json<BookingRequest>,
) -> Result<Json<BookingReceipt>, StatusCode> {
    let mut receipt =
        send_booking_confirmation(state.email.as_ref(), state.sms.as_ref(), &request)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "booking confirmation failed");
                StatusCode::INTERNAL_SERVER_ERROR
            })?;

    match request.start() {
        Some(start) => {
            let added = state.appointments.write().await.add_pending(
                &request.name,
                &request.email,
                &request.phone,
                &request.service,
                start,
            );
            match added {
                Ok(id) => {
                    tracing::info!(appointment = %id, service = %request.service, "booking recorded");
                    receipt.appointment_id = Some(id);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "booking confirmed but not recorded");
                }
            }
        }
        None => {
            tracing::warn!(time = %request.time, "booking time not understood; no appointment recorded");
        }
    }

    Ok(Json(receipt))
}
