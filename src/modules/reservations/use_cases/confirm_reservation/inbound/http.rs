use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::shared::core::primitives::ReservationId;
use crate::shell::state::AppState;

pub async fn handle(
    State(state): State<AppState>,
    Path(reservation_id): Path<ReservationId>,
) -> impl IntoResponse {
    match state.confirm_reservation.handle(reservation_id).await {
        Ok(reservation) => Json(reservation).into_response(),
        Err(error) => error.into_response(),
    }
}
