use axum::{
    Json, extract::State, extract::rejection::JsonRejection, http::StatusCode,
    response::IntoResponse,
};
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::modules::reservations::core::catalog::EquipmentLine;
use crate::modules::reservations::core::reservation::ReservationStatus;
use crate::modules::reservations::use_cases::create_pending_reservation::command::CreatePendingReservation;
use crate::shared::core::primitives::{ReservationId, RoomId, UserId};
use crate::shell::state::AppState;

#[derive(Deserialize)]
pub struct CreateReservationBody {
    pub room_id: RoomId,
    pub user_id: UserId,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default)]
    pub equipment: Vec<EquipmentLine>,
}

#[derive(Serialize)]
pub struct CreateReservationResponse {
    pub reservation_id: ReservationId,
    pub status: ReservationStatus,
}

pub async fn handle(
    State(state): State<AppState>,
    body: Result<Json<CreateReservationBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };

    let command = CreatePendingReservation {
        room_id: body.room_id,
        user_id: body.user_id,
        start: body.start,
        end: body.end,
        equipment: body.equipment,
        requested_at: Utc::now(),
    };

    match state.create_reservation.handle(command).await {
        Ok(reservation) => (
            StatusCode::CREATED,
            Json(CreateReservationResponse {
                reservation_id: reservation.id,
                status: reservation.status,
            }),
        )
            .into_response(),
        Err(error) => error.into_response(),
    }
}
