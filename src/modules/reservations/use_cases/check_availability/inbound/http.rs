use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::modules::reservations::application::errors::ApplicationError;
use crate::modules::reservations::core::errors::BookingError;
use crate::modules::reservations::use_cases::check_availability::command::CheckAvailability;
use crate::shared::core::primitives::RoomId;
use crate::shell::state::AppState;

#[derive(Deserialize)]
pub struct AvailabilityParams {
    pub room_id: RoomId,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

#[derive(Serialize)]
pub struct AvailabilityResponse {
    pub room_id: RoomId,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

pub async fn handle(
    State(state): State<AppState>,
    params: Result<Query<AvailabilityParams>, QueryRejection>,
) -> impl IntoResponse {
    let Query(params) = match params {
        Ok(p) => p,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };

    let query = CheckAvailability {
        room_id: params.room_id,
        start: params.start,
        end: params.end,
    };
    let respond = |reason: Option<String>| AvailabilityResponse {
        room_id: params.room_id,
        start: params.start,
        end: params.end,
        available: reason.is_none(),
        reason,
    };

    match state.check_availability.handle(query).await {
        Ok(()) => Json(respond(None)).into_response(),
        Err(ApplicationError::Domain(BookingError::SlotUnavailable { reason, .. })) => {
            Json(respond(Some(reason.to_string()))).into_response()
        }
        Err(error) => error.into_response(),
    }
}
