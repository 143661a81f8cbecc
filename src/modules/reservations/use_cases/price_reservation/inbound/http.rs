use axum::{
    Json, extract::State, extract::rejection::JsonRejection, http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::modules::reservations::core::catalog::EquipmentLine;
use crate::modules::reservations::use_cases::price_reservation::command::{
    PriceReservation, PricedAs,
};
use crate::shared::core::primitives::{RoomId, UserId};
use crate::shell::state::AppState;

#[derive(Deserialize)]
pub struct QuoteBody {
    pub room_id: RoomId,
    pub user_id: UserId,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default)]
    pub equipment: Vec<EquipmentLine>,
}

pub async fn handle(
    State(state): State<AppState>,
    body: Result<Json<QuoteBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };

    let command = PriceReservation {
        room_id: body.room_id,
        start: body.start,
        end: body.end,
        priced_as: PricedAs::User(body.user_id),
        equipment: body.equipment,
    };

    match state.price_reservation.handle(command).await {
        Ok(quote) => Json(quote).into_response(),
        Err(error) => error.into_response(),
    }
}
