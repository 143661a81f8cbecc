use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::modules::reservations::use_cases::pay_for_reservation::command::{
    PayForReservation, PaymentSource,
};
use crate::shared::core::primitives::{PaymentMethodId, ReservationId};
use crate::shell::state::AppState;

/// Either `method` with `options`, or the id of a saved payment method.
#[derive(Deserialize)]
pub struct PayBody {
    pub amount: Decimal,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub options: Value,
    #[serde(default)]
    pub payment_method_id: Option<PaymentMethodId>,
}

impl PayBody {
    fn source(self) -> Option<PaymentSource> {
        match (self.payment_method_id, self.method) {
            (Some(id), None) => Some(PaymentSource::Saved(id)),
            (None, Some(type_key)) => Some(PaymentSource::Raw {
                type_key,
                options: self.options,
            }),
            _ => None,
        }
    }
}

pub async fn handle(
    State(state): State<AppState>,
    Path(reservation_id): Path<ReservationId>,
    body: Result<Json<PayBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };
    let amount = body.amount;
    let Some(source) = body.source() else {
        return StatusCode::UNPROCESSABLE_ENTITY.into_response();
    };

    let command = PayForReservation {
        reservation_id,
        source,
        amount,
        requested_at: Utc::now(),
    };

    match state.pay_for_reservation.handle(command).await {
        Ok(payment) => (StatusCode::CREATED, Json(payment)).into_response(),
        Err(error) => error.into_response(),
    }
}
