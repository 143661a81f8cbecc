// Maps use-case failures onto HTTP responses.
//
// Body shape: { "error": CODE, "message": text }

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::modules::reservations::application::errors::ApplicationError;
use crate::modules::reservations::core::errors::BookingError;
use crate::modules::reservations::core::ports::StoreError;

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

pub fn status_of(error: &ApplicationError) -> StatusCode {
    match error {
        ApplicationError::Domain(domain) => match domain {
            BookingError::InvalidInterval(_)
            | BookingError::InvalidQuantity { .. }
            | BookingError::InvalidPaymentOptions { .. }
            | BookingError::InvalidAmount(_)
            | BookingError::AmountMismatch { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            BookingError::SlotUnavailable { .. }
            | BookingError::InsufficientStock { .. }
            | BookingError::InvalidTransition { .. }
            | BookingError::PaymentRequired(_)
            | BookingError::AlreadyPaid(_)
            | BookingError::PaymentOutstanding { .. } => StatusCode::CONFLICT,
            BookingError::RoomNotFound(_)
            | BookingError::EquipmentNotFound(_)
            | BookingError::ReservationNotFound(_)
            | BookingError::PaymentMethodNotFound(_)
            | BookingError::UserNotFound(_) => StatusCode::NOT_FOUND,
            BookingError::UnknownMethod { .. } => StatusCode::BAD_REQUEST,
            BookingError::PaymentProcessingFailed { .. } => StatusCode::PAYMENT_REQUIRED,
            BookingError::RateNotFound { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        },
        ApplicationError::Store(store) => match store {
            StoreError::VersionMismatch { .. }
            | StoreError::StatusMismatch { .. }
            | StoreError::Conflict(_) => StatusCode::CONFLICT,
            StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
            StoreError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
        },
    }
}

fn code_of(error: &ApplicationError) -> &'static str {
    match error {
        ApplicationError::Domain(domain) => domain.code(),
        ApplicationError::Store(StoreError::VersionMismatch { .. }) => "CONCURRENT_UPDATE",
        ApplicationError::Store(StoreError::StatusMismatch { .. }) => "CONCURRENT_UPDATE",
        ApplicationError::Store(StoreError::Conflict(_)) => "CONFLICT",
        ApplicationError::Store(StoreError::NotFound { .. }) => "NOT_FOUND",
        ApplicationError::Store(StoreError::Backend(_)) => "INTERNAL",
    }
}

impl IntoResponse for ApplicationError {
    fn into_response(self) -> Response {
        let status = status_of(&self);
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        // Backend details stay in the log.
        let message = match &self {
            ApplicationError::Store(StoreError::Backend(_)) => "internal error".to_string(),
            other => other.to_string(),
        };
        let body = ErrorBody {
            error: code_of(&self),
            message,
        };
        (status, Json(body)).into_response()
    }
}
