// Domain error taxonomy for scheduling, pricing and payment.
//
// Responsibilities
// - Carry enough structure (which entity, which constraint) for a caller to
//   render a specific message. No failure path collapses into a bare boolean.

use crate::modules::reservations::core::payments::methods::PaymentMethodType;
use crate::modules::reservations::core::role::Role;
use crate::shared::core::primitives::{
    EquipmentId, InvalidInterval, PaymentId, PaymentMethodId, ReservationId, RoomId, UserId,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSubject {
    Room(RoomId),
    Equipment(EquipmentId),
}

impl fmt::Display for RateSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateSubject::Room(id) => write!(f, "room {id}"),
            RateSubject::Equipment(id) => write!(f, "equipment {id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnavailableReason {
    RoomInactive,
    /// No weekly hours and no open override on this date.
    Closed { date: NaiveDate },
    ClosedByOverride {
        date: NaiveDate,
        label: Option<String>,
    },
    OutsideOpeningHours { date: NaiveDate },
    Overlaps { reservation_id: ReservationId },
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnavailableReason::RoomInactive => f.write_str("room is inactive"),
            UnavailableReason::Closed { date } => write!(f, "closed on {date}"),
            UnavailableReason::ClosedByOverride { date, label: Some(label) } => {
                write!(f, "closed on {date} ({label})")
            }
            UnavailableReason::ClosedByOverride { date, label: None } => {
                write!(f, "closed on {date} by override")
            }
            UnavailableReason::OutsideOpeningHours { date } => {
                write!(f, "outside opening hours on {date}")
            }
            UnavailableReason::Overlaps { reservation_id } => {
                write!(f, "overlaps reservation {reservation_id}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    #[error(transparent)]
    InvalidInterval(#[from] InvalidInterval),

    #[error("room {room_id} is not available: {reason}")]
    SlotUnavailable {
        room_id: RoomId,
        reason: UnavailableReason,
    },

    #[error("no {role} rate configured for {subject}")]
    RateNotFound { subject: RateSubject, role: Role },

    #[error("quantity {quantity} for equipment {equipment_id} must be positive")]
    InvalidQuantity {
        equipment_id: EquipmentId,
        quantity: i64,
    },

    #[error("equipment {equipment_id}: {requested} requested, {available} available")]
    InsufficientStock {
        equipment_id: EquipmentId,
        requested: u32,
        available: u32,
    },

    #[error("unknown payment method `{type_key}`")]
    UnknownMethod { type_key: String },

    #[error("invalid {method} options, missing: {}", .missing.join(", "))]
    InvalidPaymentOptions {
        method: PaymentMethodType,
        missing: Vec<String>,
    },

    #[error("payment {payment_id} failed: {reason}")]
    PaymentProcessingFailed { payment_id: PaymentId, reason: String },

    #[error("amount {0} must not be negative")]
    InvalidAmount(Decimal),

    #[error("reservation {reservation_id} costs {expected}, got {actual}")]
    AmountMismatch {
        reservation_id: ReservationId,
        expected: Decimal,
        actual: Decimal,
    },

    #[error("room {0} not found")]
    RoomNotFound(RoomId),

    #[error("equipment {0} not found")]
    EquipmentNotFound(EquipmentId),

    #[error("reservation {0} not found")]
    ReservationNotFound(ReservationId),

    #[error("payment method {0} not found")]
    PaymentMethodNotFound(PaymentMethodId),

    #[error("user {0} not found")]
    UserNotFound(UserId),

    #[error("{entity} cannot move from {from} to {to}")]
    InvalidTransition {
        entity: &'static str,
        from: &'static str,
        to: &'static str,
    },

    #[error("reservation {0} has no completed payment")]
    PaymentRequired(ReservationId),

    #[error("reservation {0} is already paid")]
    AlreadyPaid(ReservationId),

    #[error("reservation {reservation_id} has a {status} payment")]
    PaymentOutstanding {
        reservation_id: ReservationId,
        status: &'static str,
    },
}

impl BookingError {
    /// Stable machine-readable code for transports.
    pub fn code(&self) -> &'static str {
        match self {
            BookingError::InvalidInterval(_) => "INVALID_INTERVAL",
            BookingError::SlotUnavailable { .. } => "SLOT_UNAVAILABLE",
            BookingError::RateNotFound { .. } => "RATE_NOT_FOUND",
            BookingError::InvalidQuantity { .. } => "INVALID_QUANTITY",
            BookingError::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            BookingError::UnknownMethod { .. } => "UNKNOWN_METHOD",
            BookingError::InvalidPaymentOptions { .. } => "INVALID_PAYMENT_OPTIONS",
            BookingError::PaymentProcessingFailed { .. } => "PAYMENT_PROCESSING_FAILED",
            BookingError::InvalidAmount(_) => "INVALID_AMOUNT",
            BookingError::AmountMismatch { .. } => "AMOUNT_MISMATCH",
            BookingError::RoomNotFound(_) => "ROOM_NOT_FOUND",
            BookingError::EquipmentNotFound(_) => "EQUIPMENT_NOT_FOUND",
            BookingError::ReservationNotFound(_) => "RESERVATION_NOT_FOUND",
            BookingError::PaymentMethodNotFound(_) => "PAYMENT_METHOD_NOT_FOUND",
            BookingError::UserNotFound(_) => "USER_NOT_FOUND",
            BookingError::InvalidTransition { .. } => "INVALID_TRANSITION",
            BookingError::PaymentRequired(_) => "PAYMENT_REQUIRED",
            BookingError::AlreadyPaid(_) => "ALREADY_PAID",
            BookingError::PaymentOutstanding { .. } => "PAYMENT_OUTSTANDING",
        }
    }
}
