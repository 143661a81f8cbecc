// Payment attempt record and its lifecycle.
//
// Transitions
// - create -> Pending
// - Pending -> Completed | Failed
// - Completed and Failed are terminal. A retry is a new Payment row.

use crate::modules::reservations::core::errors::BookingError;
use crate::modules::reservations::core::payments::methods::PaymentMethodType;
use crate::modules::reservations::core::payments::registry::PaymentResult;
use crate::shared::core::money::to_money;
use crate::shared::core::primitives::{PaymentId, PaymentMethodId, ReservationId, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
        }
    }

    pub fn settle(self, to: PaymentStatus) -> Result<Self, BookingError> {
        match (self, to) {
            (PaymentStatus::Pending, PaymentStatus::Completed)
            | (PaymentStatus::Pending, PaymentStatus::Failed) => Ok(to),
            (from, to) => Err(BookingError::InvalidTransition {
                entity: "payment",
                from: from.as_str(),
                to: to.as_str(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub reservation_id: ReservationId,
    pub method: PaymentMethodType,
    pub amount: Decimal,
    pub status: PaymentStatus,
    pub gateway_reference: Option<String>,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    pub fn pending(
        reservation_id: ReservationId,
        method: PaymentMethodType,
        amount: Decimal,
        created_at: DateTime<Utc>,
    ) -> Result<Self, BookingError> {
        if amount.is_sign_negative() {
            return Err(BookingError::InvalidAmount(amount));
        }
        Ok(Self {
            id: PaymentId::new(),
            reservation_id,
            method,
            amount: to_money(amount),
            status: PaymentStatus::Pending,
            gateway_reference: None,
            failure_reason: None,
            created_at,
            updated_at: created_at,
        })
    }

    /// Applies a processor outcome. Only a Pending payment can be settled.
    pub fn settle(self, result: &PaymentResult, at: DateTime<Utc>) -> Result<Self, BookingError> {
        let status = self.status.settle(result.status)?;
        Ok(Self {
            status,
            gateway_reference: result.reference.clone(),
            failure_reason: result.failure_reason.clone(),
            updated_at: at,
            ..self
        })
    }

    pub fn is_open(&self) -> bool {
        matches!(self.status, PaymentStatus::Pending | PaymentStatus::Completed)
    }
}

/// A payment method saved by a user. `data` holds the options payload for `type_key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: PaymentMethodId,
    pub user_id: UserId,
    pub label: String,
    pub type_key: String,
    pub data: serde_json::Value,
}
