use crate::shared::core::primitives::{PaymentMethodId, ReservationId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;

/// Where the payment options come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentSource {
    /// A method type key plus its options payload, as submitted.
    Raw { type_key: String, options: Value },
    /// A method the reservation's user saved earlier.
    Saved(PaymentMethodId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayForReservation {
    pub reservation_id: ReservationId,
    pub source: PaymentSource,
    pub amount: Decimal,
    pub requested_at: DateTime<Utc>,
}
