// Ports define what the booking core needs from the outside world, without implementing it.
//
// Purpose
// - Describe data access, user lookup and payment gateways as traits.
//
// Responsibilities
// - Keep the core independent of any database or gateway by coding against traits.
// - Make the one race that matters explicit: `load_blocking` returns a version, and
//   `append` only succeeds if no reservation was appended since. Deciding between
//   the two is therefore atomic with respect to other bookings.
//
// Testing guidance
// - The in-memory adapter implements every port and can be taken offline or slowed down.

use crate::modules::reservations::core::catalog::{DateOverride, Equipment, Room, WeeklySchedule};
use crate::modules::reservations::core::payment::{Payment, PaymentMethod, PaymentStatus};
use crate::modules::reservations::core::payments::methods::PaymentMethodType;
use crate::modules::reservations::core::reservation::{Reservation, ReservationStatus};
use crate::modules::reservations::core::role::Role;
use crate::shared::core::primitives::{
    EquipmentId, PaymentMethodId, ReservationId, RoomId, TimeRange, UserId,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("version mismatch: expected {expected}, actual {actual}")]
    VersionMismatch { expected: u64, actual: u64 },

    #[error("{entity} {id} is {actual}, expected {expected}")]
    StatusMismatch {
        entity: &'static str,
        id: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("backend error: {0}")]
    Backend(String),
}

/// Blocking reservations overlapping an interval, across all rooms, with the
/// ledger version they were read at.
#[derive(Debug, Clone)]
pub struct LoadedReservations {
    pub reservations: Vec<Reservation>,
    pub version: u64,
}

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn room(&self, id: RoomId) -> Result<Option<Room>, StoreError>;
    async fn equipment(&self, id: EquipmentId) -> Result<Option<Equipment>, StoreError>;
    async fn weekly_schedules(&self, room_id: RoomId) -> Result<Vec<WeeklySchedule>, StoreError>;
    /// Overrides for `room_id` dated within `from..=to`.
    async fn date_overrides(
        &self,
        room_id: RoomId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DateOverride>, StoreError>;
}

#[async_trait]
pub trait RateRepository: Send + Sync {
    async fn room_rate(&self, room_id: RoomId, role: Role) -> Result<Option<Decimal>, StoreError>;
    async fn equipment_rate(
        &self,
        equipment_id: EquipmentId,
        role: Role,
    ) -> Result<Option<Decimal>, StoreError>;
}

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    async fn load_blocking(&self, range: TimeRange) -> Result<LoadedReservations, StoreError>;
    async fn append(&self, reservation: Reservation, expected_version: u64) -> Result<(), StoreError>;
    async fn get(&self, id: ReservationId) -> Result<Option<Reservation>, StoreError>;
    /// Compare-and-set on the current status.
    async fn transition(
        &self,
        id: ReservationId,
        expected: ReservationStatus,
        next: ReservationStatus,
    ) -> Result<Reservation, StoreError>;
    async fn pending_created_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Reservation>, StoreError>;
}

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Inserts a Pending attempt. Fails with `Conflict` while the reservation
    /// already has a Pending or Completed payment.
    async fn open_attempt(&self, payment: Payment) -> Result<(), StoreError>;
    /// Replaces a payment if its stored status is still `expected`.
    async fn update(&self, payment: Payment, expected: PaymentStatus) -> Result<(), StoreError>;
    async fn for_reservation(&self, reservation_id: ReservationId) -> Result<Vec<Payment>, StoreError>;
}

#[async_trait]
pub trait PaymentMethodRepository: Send + Sync {
    async fn payment_method(&self, id: PaymentMethodId) -> Result<Option<PaymentMethod>, StoreError>;
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn role_of(&self, user_id: UserId) -> Result<Option<Role>, StoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayCharge {
    pub method: PaymentMethodType,
    pub amount: Decimal,
    pub payer_reference: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReceipt {
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("payment declined: {0}")]
    Declined(String),

    #[error("gateway unavailable: {0}")]
    Unavailable(String),

    #[error("gateway timed out after {0:?}")]
    Timeout(Duration),
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn charge(&self, charge: GatewayCharge) -> Result<PaymentReceipt, GatewayError>;
}
