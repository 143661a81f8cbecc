// Reservation record and its lifecycle.
//
// Transitions
// - create -> Pending
// - Pending -> Confirmed (after a completed payment, enforced by the confirm decider)
// - Pending -> Cancelled
// - Confirmed and Cancelled are terminal.

use crate::modules::reservations::core::catalog::EquipmentLine;
use crate::modules::reservations::core::errors::BookingError;
use crate::shared::core::primitives::{ReservationId, RoomId, TimeRange, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Cancelled => "cancelled",
        }
    }

    /// Pending reservations block their slot too, so a checkout in progress
    /// cannot be double-booked.
    pub fn is_blocking(self) -> bool {
        matches!(self, ReservationStatus::Pending | ReservationStatus::Confirmed)
    }

    pub fn confirm(self) -> Result<Self, BookingError> {
        self.step(ReservationStatus::Confirmed)
    }

    pub fn cancel(self) -> Result<Self, BookingError> {
        self.step(ReservationStatus::Cancelled)
    }

    fn step(self, to: ReservationStatus) -> Result<Self, BookingError> {
        match (self, to) {
            (ReservationStatus::Pending, ReservationStatus::Confirmed)
            | (ReservationStatus::Pending, ReservationStatus::Cancelled) => Ok(to),
            (from, to) => Err(BookingError::InvalidTransition {
                entity: "reservation",
                from: from.as_str(),
                to: to.as_str(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub room_id: RoomId,
    pub user_id: UserId,
    pub range: TimeRange,
    pub status: ReservationStatus,
    pub equipment: Vec<EquipmentLine>,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    pub fn pending(
        room_id: RoomId,
        user_id: UserId,
        range: TimeRange,
        equipment: Vec<EquipmentLine>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ReservationId::new(),
            room_id,
            user_id,
            range,
            status: ReservationStatus::Pending,
            equipment,
            created_at,
        }
    }

    pub fn blocks(&self, room_id: RoomId, range: &TimeRange) -> bool {
        self.room_id == room_id && self.status.is_blocking() && self.range.overlaps(range)
    }
}

#[cfg(test)]
mod reservation_status_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ReservationStatus::Pending, Ok(ReservationStatus::Confirmed))]
    #[case(
        ReservationStatus::Confirmed,
        Err(BookingError::InvalidTransition { entity: "reservation", from: "confirmed", to: "confirmed" })
    )]
    #[case(
        ReservationStatus::Cancelled,
        Err(BookingError::InvalidTransition { entity: "reservation", from: "cancelled", to: "confirmed" })
    )]
    fn it_should_only_confirm_pending_reservations(
        #[case] from: ReservationStatus,
        #[case] expected: Result<ReservationStatus, BookingError>,
    ) {
        assert_eq!(from.confirm(), expected);
    }

    #[rstest]
    #[case(ReservationStatus::Pending, true)]
    #[case(ReservationStatus::Confirmed, false)]
    #[case(ReservationStatus::Cancelled, false)]
    fn it_should_only_cancel_pending_reservations(
        #[case] from: ReservationStatus,
        #[case] allowed: bool,
    ) {
        assert_eq!(from.cancel().is_ok(), allowed);
    }

    #[rstest]
    #[case(ReservationStatus::Pending, true)]
    #[case(ReservationStatus::Confirmed, true)]
    #[case(ReservationStatus::Cancelled, false)]
    fn it_should_block_the_slot_unless_cancelled(
        #[case] status: ReservationStatus,
        #[case] blocking: bool,
    ) {
        assert_eq!(status.is_blocking(), blocking);
    }
}
