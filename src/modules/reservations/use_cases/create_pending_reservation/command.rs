use crate::modules::reservations::core::catalog::EquipmentLine;
use crate::shared::core::primitives::{RoomId, UserId};
use chrono::{DateTime, NaiveDateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePendingReservation {
    pub room_id: RoomId,
    pub user_id: UserId,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub equipment: Vec<EquipmentLine>,
    pub requested_at: DateTime<Utc>,
}
