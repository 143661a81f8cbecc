use crate::shared::core::primitives::RoomId;
use chrono::NaiveDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckAvailability {
    pub room_id: RoomId,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}
