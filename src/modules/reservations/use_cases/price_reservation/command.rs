use crate::modules::reservations::core::catalog::EquipmentLine;
use crate::modules::reservations::core::role::Role;
use crate::shared::core::primitives::{RoomId, UserId};
use chrono::NaiveDateTime;

/// Whose rates apply. A user is priced at the role the directory holds for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricedAs {
    Role(Role),
    User(UserId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceReservation {
    pub room_id: RoomId,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub priced_as: PricedAs,
    pub equipment: Vec<EquipmentLine>,
}
