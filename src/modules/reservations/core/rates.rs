use crate::modules::reservations::core::role::Role;
use crate::shared::core::primitives::{EquipmentId, RoomId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Hourly room price for one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRoleRate {
    pub room_id: RoomId,
    pub role: Role,
    pub hourly_rate: Decimal,
}

/// Hourly price per unit of equipment for one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentRoleRate {
    pub equipment_id: EquipmentId,
    pub role: Role,
    pub hourly_rate: Decimal,
}

pub fn is_valid_rate(rate: Decimal) -> bool {
    !rate.is_sign_negative() || rate.is_zero()
}
