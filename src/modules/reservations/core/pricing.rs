// Pure price arithmetic.
//
// Rules
// - Billed hours are the duration rounded up to whole hours, minimum 1.
// - room line = room rate * billed hours
// - equipment line = equipment rate * quantity * billed hours
// - Amounts are decimals rounded to cents. Never floats.

use crate::modules::reservations::core::catalog::EquipmentLine;
use crate::modules::reservations::core::errors::BookingError;
use crate::modules::reservations::core::role::Role;
use crate::shared::core::money::to_money;
use crate::shared::core::primitives::{EquipmentId, RoomId, TimeRange};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const MILLIS_PER_HOUR: i64 = 3_600_000;

pub fn billed_hours(range: &TimeRange) -> u32 {
    let millis = range.duration().num_milliseconds().max(1);
    let hours = (millis + MILLIS_PER_HOUR - 1) / MILLIS_PER_HOUR;
    u32::try_from(hours).unwrap_or(u32::MAX).max(1)
}

/// Rejects non-positive quantities and folds repeated equipment into one line.
pub fn normalize_lines(lines: &[EquipmentLine]) -> Result<Vec<(EquipmentId, u32)>, BookingError> {
    let mut normalized: Vec<(EquipmentId, u32)> = Vec::new();
    for line in lines {
        let quantity = u32::try_from(line.quantity)
            .ok()
            .filter(|quantity| *quantity > 0)
            .ok_or(BookingError::InvalidQuantity {
                equipment_id: line.equipment_id,
                quantity: line.quantity,
            })?;
        match normalized.iter_mut().find(|(id, _)| *id == line.equipment_id) {
            Some((_, total)) => *total = total.saturating_add(quantity),
            None => normalized.push((line.equipment_id, quantity)),
        }
    }
    Ok(normalized)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum PriceItem {
    Room(RoomId),
    Equipment(EquipmentId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLine {
    pub item: PriceItem,
    pub hourly_rate: Decimal,
    pub quantity: u32,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub room_id: RoomId,
    pub role: Role,
    pub range: TimeRange,
    pub billed_hours: u32,
    pub lines: Vec<PriceLine>,
    pub total: Decimal,
}

/// `equipment` holds (id, quantity, hourly rate) for already validated lines.
pub fn quote(
    room_id: RoomId,
    role: Role,
    range: TimeRange,
    room_rate: Decimal,
    equipment: &[(EquipmentId, u32, Decimal)],
) -> PriceQuote {
    let hours = Decimal::from(billed_hours(&range));
    let mut lines = Vec::with_capacity(equipment.len() + 1);
    lines.push(PriceLine {
        item: PriceItem::Room(room_id),
        hourly_rate: room_rate,
        quantity: 1,
        amount: to_money(room_rate * hours),
    });
    for (equipment_id, quantity, rate) in equipment {
        lines.push(PriceLine {
            item: PriceItem::Equipment(*equipment_id),
            hourly_rate: *rate,
            quantity: *quantity,
            amount: to_money(*rate * Decimal::from(*quantity) * hours),
        });
    }
    let total = to_money(lines.iter().map(|line| line.amount).sum());
    PriceQuote {
        room_id,
        role,
        range,
        billed_hours: billed_hours(&range),
        lines,
        total,
    }
}
