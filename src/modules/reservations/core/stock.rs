use crate::modules::reservations::core::catalog::Equipment;
use crate::modules::reservations::core::errors::BookingError;
use crate::modules::reservations::core::reservation::Reservation;
use crate::shared::core::primitives::TimeRange;

/// Units of `equipment` held by blocking reservations overlapping `range`, in any room.
pub fn held_units(equipment: &Equipment, range: &TimeRange, existing: &[Reservation]) -> u32 {
    existing
        .iter()
        .filter(|reservation| reservation.status.is_blocking() && reservation.range.overlaps(range))
        .flat_map(|reservation| reservation.equipment.iter())
        .filter(|line| line.equipment_id == equipment.id)
        .map(|line| u32::try_from(line.quantity).unwrap_or(0))
        .fold(0u32, u32::saturating_add)
}

pub fn check_stock(
    equipment: &Equipment,
    requested: u32,
    range: &TimeRange,
    existing: &[Reservation],
) -> Result<(), BookingError> {
    let available = equipment
        .stock
        .saturating_sub(held_units(equipment, range, existing));
    if requested > available {
        return Err(BookingError::InsufficientStock {
            equipment_id: equipment.id,
            requested,
            available,
        });
    }
    Ok(())
}
