use crate::modules::reservations::application::availability_calendar::RoomCalendar;
use crate::modules::reservations::core::availability::assess;
use crate::modules::reservations::core::catalog::{Equipment, EquipmentLine};
use crate::modules::reservations::core::errors::BookingError;
use crate::modules::reservations::core::pricing::normalize_lines;
use crate::modules::reservations::core::reservation::Reservation;
use crate::modules::reservations::core::stock::check_stock;
use crate::modules::reservations::use_cases::create_pending_reservation::command::CreatePendingReservation;
use crate::shared::core::primitives::TimeRange;

/// Decides a new Pending reservation against one consistent read of the
/// calendar, the equipment requested and every blocking reservation that
/// overlaps the interval.
pub fn decide_reserve(
    calendar: &RoomCalendar,
    equipment: &[Equipment],
    blocking: &[Reservation],
    command: &CreatePendingReservation,
) -> Result<Reservation, BookingError> {
    let range = TimeRange::new(command.start, command.end)?;
    assess(
        &calendar.room,
        &range,
        &calendar.weekly,
        &calendar.overrides,
        blocking,
    )
    .map_err(|reason| BookingError::SlotUnavailable {
        room_id: calendar.room.id,
        reason,
    })?;

    let mut lines = Vec::new();
    for (equipment_id, quantity) in normalize_lines(&command.equipment)? {
        let item = equipment
            .iter()
            .find(|item| item.id == equipment_id)
            .ok_or(BookingError::EquipmentNotFound(equipment_id))?;
        check_stock(item, quantity, &range, blocking)?;
        lines.push(EquipmentLine {
            equipment_id,
            quantity: i64::from(quantity),
        });
    }

    Ok(Reservation::pending(
        calendar.room.id,
        command.user_id,
        range,
        lines,
        command.requested_at,
    ))
}
