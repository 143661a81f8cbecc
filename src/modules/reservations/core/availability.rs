// Pure availability rules.
//
// Purpose
// - Decide whether an interval fits a room's calendar and does not collide with
//   blocking reservations.
//
// Rules
// - Each calendar day of the interval is judged on its own.
// - Any override on a date replaces that date's weekly hours. Open overrides are the
//   open windows, closed overrides close their sub-interval.
// - Touching or overlapping windows merge. The day's slice must sit inside one merged
//   window. A day with nothing open is closed.
//
// Boundaries
// - No input or output. Callers load the rows and pass them in.

use crate::modules::reservations::core::catalog::{DateOverride, Room, WeeklySchedule};
use crate::modules::reservations::core::errors::UnavailableReason;
use crate::modules::reservations::core::reservation::Reservation;
use crate::shared::core::primitives::TimeRange;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EffectiveDay {
    pub open: Vec<TimeRange>,
    pub closed: Vec<(TimeRange, Option<String>)>,
}

pub fn effective_day(
    date: NaiveDate,
    weekly: &[WeeklySchedule],
    overrides: &[DateOverride],
) -> EffectiveDay {
    let todays_overrides: Vec<&DateOverride> =
        overrides.iter().filter(|row| row.date == date).collect();

    if todays_overrides.is_empty() {
        let open = weekly
            .iter()
            .filter(|row| row.applies_to(date))
            .filter_map(|row| row.window_on(date))
            .collect();
        return EffectiveDay {
            open: merge(open),
            closed: Vec::new(),
        };
    }

    let mut open = Vec::new();
    let mut closed = Vec::new();
    for row in todays_overrides {
        let Some(window) = row.window() else { continue };
        if row.is_open {
            open.push(window);
        } else {
            closed.push((window, row.label.clone()));
        }
    }
    EffectiveDay {
        open: merge(open),
        closed,
    }
}

fn merge(mut windows: Vec<TimeRange>) -> Vec<TimeRange> {
    windows.sort_by_key(|window| window.start());
    let mut merged: Vec<TimeRange> = Vec::with_capacity(windows.len());
    for window in windows {
        match merged.last_mut() {
            Some(last) if window.start() <= last.end() => {
                if window.end() > last.end() {
                    if let Ok(joined) = TimeRange::new(last.start(), window.end()) {
                        *last = joined;
                    }
                }
            }
            _ => merged.push(window),
        }
    }
    merged
}

pub fn check_opening_hours(
    range: &TimeRange,
    weekly: &[WeeklySchedule],
    overrides: &[DateOverride],
) -> Result<(), UnavailableReason> {
    for (date, slice) in range.split_by_day() {
        let day = effective_day(date, weekly, overrides);
        if let Some((_, label)) = day.closed.iter().find(|(window, _)| window.overlaps(&slice)) {
            return Err(UnavailableReason::ClosedByOverride {
                date,
                label: label.clone(),
            });
        }
        if day.open.is_empty() {
            return Err(UnavailableReason::Closed { date });
        }
        if !day.open.iter().any(|window| window.contains(&slice)) {
            return Err(UnavailableReason::OutsideOpeningHours { date });
        }
    }
    Ok(())
}

pub fn check_no_overlap(
    room: &Room,
    range: &TimeRange,
    existing: &[Reservation],
) -> Result<(), UnavailableReason> {
    match existing.iter().find(|reservation| reservation.blocks(room.id, range)) {
        Some(reservation) => Err(UnavailableReason::Overlaps {
            reservation_id: reservation.id,
        }),
        None => Ok(()),
    }
}

pub fn assess(
    room: &Room,
    range: &TimeRange,
    weekly: &[WeeklySchedule],
    overrides: &[DateOverride],
    existing: &[Reservation],
) -> Result<(), UnavailableReason> {
    if !room.is_active() {
        return Err(UnavailableReason::RoomInactive);
    }
    check_opening_hours(range, weekly, overrides)?;
    check_no_overlap(room, range, existing)
}
