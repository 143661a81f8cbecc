// Availability of a room for a half-open interval.
//
// Purpose
// - Gather the calendar rows and blocking reservations a decision needs, then
//   hand them to the pure `assess` rules in core::availability.
//
// Boundaries
// - Read only. Reserving goes through create_pending_reservation, which makes
//   the same decision under a versioned append.

use crate::modules::reservations::application::errors::ApplicationError;
use crate::modules::reservations::core::availability::assess;
use crate::modules::reservations::core::catalog::{DateOverride, Room, WeeklySchedule};
use crate::modules::reservations::core::errors::BookingError;
use crate::modules::reservations::core::ports::{CatalogRepository, ReservationRepository};
use crate::shared::core::primitives::{RoomId, TimeRange};
use std::sync::Arc;

/// Calendar rows for one room covering every day of an interval.
pub struct RoomCalendar {
    pub room: Room,
    pub weekly: Vec<WeeklySchedule>,
    pub overrides: Vec<DateOverride>,
}

pub async fn load_room_calendar<TCatalog>(
    catalog: &TCatalog,
    room_id: RoomId,
    range: &TimeRange,
) -> Result<RoomCalendar, ApplicationError>
where
    TCatalog: CatalogRepository + ?Sized,
{
    let room = catalog
        .room(room_id)
        .await?
        .ok_or(BookingError::RoomNotFound(room_id))?;
    let weekly = catalog.weekly_schedules(room_id).await?;
    let overrides = catalog
        .date_overrides(room_id, range.first_date(), range.last_date())
        .await?;
    Ok(RoomCalendar {
        room,
        weekly,
        overrides,
    })
}

pub struct AvailabilityCalendar<TCatalog, TReservations>
where
    TCatalog: CatalogRepository + 'static,
    TReservations: ReservationRepository + 'static,
{
    catalog: Arc<TCatalog>,
    reservations: Arc<TReservations>,
}

impl<TCatalog, TReservations> AvailabilityCalendar<TCatalog, TReservations>
where
    TCatalog: CatalogRepository + 'static,
    TReservations: ReservationRepository + 'static,
{
    pub fn new(catalog: Arc<TCatalog>, reservations: Arc<TReservations>) -> Self {
        Self {
            catalog,
            reservations,
        }
    }

    pub async fn assert_available(
        &self,
        room_id: RoomId,
        range: TimeRange,
    ) -> Result<(), ApplicationError> {
        let calendar = load_room_calendar(&*self.catalog, room_id, &range).await?;
        let blocking = self.reservations.load_blocking(range).await?;
        assess(
            &calendar.room,
            &range,
            &calendar.weekly,
            &calendar.overrides,
            &blocking.reservations,
        )
        .map_err(|reason| {
            tracing::debug!(%room_id, %range, %reason, "slot unavailable");
            BookingError::SlotUnavailable { room_id, reason }.into()
        })
    }

    pub async fn is_available(&self, room_id: RoomId, range: TimeRange) -> Result<bool, ApplicationError> {
        match self.assert_available(room_id, range).await {
            Ok(()) => Ok(true),
            Err(ApplicationError::Domain(BookingError::SlotUnavailable { .. })) => Ok(false),
            Err(error) => Err(error),
        }
    }
}
