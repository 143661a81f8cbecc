use crate::modules::reservations::application::availability_calendar::AvailabilityCalendar;
use crate::modules::reservations::application::errors::ApplicationError;
use crate::modules::reservations::core::ports::{CatalogRepository, ReservationRepository};
use crate::modules::reservations::use_cases::check_availability::command::CheckAvailability;
use crate::shared::core::primitives::TimeRange;
use std::sync::Arc;

pub struct CheckAvailabilityHandler<TCatalog, TReservations>
where
    TCatalog: CatalogRepository + 'static,
    TReservations: ReservationRepository + 'static,
{
    calendar: AvailabilityCalendar<TCatalog, TReservations>,
}

impl<TCatalog, TReservations> CheckAvailabilityHandler<TCatalog, TReservations>
where
    TCatalog: CatalogRepository + 'static,
    TReservations: ReservationRepository + 'static,
{
    pub fn new(catalog: Arc<TCatalog>, reservations: Arc<TReservations>) -> Self {
        Self {
            calendar: AvailabilityCalendar::new(catalog, reservations),
        }
    }

    /// Ok when the slot can be booked, `SlotUnavailable` with the reason otherwise.
    pub async fn handle(&self, query: CheckAvailability) -> Result<(), ApplicationError> {
        let range = TimeRange::new(query.start, query.end)?;
        self.calendar.assert_available(query.room_id, range).await
    }
}
