// Creates a Pending reservation.
//
// Responsibilities
// - Read the calendar, the equipment and the blocking reservations at one ledger version.
// - Decide with the pure decider and append guarded by that version.
// - On a version mismatch, another booking landed in between: read again and
//   decide again, up to `max_attempts` times.

use crate::modules::reservations::application::availability_calendar::load_room_calendar;
use crate::modules::reservations::application::errors::ApplicationError;
use crate::modules::reservations::core::catalog::Equipment;
use crate::modules::reservations::core::ports::{
    CatalogRepository, ReservationRepository, StoreError,
};
use crate::modules::reservations::core::reservation::Reservation;
use crate::modules::reservations::use_cases::create_pending_reservation::command::CreatePendingReservation;
use crate::modules::reservations::use_cases::create_pending_reservation::decide::decide_reserve;
use crate::shared::core::primitives::TimeRange;
use std::sync::Arc;

pub struct CreatePendingReservationHandler<TCatalog, TReservations>
where
    TCatalog: CatalogRepository + 'static,
    TReservations: ReservationRepository + 'static,
{
    catalog: Arc<TCatalog>,
    reservations: Arc<TReservations>,
    max_attempts: u32,
}

impl<TCatalog, TReservations> CreatePendingReservationHandler<TCatalog, TReservations>
where
    TCatalog: CatalogRepository + 'static,
    TReservations: ReservationRepository + 'static,
{
    pub fn new(catalog: Arc<TCatalog>, reservations: Arc<TReservations>, max_attempts: u32) -> Self {
        Self {
            catalog,
            reservations,
            max_attempts: max_attempts.max(1),
        }
    }

    pub async fn handle(&self, command: CreatePendingReservation) -> Result<Reservation, ApplicationError> {
        let range = TimeRange::new(command.start, command.end)?;
        let mut attempt = 1;
        loop {
            match self.attempt(&command, range).await {
                Err(ApplicationError::Store(StoreError::VersionMismatch { expected, actual }))
                    if attempt < self.max_attempts =>
                {
                    tracing::debug!(attempt, expected, actual, "ledger moved, deciding again");
                    attempt += 1;
                }
                Ok(reservation) => {
                    tracing::info!(
                        reservation_id = %reservation.id,
                        room_id = %reservation.room_id,
                        range = %reservation.range,
                        "reservation pending"
                    );
                    return Ok(reservation);
                }
                Err(error) => {
                    tracing::warn!(room_id = %command.room_id, %error, "reservation rejected");
                    return Err(error);
                }
            }
        }
    }

    async fn attempt(
        &self,
        command: &CreatePendingReservation,
        range: TimeRange,
    ) -> Result<Reservation, ApplicationError> {
        let blocking = self.reservations.load_blocking(range).await?;
        let calendar = load_room_calendar(&*self.catalog, command.room_id, &range).await?;

        let mut equipment: Vec<Equipment> = Vec::new();
        for line in &command.equipment {
            if equipment.iter().any(|item| item.id == line.equipment_id) {
                continue;
            }
            if let Some(item) = self.catalog.equipment(line.equipment_id).await? {
                equipment.push(item);
            }
        }

        let reservation = decide_reserve(&calendar, &equipment, &blocking.reservations, command)?;
        self.reservations
            .append(reservation.clone(), blocking.version)
            .await?;
        Ok(reservation)
    }
}
