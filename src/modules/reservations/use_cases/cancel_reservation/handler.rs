use crate::modules::reservations::application::errors::ApplicationError;
use crate::modules::reservations::core::errors::BookingError;
use crate::modules::reservations::core::ports::{PaymentRepository, ReservationRepository};
use crate::modules::reservations::core::reservation::Reservation;
use crate::shared::core::primitives::ReservationId;
use std::sync::Arc;

/// Cancels a Pending reservation and releases its slot and equipment.
///
/// A reservation with a Pending or Completed payment stays put: the charge is
/// either in flight or already taken.
pub struct CancelReservationHandler<TReservations, TPayments>
where
    TReservations: ReservationRepository + 'static,
    TPayments: PaymentRepository + 'static,
{
    reservations: Arc<TReservations>,
    payments: Arc<TPayments>,
}

impl<TReservations, TPayments> CancelReservationHandler<TReservations, TPayments>
where
    TReservations: ReservationRepository + 'static,
    TPayments: PaymentRepository + 'static,
{
    pub fn new(reservations: Arc<TReservations>, payments: Arc<TPayments>) -> Self {
        Self {
            reservations,
            payments,
        }
    }

    pub async fn handle(&self, reservation_id: ReservationId) -> Result<Reservation, ApplicationError> {
        let reservation = self
            .reservations
            .get(reservation_id)
            .await?
            .ok_or(BookingError::ReservationNotFound(reservation_id))?;
        let next = reservation.status.cancel()?;
        let payments = self.payments.for_reservation(reservation_id).await?;
        if let Some(open) = payments.iter().find(|payment| payment.is_open()) {
            return Err(BookingError::PaymentOutstanding {
                reservation_id,
                status: open.status.as_str(),
            }
            .into());
        }
        // The store re-checks open payments under its own lock.
        let cancelled = self
            .reservations
            .transition(reservation_id, reservation.status, next)
            .await?;
        tracing::info!(%reservation_id, "reservation cancelled");
        Ok(cancelled)
    }
}
