// Cancels Pending reservations that were never paid within the hold period.
//
// Responsibilities
// - Find Pending reservations created before `now - ttl`.
// - Leave alone any reservation with a Pending or Completed payment: a charge is
//   in flight, or it only waits for confirmation.
// - Cancel the rest with a compare-and-set. Losing the race to a concurrent
//   confirm, cancel or freshly opened payment is not an error.

use crate::modules::reservations::application::errors::ApplicationError;
use crate::modules::reservations::core::ports::{
    PaymentRepository, ReservationRepository, StoreError,
};
use crate::modules::reservations::core::reservation::ReservationStatus;
use crate::shared::core::primitives::ReservationId;
use chrono::{DateTime, TimeDelta, Utc};
use std::sync::Arc;

pub struct ExpireStaleReservationsHandler<TReservations, TPayments>
where
    TReservations: ReservationRepository + 'static,
    TPayments: PaymentRepository + 'static,
{
    reservations: Arc<TReservations>,
    payments: Arc<TPayments>,
    ttl: TimeDelta,
}

impl<TReservations, TPayments> ExpireStaleReservationsHandler<TReservations, TPayments>
where
    TReservations: ReservationRepository + 'static,
    TPayments: PaymentRepository + 'static,
{
    pub fn new(reservations: Arc<TReservations>, payments: Arc<TPayments>, ttl: TimeDelta) -> Self {
        Self {
            reservations,
            payments,
            ttl,
        }
    }

    pub async fn handle(&self, now: DateTime<Utc>) -> Result<Vec<ReservationId>, ApplicationError> {
        let stale = self.reservations.pending_created_before(now - self.ttl).await?;
        let mut expired = Vec::new();
        for reservation in stale {
            let payments = self.payments.for_reservation(reservation.id).await?;
            if payments.iter().any(|payment| payment.is_open()) {
                continue;
            }
            match self
                .reservations
                .transition(reservation.id, ReservationStatus::Pending, ReservationStatus::Cancelled)
                .await
            {
                Ok(_) => expired.push(reservation.id),
                Err(StoreError::StatusMismatch { .. } | StoreError::Conflict(_)) => continue,
                Err(error) => return Err(error.into()),
            }
        }
        if !expired.is_empty() {
            tracing::info!(count = expired.len(), "expired stale pending reservations");
        }
        Ok(expired)
    }
}
