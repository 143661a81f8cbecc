use crate::modules::reservations::application::errors::ApplicationError;
use crate::modules::reservations::core::errors::BookingError;
use crate::modules::reservations::core::ports::{PaymentRepository, ReservationRepository};
use crate::modules::reservations::core::reservation::Reservation;
use crate::modules::reservations::use_cases::confirm_reservation::decide::decide_confirm;
use crate::shared::core::primitives::ReservationId;
use std::sync::Arc;

pub struct ConfirmReservationHandler<TReservations, TPayments>
where
    TReservations: ReservationRepository + 'static,
    TPayments: PaymentRepository + 'static,
{
    reservations: Arc<TReservations>,
    payments: Arc<TPayments>,
}

impl<TReservations, TPayments> ConfirmReservationHandler<TReservations, TPayments>
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
        let payments = self.payments.for_reservation(reservation_id).await?;
        let next = decide_confirm(&reservation, &payments)?;
        let confirmed = self
            .reservations
            .transition(reservation_id, reservation.status, next)
            .await?;
        tracing::info!(%reservation_id, "reservation confirmed");
        Ok(confirmed)
    }
}

#[cfg(test)]
mod confirm_reservation_handler_tests {
    use super::*;
    use crate::modules::reservations::core::payment::{Payment, PaymentStatus};
    use crate::modules::reservations::core::payments::methods::PaymentMethodType;
    use crate::modules::reservations::core::reservation::ReservationStatus;
    use crate::tests::fixtures::world::{World, world};
    use chrono::Utc;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    async fn complete_payment(world: &World, reservation_id: ReservationId) {
        let payment =
            Payment::pending(reservation_id, PaymentMethodType::PayPal, dec!(20), Utc::now()).unwrap();
        world.store.open_attempt(payment.clone()).await.unwrap();
        let completed = Payment {
            status: PaymentStatus::Completed,
            ..payment
        };
        world.store.update(completed, PaymentStatus::Pending).await.unwrap();
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_confirm_a_paid_reservation(world: World) {
        let reservation = world.reserve("2024-01-02T10:00", "2024-01-02T11:00").await;
        complete_payment(&world, reservation.id).await;

        let confirmed = ConfirmReservationHandler::new(world.store.clone(), world.store.clone())
            .handle(reservation.id)
            .await
            .expect("handle failed");
        assert_eq!(confirmed.status, ReservationStatus::Confirmed);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_require_a_completed_payment(world: World) {
        let reservation = world.reserve("2024-01-02T10:00", "2024-01-02T11:00").await;
        let result = ConfirmReservationHandler::new(world.store.clone(), world.store.clone())
            .handle(reservation.id)
            .await;
        assert!(matches!(
            result,
            Err(ApplicationError::Domain(BookingError::PaymentRequired(id))) if id == reservation.id
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_not_confirm_twice(world: World) {
        let reservation = world.reserve("2024-01-02T10:00", "2024-01-02T11:00").await;
        complete_payment(&world, reservation.id).await;
        let handler = ConfirmReservationHandler::new(world.store.clone(), world.store.clone());
        handler.handle(reservation.id).await.unwrap();

        let again = handler.handle(reservation.id).await;
        assert!(matches!(
            again,
            Err(ApplicationError::Domain(BookingError::InvalidTransition {
                from: "confirmed",
                to: "confirmed",
                ..
            }))
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_report_an_unknown_reservation(world: World) {
        let missing = ReservationId::new();
        let result = ConfirmReservationHandler::new(world.store.clone(), world.store.clone())
            .handle(missing)
            .await;
        assert!(matches!(
            result,
            Err(ApplicationError::Domain(BookingError::ReservationNotFound(id))) if id == missing
        ));
    }
}
