// Pays for a Pending reservation through the processor registered for the method.
//
// Responsibilities
// - Reject before any write: negative amounts, unknown reservations, unknown or
//   unregistered methods, incomplete options, reservations already paid or cancelled,
//   and amounts that differ from the reservation's price at current rates.
// - Write a Pending payment, run the processor, then settle the same row as
//   Completed or Failed. A failed attempt leaves the reservation Pending so the
//   caller can retry with a new payment.
//
// Boundaries
// - Does not confirm the reservation. That is confirm_reservation's decision.
// - Opening the payment fails in the store if the reservation stopped being
//   Pending since it was read.

use crate::modules::reservations::application::errors::ApplicationError;
use crate::modules::reservations::application::rate_resolver::RateResolver;
use crate::modules::reservations::core::errors::BookingError;
use crate::modules::reservations::core::payment::{Payment, PaymentStatus};
use crate::modules::reservations::core::payments::registry::PaymentRegistry;
use crate::modules::reservations::core::ports::{
    PaymentMethodRepository, PaymentRepository, RateRepository, ReservationRepository,
    UserDirectory,
};
use crate::modules::reservations::core::pricing::{normalize_lines, quote};
use crate::modules::reservations::core::reservation::{Reservation, ReservationStatus};
use crate::modules::reservations::use_cases::pay_for_reservation::command::{
    PayForReservation, PaymentSource,
};
use crate::shared::core::money::to_money;
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::Value;
use std::sync::Arc;

pub struct PayForReservationHandler<TReservations, TPayments, TMethods, TRates, TUsers>
where
    TReservations: ReservationRepository + 'static,
    TPayments: PaymentRepository + 'static,
    TMethods: PaymentMethodRepository + 'static,
    TRates: RateRepository + 'static,
    TUsers: UserDirectory + 'static,
{
    reservations: Arc<TReservations>,
    payments: Arc<TPayments>,
    methods: Arc<TMethods>,
    rates: RateResolver<TRates>,
    users: Arc<TUsers>,
    registry: Arc<PaymentRegistry>,
}

impl<TReservations, TPayments, TMethods, TRates, TUsers>
    PayForReservationHandler<TReservations, TPayments, TMethods, TRates, TUsers>
where
    TReservations: ReservationRepository + 'static,
    TPayments: PaymentRepository + 'static,
    TMethods: PaymentMethodRepository + 'static,
    TRates: RateRepository + 'static,
    TUsers: UserDirectory + 'static,
{
    pub fn new(
        reservations: Arc<TReservations>,
        payments: Arc<TPayments>,
        methods: Arc<TMethods>,
        rates: Arc<TRates>,
        users: Arc<TUsers>,
        registry: Arc<PaymentRegistry>,
    ) -> Self {
        Self {
            reservations,
            payments,
            methods,
            rates: RateResolver::new(rates),
            users,
            registry,
        }
    }

    pub async fn handle(&self, command: PayForReservation) -> Result<Payment, ApplicationError> {
        if command.amount.is_sign_negative() {
            return Err(BookingError::InvalidAmount(command.amount).into());
        }
        let reservation = self
            .reservations
            .get(command.reservation_id)
            .await?
            .ok_or(BookingError::ReservationNotFound(command.reservation_id))?;

        let (type_key, options) = self.resolve_source(&reservation, command.source).await?;
        let prepared = self.registry.prepare(&type_key, &options)?;

        match reservation.status {
            ReservationStatus::Pending => {}
            ReservationStatus::Confirmed => {
                return Err(BookingError::AlreadyPaid(reservation.id).into());
            }
            ReservationStatus::Cancelled => {
                return Err(BookingError::InvalidTransition {
                    entity: "reservation",
                    from: ReservationStatus::Cancelled.as_str(),
                    to: ReservationStatus::Confirmed.as_str(),
                }
                .into());
            }
        }
        let existing = self.payments.for_reservation(reservation.id).await?;
        if existing
            .iter()
            .any(|payment| payment.status == PaymentStatus::Completed)
        {
            return Err(BookingError::AlreadyPaid(reservation.id).into());
        }

        let expected = self.price_of(&reservation).await?;
        if to_money(command.amount) != expected {
            return Err(BookingError::AmountMismatch {
                reservation_id: reservation.id,
                expected,
                actual: command.amount,
            }
            .into());
        }

        let payment = Payment::pending(
            reservation.id,
            prepared.method(),
            command.amount,
            command.requested_at,
        )?;
        self.payments.open_attempt(payment.clone()).await?;
        tracing::debug!(payment_id = %payment.id, method = %payment.method, "payment attempt opened");

        let result = self.registry.execute(&prepared, payment.amount).await;
        let settled = payment.settle(&result, Utc::now())?;
        self.payments
            .update(settled.clone(), PaymentStatus::Pending)
            .await?;

        match settled.status {
            PaymentStatus::Completed => {
                tracing::info!(
                    payment_id = %settled.id,
                    reservation_id = %reservation.id,
                    amount = %settled.amount,
                    "payment completed"
                );
                Ok(settled)
            }
            _ => Err(BookingError::PaymentProcessingFailed {
                payment_id: settled.id,
                reason: settled
                    .failure_reason
                    .unwrap_or_else(|| "payment failed".to_string()),
            }
            .into()),
        }
    }

    /// Room and equipment cost for the reservation's own role.
    async fn price_of(&self, reservation: &Reservation) -> Result<Decimal, ApplicationError> {
        let role = self
            .users
            .role_of(reservation.user_id)
            .await?
            .ok_or(BookingError::UserNotFound(reservation.user_id))?;
        let room_rate = self.rates.resolve_room_rate(reservation.room_id, role).await?;
        let mut equipment = Vec::new();
        for (equipment_id, quantity) in normalize_lines(&reservation.equipment)? {
            let rate = self.rates.resolve_equipment_rate(equipment_id, role).await?;
            equipment.push((equipment_id, quantity, rate));
        }
        Ok(quote(reservation.room_id, role, reservation.range, room_rate, &equipment).total)
    }

    async fn resolve_source(
        &self,
        reservation: &Reservation,
        source: PaymentSource,
    ) -> Result<(String, Value), ApplicationError> {
        match source {
            PaymentSource::Raw { type_key, options } => Ok((type_key, options)),
            PaymentSource::Saved(method_id) => {
                let method = self
                    .methods
                    .payment_method(method_id)
                    .await?
                    .filter(|method| method.user_id == reservation.user_id)
                    .ok_or(BookingError::PaymentMethodNotFound(method_id))?;
                Ok((method.type_key, method.data))
            }
        }
    }
}
