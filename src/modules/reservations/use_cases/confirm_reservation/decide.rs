use crate::modules::reservations::core::errors::BookingError;
use crate::modules::reservations::core::payment::{Payment, PaymentStatus};
use crate::modules::reservations::core::reservation::{Reservation, ReservationStatus};

/// A reservation is confirmed from Pending, and only once a payment for it completed.
pub fn decide_confirm(
    reservation: &Reservation,
    payments: &[Payment],
) -> Result<ReservationStatus, BookingError> {
    let next = reservation.status.confirm()?;
    let paid = payments.iter().any(|payment| {
        payment.reservation_id == reservation.id && payment.status == PaymentStatus::Completed
    });
    if !paid {
        return Err(BookingError::PaymentRequired(reservation.id));
    }
    Ok(next)
}
