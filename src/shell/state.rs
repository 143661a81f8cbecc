use crate::modules::reservations::adapters::outbound::in_memory_store::InMemoryBookingStore;
use crate::modules::reservations::core::payments::registry::PaymentRegistry;
use crate::modules::reservations::use_cases::cancel_reservation::handler::CancelReservationHandler;
use crate::modules::reservations::use_cases::check_availability::handler::CheckAvailabilityHandler;
use crate::modules::reservations::use_cases::confirm_reservation::handler::ConfirmReservationHandler;
use crate::modules::reservations::use_cases::create_pending_reservation::handler::CreatePendingReservationHandler;
use crate::modules::reservations::use_cases::expire_stale_reservations::handler::ExpireStaleReservationsHandler;
use crate::modules::reservations::use_cases::pay_for_reservation::handler::PayForReservationHandler;
use crate::modules::reservations::use_cases::price_reservation::handler::PriceReservationHandler;
use crate::shell::config::BookingSettings;
use std::sync::Arc;

type Store = InMemoryBookingStore;

#[derive(Clone)]
pub struct AppState {
    pub check_availability: Arc<CheckAvailabilityHandler<Store, Store>>,
    pub price_reservation: Arc<PriceReservationHandler<Store, Store, Store, Store>>,
    pub create_reservation: Arc<CreatePendingReservationHandler<Store, Store>>,
    pub pay_for_reservation: Arc<PayForReservationHandler<Store, Store, Store, Store, Store>>,
    pub confirm_reservation: Arc<ConfirmReservationHandler<Store, Store>>,
    pub cancel_reservation: Arc<CancelReservationHandler<Store, Store>>,
    pub expire_stale: Arc<ExpireStaleReservationsHandler<Store, Store>>,
}

impl AppState {
    /// Wires every handler over one in-memory store.
    pub fn in_memory(
        store: Arc<Store>,
        registry: Arc<PaymentRegistry>,
        booking: &BookingSettings,
    ) -> Self {
        Self {
            check_availability: Arc::new(CheckAvailabilityHandler::new(store.clone(), store.clone())),
            price_reservation: Arc::new(PriceReservationHandler::new(
                store.clone(),
                store.clone(),
                store.clone(),
                store.clone(),
            )),
            create_reservation: Arc::new(CreatePendingReservationHandler::new(
                store.clone(),
                store.clone(),
                booking.max_reserve_attempts,
            )),
            pay_for_reservation: Arc::new(PayForReservationHandler::new(
                store.clone(),
                store.clone(),
                store.clone(),
                store.clone(),
                store.clone(),
                registry,
            )),
            confirm_reservation: Arc::new(ConfirmReservationHandler::new(store.clone(), store.clone())),
            cancel_reservation: Arc::new(CancelReservationHandler::new(store.clone(), store.clone())),
            expire_stale: Arc::new(ExpireStaleReservationsHandler::new(
                store.clone(),
                store,
                booking.pending_ttl(),
            )),
        }
    }
}
