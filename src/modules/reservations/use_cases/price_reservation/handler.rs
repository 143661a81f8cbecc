use crate::modules::reservations::application::errors::ApplicationError;
use crate::modules::reservations::application::pricing_engine::PricingEngine;
use crate::modules::reservations::core::errors::BookingError;
use crate::modules::reservations::core::ports::{
    CatalogRepository, RateRepository, ReservationRepository, UserDirectory,
};
use crate::modules::reservations::core::pricing::PriceQuote;
use crate::modules::reservations::core::role::Role;
use crate::modules::reservations::use_cases::price_reservation::command::{
    PriceReservation, PricedAs,
};
use crate::shared::core::primitives::TimeRange;
use std::sync::Arc;

pub struct PriceReservationHandler<TCatalog, TRates, TReservations, TUsers>
where
    TCatalog: CatalogRepository + 'static,
    TRates: RateRepository + 'static,
    TReservations: ReservationRepository + 'static,
    TUsers: UserDirectory + 'static,
{
    engine: PricingEngine<TCatalog, TRates, TReservations>,
    users: Arc<TUsers>,
}

impl<TCatalog, TRates, TReservations, TUsers>
    PriceReservationHandler<TCatalog, TRates, TReservations, TUsers>
where
    TCatalog: CatalogRepository + 'static,
    TRates: RateRepository + 'static,
    TReservations: ReservationRepository + 'static,
    TUsers: UserDirectory + 'static,
{
    pub fn new(
        catalog: Arc<TCatalog>,
        rates: Arc<TRates>,
        reservations: Arc<TReservations>,
        users: Arc<TUsers>,
    ) -> Self {
        Self {
            engine: PricingEngine::new(catalog, rates, reservations),
            users,
        }
    }

    pub async fn handle(&self, command: PriceReservation) -> Result<PriceQuote, ApplicationError> {
        let range = TimeRange::new(command.start, command.end)?;
        let role = self.role_for(command.priced_as).await?;
        self.engine
            .price(command.room_id, range, role, &command.equipment)
            .await
    }

    async fn role_for(&self, priced_as: PricedAs) -> Result<Role, ApplicationError> {
        match priced_as {
            PricedAs::Role(role) => Ok(role),
            PricedAs::User(user_id) => Ok(self
                .users
                .role_of(user_id)
                .await?
                .ok_or(BookingError::UserNotFound(user_id))?),
        }
    }
}
