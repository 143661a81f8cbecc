// Quote for a room plus equipment over an interval, for one role.
//
// Responsibilities
// - Validate equipment lines (positive quantities, known equipment, enough free stock).
// - Resolve every rate exactly. Any missing rate fails the whole quote.
// - Delegate the arithmetic to core::pricing.
//
// Boundaries
// - Pricing does not check opening hours or room overlaps. The stock check is
//   advisory here and repeated inside the reservation decision.

use crate::modules::reservations::application::errors::ApplicationError;
use crate::modules::reservations::application::rate_resolver::RateResolver;
use crate::modules::reservations::core::catalog::EquipmentLine;
use crate::modules::reservations::core::errors::BookingError;
use crate::modules::reservations::core::ports::{
    CatalogRepository, RateRepository, ReservationRepository,
};
use crate::modules::reservations::core::pricing::{PriceQuote, normalize_lines, quote};
use crate::modules::reservations::core::role::Role;
use crate::modules::reservations::core::stock::check_stock;
use crate::shared::core::primitives::{RoomId, TimeRange};
use std::sync::Arc;

pub struct PricingEngine<TCatalog, TRates, TReservations>
where
    TCatalog: CatalogRepository + 'static,
    TRates: RateRepository + 'static,
    TReservations: ReservationRepository + 'static,
{
    catalog: Arc<TCatalog>,
    rates: RateResolver<TRates>,
    reservations: Arc<TReservations>,
}

impl<TCatalog, TRates, TReservations> PricingEngine<TCatalog, TRates, TReservations>
where
    TCatalog: CatalogRepository + 'static,
    TRates: RateRepository + 'static,
    TReservations: ReservationRepository + 'static,
{
    pub fn new(catalog: Arc<TCatalog>, rates: Arc<TRates>, reservations: Arc<TReservations>) -> Self {
        Self {
            catalog,
            rates: RateResolver::new(rates),
            reservations,
        }
    }

    pub async fn price(
        &self,
        room_id: RoomId,
        range: TimeRange,
        role: Role,
        lines: &[EquipmentLine],
    ) -> Result<PriceQuote, ApplicationError> {
        self.catalog
            .room(room_id)
            .await?
            .ok_or(BookingError::RoomNotFound(room_id))?;
        let normalized = normalize_lines(lines)?;

        let existing = if normalized.is_empty() {
            Vec::new()
        } else {
            self.reservations.load_blocking(range).await?.reservations
        };

        let mut priced = Vec::with_capacity(normalized.len());
        for (equipment_id, quantity) in normalized {
            let equipment = self
                .catalog
                .equipment(equipment_id)
                .await?
                .ok_or(BookingError::EquipmentNotFound(equipment_id))?;
            check_stock(&equipment, quantity, &range, &existing)?;
            let rate = self.rates.resolve_equipment_rate(equipment_id, role).await?;
            priced.push((equipment_id, quantity, rate));
        }

        let room_rate = self.rates.resolve_room_rate(room_id, role).await?;
        let priced_quote = quote(room_id, role, range, room_rate, &priced);
        tracing::debug!(%room_id, %role, total = %priced_quote.total, "priced reservation");
        Ok(priced_quote)
    }
}

#[cfg(test)]
mod pricing_engine_tests {
    use super::*;
    use crate::modules::reservations::adapters::outbound::in_memory_store::InMemoryBookingStore;
    use crate::modules::reservations::core::errors::RateSubject;
    use crate::modules::reservations::core::pricing::PriceItem;
    use crate::modules::reservations::core::reservation::Reservation;
    use crate::shared::core::primitives::EquipmentId;
    use crate::tests::fixtures::world::{World, range};
    use chrono::Utc;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    type Engine = PricingEngine<InMemoryBookingStore, InMemoryBookingStore, InMemoryBookingStore>;

    fn engine(world: &World) -> Engine {
        PricingEngine::new(world.store.clone(), world.store.clone(), world.store.clone())
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_bill_ninety_minutes_as_two_hours() {
        let world = World::new();
        let quote = engine(&world)
            .price(
                world.room.id,
                range("2024-01-02T10:00", "2024-01-02T11:30"),
                Role::Member,
                &[],
            )
            .await
            .unwrap();
        assert_eq!(quote.billed_hours, 2);
        assert_eq!(quote.total, dec!(40.00));
        assert_eq!(quote.total.to_string(), "40.00");
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_add_equipment_lines() {
        let world = World::new();
        let quote = engine(&world)
            .price(
                world.room.id,
                range("2024-01-02T10:00", "2024-01-02T12:00"),
                Role::Member,
                &[EquipmentLine {
                    equipment_id: world.projector.id,
                    quantity: 2,
                }],
            )
            .await
            .unwrap();
        assert_eq!(quote.billed_hours, 2);
        assert_eq!(quote.lines.len(), 2);
        assert_eq!(quote.lines[0].amount, dec!(40.00));
        assert_eq!(quote.lines[1].item, PriceItem::Equipment(world.projector.id));
        assert_eq!(quote.lines[1].amount, dec!(10.00));
        assert_eq!(quote.total, dec!(50.00));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_fail_closed_when_the_role_has_no_rate() {
        let world = World::new();
        let result = engine(&world)
            .price(
                world.room.id,
                range("2024-01-02T10:00", "2024-01-02T11:00"),
                Role::Admin,
                &[],
            )
            .await;
        match result {
            Err(ApplicationError::Domain(BookingError::RateNotFound { subject, role })) => {
                assert_eq!(subject, RateSubject::Room(world.room.id));
                assert_eq!(role, Role::Admin);
            }
            other => panic!("expected RateNotFound, got {other:?}"),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_reject_unknown_equipment() {
        let world = World::new();
        let unknown = EquipmentId::new();
        let result = engine(&world)
            .price(
                world.room.id,
                range("2024-01-02T10:00", "2024-01-02T11:00"),
                Role::Member,
                &[EquipmentLine {
                    equipment_id: unknown,
                    quantity: 1,
                }],
            )
            .await;
        assert!(matches!(
            result,
            Err(ApplicationError::Domain(BookingError::EquipmentNotFound(id))) if id == unknown
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_reject_equipment_held_by_another_room() {
        let world = World::new();
        let other_room = world.add_room("Green room").await;
        let holding = Reservation::pending(
            other_room,
            world.member.id,
            range("2024-01-02T10:00", "2024-01-02T12:00"),
            vec![EquipmentLine {
                equipment_id: world.projector.id,
                quantity: 2,
            }],
            Utc::now(),
        );
        world.store.append(holding, 0).await.unwrap();

        let result = engine(&world)
            .price(
                world.room.id,
                range("2024-01-02T11:00", "2024-01-02T12:00"),
                Role::Member,
                &[EquipmentLine {
                    equipment_id: world.projector.id,
                    quantity: 2,
                }],
            )
            .await;
        assert!(matches!(
            result,
            Err(ApplicationError::Domain(BookingError::InsufficientStock {
                requested: 2,
                available: 1,
                ..
            }))
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_reject_a_zero_quantity_before_touching_rates() {
        let world = World::new();
        let result = engine(&world)
            .price(
                world.room.id,
                range("2024-01-02T10:00", "2024-01-02T11:00"),
                Role::Admin,
                &[EquipmentLine {
                    equipment_id: world.projector.id,
                    quantity: 0,
                }],
            )
            .await;
        assert!(matches!(
            result,
            Err(ApplicationError::Domain(BookingError::InvalidQuantity { quantity: 0, .. }))
        ));
    }
}
