// A small seeded world shared by handler, adapter and flow tests.
//
// - "Blue room": open Tuesdays 10:00-18:00, member rate 20.00
// - Projector: stock 3, member rate 2.50 per unit
// - member (rates exist) and admin (no rates, to exercise RateNotFound)
// - a credit card saved by the member

use crate::modules::reservations::adapters::outbound::in_memory_store::{
    CatalogSeed, InMemoryBookingStore,
};
use crate::modules::reservations::adapters::outbound::simulated_gateway::SimulatedGateway;
use crate::modules::reservations::core::catalog::{
    Equipment, EquipmentLine, Room, RoomStatus, WeeklySchedule,
};
use crate::modules::reservations::core::payment::PaymentMethod;
use crate::modules::reservations::core::payments::methods::PaymentMethodType;
use crate::modules::reservations::core::payments::registry::{GatewayProcessor, PaymentRegistry};
use crate::modules::reservations::core::rates::{EquipmentRoleRate, RoomRoleRate};
use crate::modules::reservations::core::reservation::Reservation;
use crate::modules::reservations::core::role::{Role, UserAccount};
use crate::modules::reservations::use_cases::create_pending_reservation::command::CreatePendingReservation;
use crate::modules::reservations::use_cases::create_pending_reservation::handler::CreatePendingReservationHandler;
use crate::shared::core::primitives::{
    EquipmentId, PaymentMethodId, RoomId, TimeRange, UserId,
};
use crate::shell::config::BookingSettings;
use crate::shell::state::AppState;
use chrono::{NaiveDateTime, NaiveTime, Utc, Weekday};
use rstest::fixture;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;

pub fn at(value: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M").unwrap()
}

pub fn range(start: &str, end: &str) -> TimeRange {
    TimeRange::new(at(start), at(end)).unwrap()
}

pub fn card_options() -> Value {
    json!({
        "card_holder": "Ada Lovelace",
        "card_number": "4000 0000 0000 4242",
        "expiration_date": "12/30",
        "cvv": "123"
    })
}

/// Registers one gateway-backed processor per method type.
pub fn registry_over(gateway: Arc<SimulatedGateway>, timeout: Duration) -> Arc<PaymentRegistry> {
    let mut registry = PaymentRegistry::new(timeout);
    for method in PaymentMethodType::ALL {
        registry.register(method, Arc::new(GatewayProcessor::new(gateway.clone())));
    }
    Arc::new(registry)
}

fn tuesday_hours(room_id: RoomId) -> WeeklySchedule {
    WeeklySchedule {
        room_id,
        weekday: Weekday::Tue,
        start: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        end: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
    }
}

fn active_room(name: &str) -> Room {
    Room {
        id: RoomId::new(),
        name: name.into(),
        capacity: 8,
        width_m: Some(dec!(5.5)),
        length_m: Some(dec!(7)),
        status: RoomStatus::Active,
        equipment: Vec::new(),
    }
}

pub struct World {
    pub store: Arc<InMemoryBookingStore>,
    pub room: Room,
    pub projector: Equipment,
    pub member: UserAccount,
    pub admin: UserAccount,
    pub saved_card: PaymentMethod,
}

#[fixture]
pub fn world() -> World {
    World::new()
}

impl World {
    pub fn new() -> Self {
        Self::build(false)
    }

    pub fn offline() -> Self {
        Self::build(true)
    }

    fn build(offline: bool) -> Self {
        let room = active_room("Blue room");
        let projector = Equipment {
            id: EquipmentId::new(),
            name: "Projector".into(),
            stock: 3,
        };
        let member = UserAccount {
            id: UserId::new(),
            role: Role::Member,
        };
        let admin = UserAccount {
            id: UserId::new(),
            role: Role::Admin,
        };
        let saved_card = PaymentMethod {
            id: PaymentMethodId::new(),
            user_id: member.id,
            label: "Work card".into(),
            type_key: "credit_card".into(),
            data: card_options(),
        };
        let seed = CatalogSeed {
            rooms: vec![room.clone()],
            equipment: vec![projector.clone()],
            weekly_schedules: vec![tuesday_hours(room.id)],
            date_overrides: Vec::new(),
            room_rates: vec![RoomRoleRate {
                room_id: room.id,
                role: Role::Member,
                hourly_rate: dec!(20.00),
            }],
            equipment_rates: vec![EquipmentRoleRate {
                equipment_id: projector.id,
                role: Role::Member,
                hourly_rate: dec!(2.50),
            }],
            users: vec![member.clone(), admin.clone()],
            payment_methods: vec![saved_card.clone()],
        };
        let mut store = InMemoryBookingStore::from_seed(seed);
        if offline {
            store.toggle_offline();
        }
        Self {
            store: Arc::new(store),
            room,
            projector,
            member,
            admin,
            saved_card,
        }
    }

    /// Adds another active room with the same hours and member rate.
    pub async fn add_room(&self, name: &str) -> RoomId {
        let room = active_room(name);
        let room_id = room.id;
        self.store
            .update_catalog(|catalog| {
                catalog.rooms.push(room);
                catalog.weekly_schedules.push(tuesday_hours(room_id));
                catalog.room_rates.push(RoomRoleRate {
                    room_id,
                    role: Role::Member,
                    hourly_rate: dec!(20.00),
                });
            })
            .await;
        room_id
    }

    pub async fn reserve(&self, start: &str, end: &str) -> Reservation {
        self.reserve_as(self.member.id, start, end).await
    }

    pub async fn reserve_as(&self, user_id: UserId, start: &str, end: &str) -> Reservation {
        self.book(user_id, start, end, Vec::new()).await
    }

    /// Member reservation holding equipment.
    pub async fn reserve_with(&self, start: &str, end: &str, equipment: Vec<EquipmentLine>) -> Reservation {
        self.book(self.member.id, start, end, equipment).await
    }

    async fn book(&self, user_id: UserId, start: &str, end: &str, equipment: Vec<EquipmentLine>) -> Reservation {
        CreatePendingReservationHandler::new(self.store.clone(), self.store.clone(), 3)
            .handle(CreatePendingReservation {
                room_id: self.room.id,
                user_id,
                start: at(start),
                end: at(end),
                equipment,
                requested_at: Utc::now(),
            })
            .await
            .expect("expected the fixture reservation to be accepted")
    }

    pub fn state(&self) -> AppState {
        self.state_with(registry_over(
            Arc::new(SimulatedGateway::new()),
            Duration::from_secs(1),
        ))
    }

    pub fn state_with(&self, registry: Arc<PaymentRegistry>) -> AppState {
        AppState::in_memory(self.store.clone(), registry, &BookingSettings::default())
    }
}
