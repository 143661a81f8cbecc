// In memory implementation of every booking port.
//
// Purpose
// - Support handler tests and local development without a database.
//
// Responsibilities
// - Hold the catalog, rates, users and saved payment methods loaded from a seed.
// - Keep reservations in one ledger with a version that moves on every append,
//   and reject appends made against a stale version.
// - Compare-and-set status changes for reservations and payments.
// - Never cancel a reservation while it has an open payment, and never open a
//   payment on a reservation that is not Pending. Both paths take the ledger
//   lock before the payments lock.
//
// Testing guidance
// - `toggle_offline` makes every call fail with a backend error.
// - `set_delay_append_ms` widens the window between load and append to force races.

use crate::modules::reservations::core::catalog::{DateOverride, Equipment, Room, WeeklySchedule};
use crate::modules::reservations::core::payment::{Payment, PaymentMethod, PaymentStatus};
use crate::modules::reservations::core::ports::{
    CatalogRepository, LoadedReservations, PaymentMethodRepository, PaymentRepository,
    RateRepository, ReservationRepository, StoreError, UserDirectory,
};
use crate::modules::reservations::core::rates::{EquipmentRoleRate, RoomRoleRate};
use crate::modules::reservations::core::reservation::{Reservation, ReservationStatus};
use crate::modules::reservations::core::role::{Role, UserAccount};
use crate::shared::core::primitives::{
    EquipmentId, PaymentMethodId, ReservationId, RoomId, TimeRange, UserId,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

/// Reference data a store starts from. Also the shape of the JSON seed file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSeed {
    pub rooms: Vec<Room>,
    pub equipment: Vec<Equipment>,
    pub weekly_schedules: Vec<WeeklySchedule>,
    pub date_overrides: Vec<DateOverride>,
    pub room_rates: Vec<RoomRoleRate>,
    pub equipment_rates: Vec<EquipmentRoleRate>,
    pub users: Vec<UserAccount>,
    pub payment_methods: Vec<PaymentMethod>,
}

#[derive(Default)]
struct Ledger {
    reservations: Vec<Reservation>,
    version: u64,
}

pub struct InMemoryBookingStore {
    catalog: RwLock<CatalogSeed>,
    ledger: RwLock<Ledger>,
    payments: RwLock<Vec<Payment>>,
    offline: bool,
    delay_append_ms: AtomicU64,
}

impl Default for InMemoryBookingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self::from_seed(CatalogSeed::default())
    }

    pub fn from_seed(seed: CatalogSeed) -> Self {
        Self {
            catalog: RwLock::new(seed),
            ledger: RwLock::new(Ledger::default()),
            payments: RwLock::new(Vec::new()),
            offline: false,
            delay_append_ms: AtomicU64::new(0),
        }
    }

    pub fn toggle_offline(&mut self) {
        self.offline = !self.offline;
    }

    pub fn set_delay_append_ms(&self, ms: u64) {
        self.delay_append_ms.store(ms, Ordering::SeqCst);
    }

    /// Mutates reference data in place, e.g. to add a room after startup.
    pub async fn update_catalog(&self, apply: impl FnOnce(&mut CatalogSeed)) {
        let mut catalog = self.catalog.write().await;
        apply(&mut *catalog);
    }

    pub async fn reservation_count(&self) -> usize {
        self.ledger.read().await.reservations.len()
    }

    pub async fn payment_count(&self) -> usize {
        self.payments.read().await.len()
    }

    fn ensure_online(&self) -> Result<(), StoreError> {
        if self.offline {
            return Err(StoreError::Backend("booking store offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogRepository for InMemoryBookingStore {
    async fn room(&self, id: RoomId) -> Result<Option<Room>, StoreError> {
        self.ensure_online()?;
        let catalog = self.catalog.read().await;
        Ok(catalog.rooms.iter().find(|room| room.id == id).cloned())
    }

    async fn equipment(&self, id: EquipmentId) -> Result<Option<Equipment>, StoreError> {
        self.ensure_online()?;
        let catalog = self.catalog.read().await;
        Ok(catalog.equipment.iter().find(|item| item.id == id).cloned())
    }

    async fn weekly_schedules(&self, room_id: RoomId) -> Result<Vec<WeeklySchedule>, StoreError> {
        self.ensure_online()?;
        let catalog = self.catalog.read().await;
        Ok(catalog
            .weekly_schedules
            .iter()
            .filter(|row| row.room_id == room_id)
            .cloned()
            .collect())
    }

    async fn date_overrides(
        &self,
        room_id: RoomId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DateOverride>, StoreError> {
        self.ensure_online()?;
        let catalog = self.catalog.read().await;
        Ok(catalog
            .date_overrides
            .iter()
            .filter(|row| row.room_id == room_id && row.date >= from && row.date <= to)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RateRepository for InMemoryBookingStore {
    async fn room_rate(&self, room_id: RoomId, role: Role) -> Result<Option<Decimal>, StoreError> {
        self.ensure_online()?;
        let catalog = self.catalog.read().await;
        Ok(catalog
            .room_rates
            .iter()
            .find(|rate| rate.room_id == room_id && rate.role == role)
            .map(|rate| rate.hourly_rate))
    }

    async fn equipment_rate(
        &self,
        equipment_id: EquipmentId,
        role: Role,
    ) -> Result<Option<Decimal>, StoreError> {
        self.ensure_online()?;
        let catalog = self.catalog.read().await;
        Ok(catalog
            .equipment_rates
            .iter()
            .find(|rate| rate.equipment_id == equipment_id && rate.role == role)
            .map(|rate| rate.hourly_rate))
    }
}

#[async_trait]
impl ReservationRepository for InMemoryBookingStore {
    async fn load_blocking(&self, range: TimeRange) -> Result<LoadedReservations, StoreError> {
        self.ensure_online()?;
        let ledger = self.ledger.read().await;
        Ok(LoadedReservations {
            reservations: ledger
                .reservations
                .iter()
                .filter(|reservation| reservation.status.is_blocking() && reservation.range.overlaps(&range))
                .cloned()
                .collect(),
            version: ledger.version,
        })
    }

    async fn append(&self, reservation: Reservation, expected_version: u64) -> Result<(), StoreError> {
        self.ensure_online()?;
        let delay = self.delay_append_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        let mut ledger = self.ledger.write().await;
        if ledger.version != expected_version {
            return Err(StoreError::VersionMismatch {
                expected: expected_version,
                actual: ledger.version,
            });
        }
        if ledger.reservations.iter().any(|existing| existing.id == reservation.id) {
            return Err(StoreError::Conflict(format!("reservation {} already exists", reservation.id)));
        }
        ledger.reservations.push(reservation);
        ledger.version += 1;
        Ok(())
    }

    async fn get(&self, id: ReservationId) -> Result<Option<Reservation>, StoreError> {
        self.ensure_online()?;
        let ledger = self.ledger.read().await;
        Ok(ledger.reservations.iter().find(|reservation| reservation.id == id).cloned())
    }

    async fn transition(
        &self,
        id: ReservationId,
        expected: ReservationStatus,
        next: ReservationStatus,
    ) -> Result<Reservation, StoreError> {
        self.ensure_online()?;
        let mut ledger = self.ledger.write().await;
        let reservation = ledger
            .reservations
            .iter_mut()
            .find(|reservation| reservation.id == id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "reservation",
                id: id.to_string(),
            })?;
        if reservation.status != expected {
            return Err(StoreError::StatusMismatch {
                entity: "reservation",
                id: id.to_string(),
                expected: expected.as_str(),
                actual: reservation.status.as_str(),
            });
        }
        if next == ReservationStatus::Cancelled {
            let payments = self.payments.read().await;
            if let Some(open) = payments
                .iter()
                .find(|payment| payment.reservation_id == id && payment.is_open())
            {
                return Err(StoreError::Conflict(format!(
                    "reservation {id} has a {} payment",
                    open.status.as_str()
                )));
            }
        }
        reservation.status = next;
        Ok(reservation.clone())
    }

    async fn pending_created_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Reservation>, StoreError> {
        self.ensure_online()?;
        let ledger = self.ledger.read().await;
        Ok(ledger
            .reservations
            .iter()
            .filter(|reservation| {
                reservation.status == ReservationStatus::Pending && reservation.created_at < cutoff
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PaymentRepository for InMemoryBookingStore {
    async fn open_attempt(&self, payment: Payment) -> Result<(), StoreError> {
        self.ensure_online()?;
        let ledger = self.ledger.read().await;
        let status = ledger
            .reservations
            .iter()
            .find(|reservation| reservation.id == payment.reservation_id)
            .map(|reservation| reservation.status)
            .ok_or_else(|| StoreError::NotFound {
                entity: "reservation",
                id: payment.reservation_id.to_string(),
            })?;
        if status != ReservationStatus::Pending {
            return Err(StoreError::Conflict(format!(
                "reservation {} is {}",
                payment.reservation_id,
                status.as_str()
            )));
        }
        let mut payments = self.payments.write().await;
        if let Some(open) = payments
            .iter()
            .find(|existing| existing.reservation_id == payment.reservation_id && existing.is_open())
        {
            return Err(StoreError::Conflict(format!(
                "reservation {} already has a {} payment",
                payment.reservation_id,
                open.status.as_str()
            )));
        }
        payments.push(payment);
        Ok(())
    }

    async fn update(&self, payment: Payment, expected: PaymentStatus) -> Result<(), StoreError> {
        self.ensure_online()?;
        let mut payments = self.payments.write().await;
        let stored = payments
            .iter_mut()
            .find(|existing| existing.id == payment.id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "payment",
                id: payment.id.to_string(),
            })?;
        if stored.status != expected {
            return Err(StoreError::StatusMismatch {
                entity: "payment",
                id: payment.id.to_string(),
                expected: expected.as_str(),
                actual: stored.status.as_str(),
            });
        }
        *stored = payment;
        Ok(())
    }

    async fn for_reservation(&self, reservation_id: ReservationId) -> Result<Vec<Payment>, StoreError> {
        self.ensure_online()?;
        let payments = self.payments.read().await;
        Ok(payments
            .iter()
            .filter(|payment| payment.reservation_id == reservation_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PaymentMethodRepository for InMemoryBookingStore {
    async fn payment_method(&self, id: PaymentMethodId) -> Result<Option<PaymentMethod>, StoreError> {
        self.ensure_online()?;
        let catalog = self.catalog.read().await;
        Ok(catalog.payment_methods.iter().find(|method| method.id == id).cloned())
    }
}

#[async_trait]
impl UserDirectory for InMemoryBookingStore {
    async fn role_of(&self, user_id: UserId) -> Result<Option<Role>, StoreError> {
        self.ensure_online()?;
        let catalog = self.catalog.read().await;
        Ok(catalog
            .users
            .iter()
            .find(|user| user.id == user_id)
            .map(|user| user.role))
    }
}
