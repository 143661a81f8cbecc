// Hourly rate lookup by (room or equipment, role).
//
// Rules
// - Exact match only. Admin does not inherit the User rate, nobody inherits anything.
// - A missing rate is RateNotFound. Pricing fails closed instead of charging zero.

use crate::modules::reservations::application::errors::ApplicationError;
use crate::modules::reservations::core::errors::{BookingError, RateSubject};
use crate::modules::reservations::core::ports::RateRepository;
use crate::modules::reservations::core::role::Role;
use crate::shared::core::primitives::{EquipmentId, RoomId};
use rust_decimal::Decimal;
use std::sync::Arc;

pub struct RateResolver<TRates>
where
    TRates: RateRepository + 'static,
{
    rates: Arc<TRates>,
}

impl<TRates> RateResolver<TRates>
where
    TRates: RateRepository + 'static,
{
    pub fn new(rates: Arc<TRates>) -> Self {
        Self { rates }
    }

    pub async fn resolve_room_rate(&self, room_id: RoomId, role: Role) -> Result<Decimal, ApplicationError> {
        let rate = self.rates.room_rate(room_id, role).await?;
        rate.ok_or_else(|| {
            tracing::error!(%room_id, %role, "room rate missing");
            BookingError::RateNotFound {
                subject: RateSubject::Room(room_id),
                role,
            }
            .into()
        })
    }

    pub async fn resolve_equipment_rate(
        &self,
        equipment_id: EquipmentId,
        role: Role,
    ) -> Result<Decimal, ApplicationError> {
        let rate = self.rates.equipment_rate(equipment_id, role).await?;
        rate.ok_or_else(|| {
            tracing::error!(%equipment_id, %role, "equipment rate missing");
            BookingError::RateNotFound {
                subject: RateSubject::Equipment(equipment_id),
                role,
            }
            .into()
        })
    }
}
