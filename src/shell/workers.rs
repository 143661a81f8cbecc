use crate::modules::reservations::adapters::outbound::in_memory_store::InMemoryBookingStore;
use crate::modules::reservations::use_cases::expire_stale_reservations::handler::ExpireStaleReservationsHandler;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Runs the stale reservation sweep every `every` until the task is aborted.
pub fn spawn_expiry_sweeper(
    handler: Arc<ExpireStaleReservationsHandler<InMemoryBookingStore, InMemoryBookingStore>>,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match handler.handle(Utc::now()).await {
                Ok(expired) if !expired.is_empty() => {
                    tracing::debug!(?expired, "sweep cancelled reservations");
                }
                Ok(_) => {}
                Err(error) => tracing::warn!(%error, "expiry sweep failed"),
            }
        }
    })
}
