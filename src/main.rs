use anyhow::Context;
use room_bookings::modules::reservations::adapters::outbound::in_memory_store::{
    CatalogSeed, InMemoryBookingStore,
};
use room_bookings::modules::reservations::adapters::outbound::simulated_gateway::SimulatedGateway;
use room_bookings::modules::reservations::core::payments::methods::PaymentMethodType;
use room_bookings::modules::reservations::core::payments::registry::{
    GatewayProcessor, PaymentRegistry,
};
use room_bookings::shell::config::{AppConfig, PaymentSettings, load_seed};
use room_bookings::shell::http::router;
use room_bookings::shell::state::AppState;
use room_bookings::shell::workers::spawn_expiry_sweeper;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
    let config = AppConfig::load(&env).context("failed to load configuration")?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.filter))
        .context("invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let seed = match &config.seed {
        Some(path) => load_seed(path)?,
        None => CatalogSeed::default(),
    };
    tracing::info!(
        rooms = seed.rooms.len(),
        equipment = seed.equipment.len(),
        users = seed.users.len(),
        "catalog loaded"
    );

    let store = Arc::new(InMemoryBookingStore::from_seed(seed));
    let registry = payment_registry(&config.payments);
    let state = AppState::in_memory(store, registry, &config.booking);

    let sweeper = spawn_expiry_sweeper(state.expire_stale.clone(), config.booking.sweep_interval());

    let address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    tracing::info!(%address, %env, "room bookings listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.abort();
    tracing::info!("shut down");
    Ok(())
}

fn payment_registry(settings: &PaymentSettings) -> Arc<PaymentRegistry> {
    let gateway = settings
        .declined_payers
        .iter()
        .fold(SimulatedGateway::new(), |gateway, payer| gateway.declining(payer.clone()));
    let gateway = Arc::new(gateway);

    let mut registry = PaymentRegistry::new(settings.timeout());
    for method in PaymentMethodType::ALL {
        registry.register(method, Arc::new(GatewayProcessor::new(gateway.clone())));
    }
    Arc::new(registry)
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for shutdown signal");
    }
}
