// Runtime configuration.
//
// Sources, later ones win:
// - config/default.toml
// - config/{env}.toml
// - environment variables prefixed with ROOM_BOOKINGS, sections split by `__`
//   (e.g. ROOM_BOOKINGS__SERVER__PORT=9000)

use crate::modules::reservations::adapters::outbound::in_memory_store::CatalogSeed;
use crate::modules::reservations::core::rates::is_valid_rate;
use anyhow::{Context, bail};
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub booking: BookingSettings,
    #[serde(default)]
    pub payments: PaymentSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// JSON file with rooms, schedules, rates, users and saved payment methods.
    #[serde(default)]
    pub seed: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingSettings {
    /// How long an unpaid Pending reservation holds its slot.
    #[serde(default = "default_pending_ttl")]
    pub pending_ttl_seconds: u64,
    #[serde(default = "default_sweep_interval")]
    pub expiry_sweep_interval_seconds: u64,
    /// Decisions retried after a concurrent booking moved the ledger.
    #[serde(default = "default_reserve_attempts")]
    pub max_reserve_attempts: u32,
}

impl Default for BookingSettings {
    fn default() -> Self {
        Self {
            pending_ttl_seconds: default_pending_ttl(),
            expiry_sweep_interval_seconds: default_sweep_interval(),
            max_reserve_attempts: default_reserve_attempts(),
        }
    }
}

impl BookingSettings {
    pub fn pending_ttl(&self) -> TimeDelta {
        TimeDelta::seconds(i64::try_from(self.pending_ttl_seconds).unwrap_or(i64::MAX / 1_000))
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.expiry_sweep_interval_seconds.max(1))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSettings {
    #[serde(default = "default_payment_timeout")]
    pub timeout_ms: u64,
    /// Payer references the simulated gateway declines.
    #[serde(default)]
    pub declined_payers: Vec<String>,
}

impl Default for PaymentSettings {
    fn default() -> Self {
        Self {
            timeout_ms: default_payment_timeout(),
            declined_payers: Vec::new(),
        }
    }
}

impl PaymentSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// EnvFilter directive, used when RUST_LOG is not set.
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

impl AppConfig {
    pub fn load(env: &str) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("ROOM_BOOKINGS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

pub fn load_seed(path: impl AsRef<Path>) -> anyhow::Result<CatalogSeed> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read seed file {}", path.display()))?;
    parse_seed(&raw).with_context(|| format!("invalid seed file {}", path.display()))
}

pub fn parse_seed(raw: &str) -> anyhow::Result<CatalogSeed> {
    let seed: CatalogSeed = serde_json::from_str(raw)?;
    if let Some(rate) = seed.room_rates.iter().find(|rate| !is_valid_rate(rate.hourly_rate)) {
        bail!("negative {} rate for room {}", rate.role, rate.room_id);
    }
    if let Some(rate) = seed
        .equipment_rates
        .iter()
        .find(|rate| !is_valid_rate(rate.hourly_rate))
    {
        bail!("negative {} rate for equipment {}", rate.role, rate.equipment_id);
    }
    let mut seen = HashSet::new();
    if let Some(rate) = seed
        .room_rates
        .iter()
        .find(|rate| !seen.insert((rate.room_id, rate.role)))
    {
        bail!("duplicate {} rate for room {}", rate.role, rate.room_id);
    }
    let mut seen = HashSet::new();
    if let Some(rate) = seed
        .equipment_rates
        .iter()
        .find(|rate| !seen.insert((rate.equipment_id, rate.role)))
    {
        bail!("duplicate {} rate for equipment {}", rate.role, rate.equipment_id);
    }
    if let Some(row) = seed.weekly_schedules.iter().find(|row| !row.has_window()) {
        bail!(
            "weekly hours {}-{} on {} for room {} never open",
            row.start,
            row.end,
            row.weekday,
            row.room_id
        );
    }
    if let Some(row) = seed
        .date_overrides
        .iter()
        .find(|row| row.is_open && row.window().is_none())
    {
        bail!("open override on {} for room {} has no window", row.date, row.room_id);
    }
    Ok(seed)
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_pending_ttl() -> u64 {
    900
}

fn default_sweep_interval() -> u64 {
    60
}

fn default_reserve_attempts() -> u32 {
    3
}

fn default_payment_timeout() -> u64 {
    10_000
}

fn default_filter() -> String {
    "info,tower_http=info".to_string()
}
