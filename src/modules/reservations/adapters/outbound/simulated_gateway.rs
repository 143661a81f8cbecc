// Stand-in payment gateway for local runs and tests.
//
// Responsibilities
// - Accept every charge after an optional latency, except for payer references
//   configured to be declined.
// - Record accepted charges so tests can assert what was sent.

use crate::modules::reservations::core::ports::{
    GatewayCharge, GatewayError, PaymentGateway, PaymentReceipt,
};
use async_trait::async_trait;
use std::collections::HashSet;
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
pub struct SimulatedGateway {
    latency: Duration,
    declined: HashSet<String>,
    charges: Mutex<Vec<GatewayCharge>>,
}

impl SimulatedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn declining(mut self, payer_reference: impl Into<String>) -> Self {
        self.declined.insert(payer_reference.into());
        self
    }

    pub async fn charges(&self) -> Vec<GatewayCharge> {
        self.charges.lock().await.clone()
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn charge(&self, charge: GatewayCharge) -> Result<PaymentReceipt, GatewayError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.declined.contains(&charge.payer_reference) {
            return Err(GatewayError::Declined(format!(
                "{} refused by issuer",
                charge.payer_reference
            )));
        }
        let reference = format!("{}-{}", charge.method.key(), Uuid::now_v7().simple());
        tracing::info!(method = %charge.method, amount = %charge.amount, %reference, "charge accepted");
        self.charges.lock().await.push(charge);
        Ok(PaymentReceipt { reference })
    }
}
