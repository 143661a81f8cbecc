// Registry of payment processors keyed by method.
//
// Purpose
// - Dispatch a pay request to the processor bound to a method key, after the
//   options payload has been validated against that method's shape.
//
// Responsibilities
// - Unknown or unregistered keys fail with UnknownMethod. There is no default processor.
// - Validation happens in `prepare`, before anything is charged or persisted.
// - Processor calls are bounded by a timeout. A timeout or gateway error yields a
//   Failed result. Nothing is retried.

use crate::modules::reservations::core::errors::BookingError;
use crate::modules::reservations::core::payment::PaymentStatus;
use crate::modules::reservations::core::payments::methods::{PaymentMethodType, PaymentOptions};
use crate::modules::reservations::core::ports::{
    GatewayCharge, GatewayError, PaymentGateway, PaymentReceipt,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    async fn process(
        &self,
        amount: Decimal,
        options: &PaymentOptions,
    ) -> Result<PaymentReceipt, GatewayError>;
}

/// Processor that forwards a charge to an injected gateway.
pub struct GatewayProcessor<TGateway: PaymentGateway> {
    gateway: Arc<TGateway>,
}

impl<TGateway: PaymentGateway> GatewayProcessor<TGateway> {
    pub fn new(gateway: Arc<TGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl<TGateway: PaymentGateway + 'static> PaymentProcessor for GatewayProcessor<TGateway> {
    async fn process(
        &self,
        amount: Decimal,
        options: &PaymentOptions,
    ) -> Result<PaymentReceipt, GatewayError> {
        self.gateway
            .charge(GatewayCharge {
                method: options.method(),
                amount,
                payer_reference: options.payer_reference(),
            })
            .await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentResult {
    pub method: PaymentMethodType,
    pub amount: Decimal,
    pub status: PaymentStatus,
    pub reference: Option<String>,
    pub failure_reason: Option<String>,
}

pub struct PreparedPayment {
    pub options: PaymentOptions,
    processor: Arc<dyn PaymentProcessor>,
}

impl PreparedPayment {
    pub fn method(&self) -> PaymentMethodType {
        self.options.method()
    }
}

pub struct PaymentRegistry {
    processors: HashMap<PaymentMethodType, Arc<dyn PaymentProcessor>>,
    timeout: Duration,
}

impl PaymentRegistry {
    pub fn new(timeout: Duration) -> Self {
        Self {
            processors: HashMap::new(),
            timeout,
        }
    }

    pub fn register(
        &mut self,
        method: PaymentMethodType,
        processor: Arc<dyn PaymentProcessor>,
    ) -> &mut Self {
        self.processors.insert(method, processor);
        self
    }

    pub fn supported(&self) -> Vec<PaymentMethodType> {
        PaymentMethodType::ALL
            .into_iter()
            .filter(|method| self.processors.contains_key(method))
            .collect()
    }

    pub fn get_processor(&self, type_key: &str) -> Result<Arc<dyn PaymentProcessor>, BookingError> {
        self.lookup(type_key).map(|(_, processor)| processor)
    }

    pub fn prepare(&self, type_key: &str, raw_options: &Value) -> Result<PreparedPayment, BookingError> {
        let (method, processor) = self.lookup(type_key)?;
        let options = method.parse_options(raw_options)?;
        Ok(PreparedPayment { options, processor })
    }

    fn lookup(
        &self,
        type_key: &str,
    ) -> Result<(PaymentMethodType, Arc<dyn PaymentProcessor>), BookingError> {
        PaymentMethodType::from_key(type_key)
            .and_then(|method| {
                self.processors
                    .get(&method)
                    .map(|processor| (method, processor.clone()))
            })
            .ok_or_else(|| BookingError::UnknownMethod {
                type_key: type_key.to_string(),
            })
    }

    pub async fn execute(&self, prepared: &PreparedPayment, amount: Decimal) -> PaymentResult {
        let method = prepared.method();
        let outcome = tokio::time::timeout(
            self.timeout,
            prepared.processor.process(amount, &prepared.options),
        )
        .await
        .unwrap_or_else(|_| Err(GatewayError::Timeout(self.timeout)));

        match outcome {
            Ok(receipt) => PaymentResult {
                method,
                amount,
                status: PaymentStatus::Completed,
                reference: Some(receipt.reference),
                failure_reason: None,
            },
            Err(error) => {
                tracing::warn!(%method, %error, "payment processor failed");
                PaymentResult {
                    method,
                    amount,
                    status: PaymentStatus::Failed,
                    reference: None,
                    failure_reason: Some(error.to_string()),
                }
            }
        }
    }

    pub async fn pay(
        &self,
        type_key: &str,
        amount: Decimal,
        raw_options: &Value,
    ) -> Result<PaymentResult, BookingError> {
        if amount.is_sign_negative() {
            return Err(BookingError::InvalidAmount(amount));
        }
        let prepared = self.prepare(type_key, raw_options)?;
        Ok(self.execute(&prepared, amount).await)
    }
}
