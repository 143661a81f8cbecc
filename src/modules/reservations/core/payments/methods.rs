// Supported payment methods and their option shapes.
//
// Purpose
// - A closed set of methods, each with a typed options struct.
//
// Responsibilities
// - Map the stable string key to a method (exact, case-sensitive).
// - Validate a raw options payload by presence of every required field and
//   turn it into the typed options.

use crate::modules::reservations::core::errors::BookingError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethodType {
    #[serde(rename = "credit_card")]
    CreditCard,
    #[serde(rename = "paypal")]
    PayPal,
    #[serde(rename = "bitcoin")]
    Bitcoin,
    #[serde(rename = "bank_transfer")]
    BankTransfer,
}

impl PaymentMethodType {
    pub const ALL: [PaymentMethodType; 4] = [
        PaymentMethodType::CreditCard,
        PaymentMethodType::PayPal,
        PaymentMethodType::Bitcoin,
        PaymentMethodType::BankTransfer,
    ];

    pub fn key(self) -> &'static str {
        match self {
            PaymentMethodType::CreditCard => "credit_card",
            PaymentMethodType::PayPal => "paypal",
            PaymentMethodType::Bitcoin => "bitcoin",
            PaymentMethodType::BankTransfer => "bank_transfer",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|method| method.key() == key)
    }

    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            PaymentMethodType::CreditCard => {
                &["card_holder", "card_number", "expiration_date", "cvv"]
            }
            PaymentMethodType::PayPal => &["email"],
            PaymentMethodType::Bitcoin => &["wallet_address"],
            PaymentMethodType::BankTransfer => &["account_holder", "iban", "bic"],
        }
    }

    pub fn parse_options(self, raw: &Value) -> Result<PaymentOptions, BookingError> {
        let missing: Vec<String> = self
            .required_fields()
            .iter()
            .filter(|field| !is_present(raw.get(**field)))
            .map(|field| field.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(BookingError::InvalidPaymentOptions {
                method: self,
                missing,
            });
        }
        let options = match self {
            PaymentMethodType::CreditCard => PaymentOptions::CreditCard(self.typed(raw)?),
            PaymentMethodType::PayPal => PaymentOptions::PayPal(self.typed(raw)?),
            PaymentMethodType::Bitcoin => PaymentOptions::Bitcoin(self.typed(raw)?),
            PaymentMethodType::BankTransfer => PaymentOptions::BankTransfer(self.typed(raw)?),
        };
        Ok(options)
    }

    fn typed<T: DeserializeOwned>(self, raw: &Value) -> Result<T, BookingError> {
        serde_json::from_value(raw.clone()).map_err(|_| BookingError::InvalidPaymentOptions {
            method: self,
            missing: Vec::new(),
        })
    }
}

impl fmt::Display for PaymentMethodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

fn is_present(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::String(s)) if !s.trim().is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditCardOptions {
    pub card_holder: String,
    pub card_number: String,
    pub expiration_date: String,
    pub cvv: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPalOptions {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitcoinOptions {
    pub wallet_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankTransferOptions {
    pub account_holder: String,
    pub iban: String,
    pub bic: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOptions {
    CreditCard(CreditCardOptions),
    PayPal(PayPalOptions),
    Bitcoin(BitcoinOptions),
    BankTransfer(BankTransferOptions),
}

impl PaymentOptions {
    pub fn method(&self) -> PaymentMethodType {
        match self {
            PaymentOptions::CreditCard(_) => PaymentMethodType::CreditCard,
            PaymentOptions::PayPal(_) => PaymentMethodType::PayPal,
            PaymentOptions::Bitcoin(_) => PaymentMethodType::Bitcoin,
            PaymentOptions::BankTransfer(_) => PaymentMethodType::BankTransfer,
        }
    }

    /// Identifies the payer to a gateway without exposing full card or account numbers.
    pub fn payer_reference(&self) -> String {
        match self {
            PaymentOptions::CreditCard(card) => format!("card ****{}", last_four(&card.card_number)),
            PaymentOptions::PayPal(paypal) => paypal.email.clone(),
            PaymentOptions::Bitcoin(bitcoin) => bitcoin.wallet_address.clone(),
            PaymentOptions::BankTransfer(bank) => format!("iban ****{}", last_four(&bank.iban)),
        }
    }
}

fn last_four(number: &str) -> String {
    let digits: Vec<char> = number.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    digits[digits.len().saturating_sub(4)..].iter().collect()
}
