//! Payment request event types
//!
//! This module defines the lifecycle events the MoneyMoov API records against a
//! payment request, along with the closed vocabularies (event types, processors,
//! currencies) those events carry.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::attempt::PaymentMethodType;

/// Payment request identifier
pub type PaymentRequestId = Uuid;

/// Lifecycle event types recorded against a payment request
///
/// Card events come from the card processors (authorisation, capture, void and
/// the 3-D Secure payer authentication steps). PISP events come from the open
/// banking payment initiation flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentRequestEventType {
    /// 3-D Secure payer authentication setup, carries the card request ID
    CardPayerAuthenticationSetup,
    CardPayerAuthenticationEnrollment,
    CardPayerAuthenticationValidation,
    CardAuthorization,
    /// Combined authorisation and capture
    CardSale,
    CardCapture,
    CardVoid,
    PispInitiate,
    PispCallback,
    PispWebhook,
    PispSettle,
    PispSettleFailure,
}

impl PaymentRequestEventType {
    /// All event types, in declaration order
    pub const ALL: [PaymentRequestEventType; 12] = [
        Self::CardPayerAuthenticationSetup,
        Self::CardPayerAuthenticationEnrollment,
        Self::CardPayerAuthenticationValidation,
        Self::CardAuthorization,
        Self::CardSale,
        Self::CardCapture,
        Self::CardVoid,
        Self::PispInitiate,
        Self::PispCallback,
        Self::PispWebhook,
        Self::PispSettle,
        Self::PispSettleFailure,
    ];

    /// Wire name of the event type
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CardPayerAuthenticationSetup => "card_payer_authentication_setup",
            Self::CardPayerAuthenticationEnrollment => "card_payer_authentication_enrollment",
            Self::CardPayerAuthenticationValidation => "card_payer_authentication_validation",
            Self::CardAuthorization => "card_authorization",
            Self::CardSale => "card_sale",
            Self::CardCapture => "card_capture",
            Self::CardVoid => "card_void",
            Self::PispInitiate => "pisp_initiate",
            Self::PispCallback => "pisp_callback",
            Self::PispWebhook => "pisp_webhook",
            Self::PispSettle => "pisp_settle",
            Self::PispSettleFailure => "pisp_settle_failure",
        }
    }

    /// The payment rail this event type belongs to
    pub fn rail(&self) -> PaymentMethodType {
        match self {
            Self::CardPayerAuthenticationSetup
            | Self::CardPayerAuthenticationEnrollment
            | Self::CardPayerAuthenticationValidation
            | Self::CardAuthorization
            | Self::CardSale
            | Self::CardCapture
            | Self::CardVoid => PaymentMethodType::Card,
            Self::PispInitiate
            | Self::PispCallback
            | Self::PispWebhook
            | Self::PispSettle
            | Self::PispSettleFailure => PaymentMethodType::Pisp,
        }
    }
}

impl fmt::Display for PaymentRequestEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentRequestEventType {
    type Err = String;

    /// Parse an event type, ignoring ASCII case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|event_type| event_type.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| s.to_string())
    }
}

/// Upstream payment processors known to MoneyMoov
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentProcessor {
    #[default]
    None,
    CyberSource,
    /// Checkout.com; emits no separate authorisation confirmation for sales
    Checkout,
    Stripe,
    Modulr,
    Plaid,
    Yapily,
    NoFrixion,
    Bitcoin,
    BitcoinTestnet,
}

impl PaymentProcessor {
    pub const ALL: [PaymentProcessor; 10] = [
        Self::None,
        Self::CyberSource,
        Self::Checkout,
        Self::Stripe,
        Self::Modulr,
        Self::Plaid,
        Self::Yapily,
        Self::NoFrixion,
        Self::Bitcoin,
        Self::BitcoinTestnet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::CyberSource => "CyberSource",
            Self::Checkout => "Checkout",
            Self::Stripe => "Stripe",
            Self::Modulr => "Modulr",
            Self::Plaid => "Plaid",
            Self::Yapily => "Yapily",
            Self::NoFrixion => "NoFrixion",
            Self::Bitcoin => "Bitcoin",
            Self::BitcoinTestnet => "BitcoinTestnet",
        }
    }
}

impl fmt::Display for PaymentProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentProcessor {
    type Err = String;

    /// Parse a processor name, ignoring ASCII case. An empty string is `None`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::None);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|processor| processor.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| s.to_string())
    }
}

/// Currencies a payment request can be denominated in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    None,
    GBP,
    EUR,
    USD,
    BTC,
}

impl Currency {
    pub const ALL: [Currency; 5] = [Self::None, Self::GBP, Self::EUR, Self::USD, Self::BTC];

    /// ISO 4217 style code
    pub fn code(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::GBP => "GBP",
            Self::EUR => "EUR",
            Self::USD => "USD",
            Self::BTC => "BTC",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::None);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|currency| currency.code().eq_ignore_ascii_case(s))
            .ok_or_else(|| s.to_string())
    }
}

/// A single lifecycle event recorded against a payment request
///
/// Events are supplied by the caller, already deserialized from the API's event
/// listing or webhook payloads. Only a subset of fields is meaningful for each
/// rail: the `card_*` fields for card events, the `pisp_*` fields for PISP events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequestEvent {
    /// The payment request this event was recorded against
    pub payment_request_id: PaymentRequestId,

    pub event_type: PaymentRequestEventType,

    /// When the event was recorded by the API
    pub inserted_at: DateTime<Utc>,

    pub amount: Decimal,

    #[serde(default)]
    pub currency: Currency,

    /// Processor specific status string
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub processor: PaymentProcessor,

    /// Correlates a payer authentication setup with its authorisation
    #[serde(default)]
    pub card_request_id: Option<String>,

    /// Card rail correlation key
    #[serde(default)]
    pub card_authorization_response_id: Option<String>,

    /// PISP rail correlation key
    #[serde(default)]
    pub pisp_payment_initiation_id: Option<String>,

    /// The bank (institution) the PISP payment was initiated with
    #[serde(default)]
    pub pisp_payment_service_provider_id: Option<String>,

    /// Bank side status reported alongside a PISP callback or webhook
    #[serde(default)]
    pub pisp_bank_status: Option<String>,

    /// Wallet used for a card payment (e.g. Apple Pay, Google Pay)
    #[serde(default)]
    pub wallet_name: Option<String>,
}

impl PaymentRequestEvent {
    /// Create an event with only the required fields set
    pub fn new(
        payment_request_id: PaymentRequestId,
        event_type: PaymentRequestEventType,
        inserted_at: DateTime<Utc>,
        amount: Decimal,
    ) -> Self {
        Self {
            payment_request_id,
            event_type,
            inserted_at,
            amount,
            currency: Currency::None,
            status: None,
            processor: PaymentProcessor::None,
            card_request_id: None,
            card_authorization_response_id: None,
            pisp_payment_initiation_id: None,
            pisp_payment_service_provider_id: None,
            pisp_bank_status: None,
            wallet_name: None,
        }
    }

    /// The correlation key used to group this event on the given rail
    ///
    /// Returns `None` when the key is absent or empty; such events never form
    /// an attempt.
    pub fn correlation_key(&self, rail: PaymentMethodType) -> Option<&str> {
        let key = match rail {
            PaymentMethodType::Card => self.card_authorization_response_id.as_deref(),
            PaymentMethodType::Pisp => self.pisp_payment_initiation_id.as_deref(),
        };
        key.filter(|k| !k.is_empty())
    }

    /// Whether the event's status equals `code`
    pub fn has_status(&self, code: &str) -> bool {
        self.status.as_deref() == Some(code)
    }
}
