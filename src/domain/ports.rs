use super::card::{ValidatedCard, ValidationErrors};
use super::money::Money;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the customer pays for a [`PaymentRequest`].
#[derive(Debug, Clone)]
pub enum Instrument {
    Card(ValidatedCard),
    /// Details are collected by the provider's own checkout.
    Hosted,
}

#[derive(Debug, Clone)]
pub struct PaymentRequest {
    pub plan_id: String,
    pub method_id: String,
    pub amount: Money,
    pub currency: String,
    pub instrument: Instrument,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReceipt {
    pub reference: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaymentFailure {
    #[error("payment declined: {0}")]
    Declined(String),
    #[error("payment gateway timed out")]
    Timeout,
    #[error("payment gateway error: {0}")]
    Gateway(String),
}

/// The seam where a real card network, PayPal or Razorpay integration plugs in.
///
/// A call resolves exactly once. The controller never retries an approved payment.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn submit(&self, request: PaymentRequest) -> Result<PaymentReceipt, PaymentFailure>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Failure,
}

/// A user-visible message, shown as a toast by graphical front ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn payment_succeeded() -> Self {
        Self {
            level: NotificationLevel::Success,
            title: "Payment Successful!".to_string(),
            description: "Your subscription has been activated.".to_string(),
        }
    }

    pub fn payment_failed() -> Self {
        Self {
            level: NotificationLevel::Failure,
            title: "Payment Failed".to_string(),
            description: "Please check your payment details and try again.".to_string(),
        }
    }

    pub fn invalid_details(errors: &ValidationErrors) -> Self {
        Self {
            level: NotificationLevel::Failure,
            title: "Payment Failed".to_string(),
            description: format!("Please correct your payment details: {errors}."),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

pub type PaymentGatewayBox = Box<dyn PaymentGateway>;
pub type NotifierBox = Box<dyn Notifier>;
