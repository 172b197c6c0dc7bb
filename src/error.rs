use crate::domain::card::ValidationErrors;
use crate::domain::ports::PaymentFailure;
use crate::domain::wizard::Step;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Catalog error: {0}")]
    CatalogError(String),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Discount must be a non-negative amount with at most two decimals, got {0}")]
    InvalidDiscount(Decimal),
    #[error("Unknown plan: {0}")]
    UnknownPlan(String),
    #[error("Unknown payment method: {0}")]
    UnknownMethod(String),
    #[error("Cannot {action} while on step '{step}'")]
    InvalidTransition { step: Step, action: &'static str },
    #[error("A payment is already being processed")]
    PaymentInProgress,
    #[error("Invalid payment details: {0}")]
    ValidationError(#[from] ValidationErrors),
    #[error("Payment failed: {0}")]
    PaymentFailed(#[from] PaymentFailure),
}

pub type Result<T> = std::result::Result<T, CheckoutError>;
