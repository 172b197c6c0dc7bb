//! Application layer orchestrating the checkout flow.
//!
//! This module defines the `CheckoutController`, which owns the wizard state,
//! resolves selections against the catalog, and calls out to the payment gateway
//! and notification ports.

pub mod checkout;
