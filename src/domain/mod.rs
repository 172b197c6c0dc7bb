//! Checkout domain: catalog data, money, card input and the wizard state machine.
//!
//! Nothing in here performs I/O. The payment gateway and the notification
//! surface are reached only through the traits in [`ports`].

pub mod card;
pub mod catalog;
pub mod money;
pub mod ports;
pub mod summary;
pub mod wizard;
