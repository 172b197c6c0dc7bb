//! Front ends driving the checkout controller.

pub mod terminal;
