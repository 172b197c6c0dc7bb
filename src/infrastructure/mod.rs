pub mod notifier;
pub mod simulated;
