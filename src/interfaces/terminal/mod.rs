pub mod form;
pub mod session;
pub mod views;
