//! Core business logic for the Puspresma portal backend.

pub mod format;
pub mod services;

pub use services::*;
