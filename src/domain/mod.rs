//! Core domain types and logic.

pub mod sizing;
pub mod trade;
pub mod journal;
pub mod wizard;
pub mod settings;
pub mod config_validation;
pub mod input_validation;
pub mod error;
