//! Port traits (hexagonal architecture boundaries).

pub mod config_port;
pub mod journal_port;
