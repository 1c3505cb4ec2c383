//! Q.931 stack configuration
//!
//! This crate provides configuration loading and parsing:
//! - Per-interface settings (role, interface type, timers)
//! - TOML configuration file parsing

pub mod intf_config;
pub mod toml_config;

pub use intf_config::*;
pub use toml_config::*;
