//! phyled — LED configuration for the RTL8211E Ethernet PHY over MDIO.

pub mod apply;
pub mod config;
pub mod error;
pub mod led;
pub mod mdio;
pub mod phy;
pub mod protocol;
pub mod report;

pub use error::PhyledError;
