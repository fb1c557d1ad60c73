//! System orchestration, configuration, startup and shutdown.

pub mod config;
pub mod inventory_system;
pub mod telemetry;

pub use config::*;
pub use inventory_system::*;
pub use telemetry::*;
