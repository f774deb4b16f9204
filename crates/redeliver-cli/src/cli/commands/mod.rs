//! CLI command handlers.

mod config;
mod simulate;
mod uuid;

pub use config::run_config;
pub use simulate::{run_simulate, FailureKind, SimulateArgs};
pub use uuid::run_uuid;
