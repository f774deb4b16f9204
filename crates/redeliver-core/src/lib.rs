pub mod config;
pub mod id;
pub mod logging;
pub mod retry;
