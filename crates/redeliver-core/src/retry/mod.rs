//! Consumer redelivery policy.
//!
//! This module decides, per failed message exchange, whether the host should
//! redeliver the message. Connectivity failures (anywhere in the error's source
//! chain) and all other failures get separate retry ceilings, and the retry
//! bookkeeping lives on the exchange itself so one policy instance can serve
//! any number of exchanges.

mod classify;
mod error;
mod exchange;
mod policy;
mod run;

pub use classify::{is_caused_by_connect_error, is_connect_error};
pub use error::{ConnectError, PolicyError};
pub use exchange::{Exchange, TRANSACTION_ID_HEADER};
pub use policy::{ConsumerRedeliveryPolicy, RedeliveryOutcome, RedeliveryPolicy};
pub use run::run_with_redelivery;
