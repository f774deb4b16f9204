use std::time::Duration;

use crate::config::RedeliveryConfig;

use super::classify::is_caused_by_connect_error;
use super::error::PolicyError;
use super::exchange::Exchange;

const CONNECT_ERROR_NAME: &str = "ConnectError";
const CONNECT_ERROR_MESSAGE: &str = "Exception on connecting to the target";

/// A policy the host consults after every failed delivery attempt.
pub trait RedeliveryPolicy: Send + Sync {
    /// Returns `true` if the message should be redelivered, `false` if retries
    /// are exhausted and the host should route it to failure handling.
    fn decide(&self, exchange: &mut Exchange) -> Result<bool, PolicyError>;

    /// Delay the host should wait before the next attempt.
    fn retry_delay(&self) -> Duration;
}

/// What a single evaluation decided, and why.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedeliveryOutcome {
    /// Redeliver the message.
    pub allow: bool,
    /// Counter the decision was made against (after any reset, before increment).
    pub counter: u32,
    /// The counter was reset because the previous failure was a connectivity one.
    pub counter_reset: bool,
    /// The failure, or one of its causes, was a connectivity failure.
    pub caused_by_connect_error: bool,
}

/// Redelivery policy with separate ceilings for connectivity failures and for
/// everything else.
///
/// The counter on the exchange is shared by both kinds. It is reset once, when
/// a non-connectivity failure follows a connectivity failure, so a message that
/// finally reaches its target gets the full `other_error_max_retries` budget.
/// Going the other way (connectivity after other) does not reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsumerRedeliveryPolicy {
    connect_error_max_retries: u32,
    other_error_max_retries: u32,
    retry_delay: Duration,
}

impl ConsumerRedeliveryPolicy {
    pub fn new(
        connect_error_max_retries: u32,
        other_error_max_retries: u32,
        retry_delay: Duration,
    ) -> Self {
        Self {
            connect_error_max_retries,
            other_error_max_retries,
            retry_delay,
        }
    }

    pub fn from_config(cfg: &RedeliveryConfig) -> Self {
        Self::new(
            cfg.connect_error_max_retries,
            cfg.other_error_max_retries,
            cfg.retry_delay(),
        )
    }

    pub fn connect_error_max_retries(&self) -> u32 {
        self.connect_error_max_retries
    }

    pub fn other_error_max_retries(&self) -> u32 {
        self.other_error_max_retries
    }

    /// Overall ceiling advertised to the host; the connectivity ceiling.
    pub fn maximum_redeliveries(&self) -> u32 {
        self.connect_error_max_retries
    }

    /// Evaluate the exchange's current failure and update its bookkeeping.
    pub fn evaluate(&self, exchange: &mut Exchange) -> Result<RedeliveryOutcome, PolicyError> {
        let caused_by_connect_error = match exchange.exception() {
            Some(ex) => is_caused_by_connect_error(ex),
            None => return Err(PolicyError::InvalidUsage),
        };
        let last_was_connect_error = exchange
            .last_failure_was_connect_error()
            .unwrap_or(false);
        let mut counter = exchange.redelivery_counter().unwrap_or(0);
        let mut counter_reset = false;

        let allow = if caused_by_connect_error {
            counter < self.connect_error_max_retries
        } else {
            if last_was_connect_error {
                counter = 0;
                counter_reset = true;
                log_redelivery_warning(exchange, "Counter reset", counter);
            }
            counter < self.other_error_max_retries
        };

        log_redelivery_warning(exchange, "Retry", counter);
        log_exception_details(exchange, caused_by_connect_error);

        exchange.set_redelivery_counter(counter.saturating_add(1));
        exchange.set_last_failure_was_connect_error(caused_by_connect_error);

        Ok(RedeliveryOutcome {
            allow,
            counter,
            counter_reset,
            caused_by_connect_error,
        })
    }
}

impl RedeliveryPolicy for ConsumerRedeliveryPolicy {
    fn decide(&self, exchange: &mut Exchange) -> Result<bool, PolicyError> {
        self.evaluate(exchange).map(|outcome| outcome.allow)
    }

    fn retry_delay(&self) -> Duration {
        self.retry_delay
    }
}

fn log_redelivery_warning(exchange: &Exchange, operation: &str, counter: u32) {
    tracing::warn!(
        context = exchange.context_name(),
        route_id = exchange.route_id().unwrap_or("-"),
        exchange_id = exchange.exchange_id(),
        operation,
        transaction_id = exchange.transaction_id().unwrap_or("-"),
        counter,
        "{} | PROCESS",
        operation
    );
}

fn log_exception_details(exchange: &Exchange, caused_by_connect_error: bool) {
    // Connectivity failures get a fixed description; their messages tend to
    // carry addresses and vary per attempt.
    let (name, message) = if caused_by_connect_error {
        (CONNECT_ERROR_NAME, CONNECT_ERROR_MESSAGE.to_string())
    } else {
        (
            exchange.exception_name().unwrap_or("unknown"),
            exchange
                .exception()
                .map(|e| e.to_string())
                .unwrap_or_default(),
        )
    };
    tracing::warn!(
        context = exchange.context_name(),
        route_id = exchange.route_id().unwrap_or("-"),
        exchange_id = exchange.exchange_id(),
        operation = "Exception details",
        transaction_id = exchange.transaction_id().unwrap_or("-"),
        name,
        detail = %message,
        "Exception details | PROCESS"
    );
}
