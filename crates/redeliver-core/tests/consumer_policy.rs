//! Integration tests: the consumer redelivery policy driven across successive
//! failures of one exchange, as a host would invoke it.

use std::fmt;
use std::io;
use std::time::Duration;

use proptest::prelude::*;
use redeliver_core::config::RedeliveryConfig;
use redeliver_core::retry::{
    ConnectError, ConsumerRedeliveryPolicy, Exchange, PolicyError, RedeliveryPolicy,
    TRANSACTION_ID_HEADER,
};

/// Host-side error wrapping the real cause, like a producer failure would.
#[derive(Debug)]
struct DeliveryFailed(Box<dyn std::error::Error + Send + Sync>);

impl fmt::Display for DeliveryFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "delivery failed")
    }
}

impl std::error::Error for DeliveryFailed {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.0)
    }
}

fn policy() -> ConsumerRedeliveryPolicy {
    ConsumerRedeliveryPolicy::from_config(&RedeliveryConfig {
        connect_error_max_retries: 10,
        other_error_max_retries: 2,
        retry_delay_ms: 30_000,
    })
}

fn exchange() -> Exchange {
    Exchange::new("esb", Some("orders-in".to_string())).with_header(TRANSACTION_ID_HEADER, "tx-1")
}

fn fail_connect(ex: &mut Exchange) {
    let refused = io::Error::from(io::ErrorKind::ConnectionRefused);
    ex.set_exception(DeliveryFailed(Box::new(ConnectError::with_source("orders:9000", refused))));
}

fn fail_other(ex: &mut Exchange) {
    ex.set_exception(DeliveryFailed(Box::new(io::Error::new(
        io::ErrorKind::InvalidData,
        "schema mismatch",
    ))));
}

#[test]
fn connect_failures_run_to_ceiling_then_stop() {
    let p = policy();
    let mut ex = exchange();
    for expected_counter in 1..=10 {
        fail_connect(&mut ex);
        assert_eq!(p.decide(&mut ex), Ok(true));
        assert_eq!(ex.redelivery_counter(), Some(expected_counter));
    }
    fail_connect(&mut ex);
    assert_eq!(p.decide(&mut ex), Ok(false));
}

#[test]
fn target_recovers_then_rejects_message() {
    let p = policy();
    let mut ex = exchange();
    for _ in 0..10 {
        fail_connect(&mut ex);
        assert_eq!(p.decide(&mut ex), Ok(true));
    }

    // Target is back but rejects the payload: fresh budget for other errors.
    fail_other(&mut ex);
    let outcome = p.evaluate(&mut ex).unwrap();
    assert!(outcome.allow);
    assert!(outcome.counter_reset);
    assert_eq!(ex.redelivery_counter(), Some(1));

    fail_other(&mut ex);
    assert_eq!(p.decide(&mut ex), Ok(true));
    fail_other(&mut ex);
    assert_eq!(p.decide(&mut ex), Ok(false));
}

#[test]
fn connect_failure_after_other_failures_continues_counter() {
    let p = policy();
    let mut ex = exchange();
    fail_other(&mut ex);
    assert_eq!(p.decide(&mut ex), Ok(true));
    fail_other(&mut ex);
    assert_eq!(p.decide(&mut ex), Ok(true));

    fail_connect(&mut ex);
    let outcome = p.evaluate(&mut ex).unwrap();
    assert!(outcome.allow);
    assert!(!outcome.counter_reset);
    assert_eq!(outcome.counter, 2);
    assert_eq!(ex.redelivery_counter(), Some(3));
}

#[test]
fn cleared_exception_is_invalid_usage() {
    let p = policy();
    let mut ex = exchange();
    fail_other(&mut ex);
    p.decide(&mut ex).unwrap();
    ex.clear_exception();
    assert_eq!(p.decide(&mut ex), Err(PolicyError::InvalidUsage));
    assert_eq!(ex.redelivery_counter(), Some(1));
}

#[test]
fn shared_policy_keeps_exchanges_independent() {
    let p: std::sync::Arc<dyn RedeliveryPolicy> = std::sync::Arc::new(
        ConsumerRedeliveryPolicy::new(1, 1, Duration::ZERO),
    );
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let p = p.clone();
            std::thread::spawn(move || {
                let mut ex = exchange();
                fail_other(&mut ex);
                let first = p.decide(&mut ex).unwrap();
                fail_other(&mut ex);
                let second = p.decide(&mut ex).unwrap();
                (first, second)
            })
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), (true, false));
    }
}

proptest! {
    #[test]
    fn connect_failure_allowed_iff_below_ceiling(
        connect_max in 0u32..50,
        counter in 0u32..60,
        last_was_connect in any::<bool>(),
    ) {
        let p = ConsumerRedeliveryPolicy::new(connect_max, 2, Duration::ZERO);
        let mut ex = exchange();
        ex.set_redelivery_counter(counter);
        ex.set_last_failure_was_connect_error(last_was_connect);
        fail_connect(&mut ex);
        prop_assert_eq!(p.decide(&mut ex), Ok(counter < connect_max));
        prop_assert_eq!(ex.redelivery_counter(), Some(counter + 1));
        prop_assert_eq!(ex.last_failure_was_connect_error(), Some(true));
    }

    #[test]
    fn other_failure_after_connect_always_resets(
        other_max in 1u32..20,
        counter in 0u32..100,
    ) {
        let p = ConsumerRedeliveryPolicy::new(10, other_max, Duration::ZERO);
        let mut ex = exchange();
        ex.set_redelivery_counter(counter);
        ex.set_last_failure_was_connect_error(true);
        fail_other(&mut ex);
        prop_assert_eq!(p.decide(&mut ex), Ok(true));
        prop_assert_eq!(ex.redelivery_counter(), Some(1));
        prop_assert_eq!(ex.last_failure_was_connect_error(), Some(false));
    }

    #[test]
    fn other_failure_after_other_allowed_iff_below_ceiling(
        other_max in 0u32..20,
        counter in 0u32..30,
    ) {
        let p = ConsumerRedeliveryPolicy::new(10, other_max, Duration::ZERO);
        let mut ex = exchange();
        ex.set_redelivery_counter(counter);
        ex.set_last_failure_was_connect_error(false);
        fail_other(&mut ex);
        prop_assert_eq!(p.decide(&mut ex), Ok(counter < other_max));
        prop_assert_eq!(ex.redelivery_counter(), Some(counter + 1));
    }
}
