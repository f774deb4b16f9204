//! `redeliver simulate` – replay a failure sequence against the policy.

use anyhow::Result;
use clap::ValueEnum;
use redeliver_core::config::RedeliverConfig;
use redeliver_core::retry::{
    ConnectError, ConsumerRedeliveryPolicy, Exchange, RedeliveryOutcome, TRANSACTION_ID_HEADER,
};
use std::io;

/// Kind of failure to inject for one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FailureKind {
    /// Target endpoint unreachable.
    Connect,
    /// Any other failure.
    Other,
}

/// Overrides on top of the loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct SimulateArgs {
    pub connect_max: Option<u32>,
    pub other_max: Option<u32>,
    pub transaction_id: Option<String>,
}

pub fn run_simulate(cfg: &RedeliverConfig, kinds: &[FailureKind], args: &SimulateArgs) -> Result<()> {
    let mut redelivery = cfg.redelivery;
    if let Some(n) = args.connect_max {
        redelivery.connect_error_max_retries = n;
    }
    if let Some(n) = args.other_max {
        redelivery.other_error_max_retries = n;
    }
    let policy = ConsumerRedeliveryPolicy::from_config(&redelivery);

    let mut exchange = Exchange::new(cfg.context_name.clone(), Some("simulate".to_string()));
    if let Some(tx) = &args.transaction_id {
        exchange = exchange.with_header(TRANSACTION_ID_HEADER, tx.clone());
    }

    let outcomes = simulate(&policy, &mut exchange, kinds)?;

    println!(
        "{:<8} {:<8} {:<8} {:<6} {}",
        "ATTEMPT", "KIND", "COUNTER", "RESET", "DECISION"
    );
    for (i, (kind, outcome)) in kinds.iter().zip(&outcomes).enumerate() {
        println!(
            "{:<8} {:<8} {:<8} {:<6} {}",
            i + 1,
            format!("{:?}", kind).to_lowercase(),
            outcome.counter,
            if outcome.counter_reset { "yes" } else { "no" },
            if outcome.allow { "redeliver" } else { "exhausted" }
        );
    }
    if outcomes.len() < kinds.len() {
        println!(
            "stopped after {} of {} failures; remaining not evaluated",
            outcomes.len(),
            kinds.len()
        );
    }
    Ok(())
}

/// Evaluate `kinds` in order on one exchange, stopping at the first terminal decision.
pub fn simulate(
    policy: &ConsumerRedeliveryPolicy,
    exchange: &mut Exchange,
    kinds: &[FailureKind],
) -> Result<Vec<RedeliveryOutcome>> {
    let mut outcomes = Vec::with_capacity(kinds.len());
    for kind in kinds {
        match kind {
            FailureKind::Connect => exchange.set_exception(ConnectError::new("simulated-target")),
            FailureKind::Other => {
                exchange.set_exception(io::Error::new(io::ErrorKind::Other, "simulated failure"))
            }
        }
        let outcome = policy.evaluate(exchange)?;
        outcomes.push(outcome);
        if !outcome.allow {
            break;
        }
    }
    Ok(outcomes)
}
