//! Reference redelivery loop: run an attempt until it succeeds or the policy
//! says stop, the way a host drives the policy.

use std::error::Error;

use super::exchange::Exchange;
use super::policy::RedeliveryPolicy;

type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Runs `attempt` against `exchange` until it succeeds or `policy` refuses a
/// redelivery. Sleeps for the policy's retry delay between attempts.
///
/// On a terminal decision the last failure is returned and the exchange keeps
/// its bookkeeping so the caller can inspect it.
pub fn run_with_redelivery<P, T, E, F>(
    policy: &P,
    exchange: &mut Exchange,
    mut attempt: F,
) -> Result<T, BoxError>
where
    P: RedeliveryPolicy + ?Sized,
    E: Error + Send + Sync + 'static,
    F: FnMut(&Exchange) -> Result<T, E>,
{
    loop {
        match attempt(exchange) {
            Ok(value) => {
                exchange.clear_exception();
                return Ok(value);
            }
            Err(e) => {
                exchange.set_exception(e);
                if !policy.decide(exchange)? {
                    tracing::debug!(
                        exchange_id = exchange.exchange_id(),
                        "redeliveries exhausted"
                    );
                    return Err(exchange
                        .take_exception()
                        .unwrap_or_else(|| "attempt failed".into()));
                }
                std::thread::sleep(policy.retry_delay());
            }
        }
    }
}
