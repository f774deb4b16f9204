//! Per-message exchange record handed to the policy by the host.

use std::borrow::Cow;
use std::collections::HashMap;
use std::error::Error;

use crate::id::UuidProducer;

/// Header carrying the business transaction id, used only for log correlation.
pub const TRANSACTION_ID_HEADER: &str = "apbaTransactionId";

type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Mutable record for one message as it moves through delivery attempts.
///
/// The host owns the exchange and passes it by `&mut` to the policy on every
/// failed attempt; the policy's bookkeeping (`redelivery_counter`,
/// `last_failure_was_connect_error`) is stored here rather than in the policy.
#[derive(Debug, Default)]
pub struct Exchange {
    context_name: String,
    route_id: Option<String>,
    exchange_id: String,
    headers: HashMap<String, String>,
    exception: Option<BoxError>,
    exception_name: Option<Cow<'static, str>>,
    redelivery_counter: Option<u32>,
    last_failure_was_connect_error: Option<bool>,
}

impl Exchange {
    /// Create an exchange with a freshly generated exchange id.
    pub fn new(context_name: impl Into<String>, route_id: Option<String>) -> Self {
        Self {
            context_name: context_name.into(),
            route_id,
            exchange_id: UuidProducer.produce(),
            ..Self::default()
        }
    }

    pub fn with_exchange_id(mut self, exchange_id: impl Into<String>) -> Self {
        self.exchange_id = exchange_id.into();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn context_name(&self) -> &str {
        &self.context_name
    }

    pub fn route_id(&self) -> Option<&str> {
        self.route_id.as_deref()
    }

    pub fn exchange_id(&self) -> &str {
        &self.exchange_id
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn transaction_id(&self) -> Option<&str> {
        self.header(TRANSACTION_ID_HEADER)
    }

    /// Record the failure of the current attempt. The concrete type name of
    /// `E` is kept for diagnostics.
    pub fn set_exception<E>(&mut self, error: E)
    where
        E: Error + Send + Sync + 'static,
    {
        self.exception_name = Some(Cow::Borrowed(std::any::type_name::<E>()));
        self.exception = Some(Box::new(error));
    }

    /// Record an already type-erased failure under an explicit diagnostic name.
    pub fn set_boxed_exception(&mut self, error: BoxError, name: impl Into<Cow<'static, str>>) {
        self.exception_name = Some(name.into());
        self.exception = Some(error);
    }

    pub fn exception(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        self.exception.as_deref()
    }

    pub fn exception_name(&self) -> Option<&str> {
        self.exception_name.as_deref()
    }

    pub fn take_exception(&mut self) -> Option<BoxError> {
        self.exception_name = None;
        self.exception.take()
    }

    pub fn clear_exception(&mut self) {
        self.take_exception();
    }

    pub fn redelivery_counter(&self) -> Option<u32> {
        self.redelivery_counter
    }

    pub fn set_redelivery_counter(&mut self, counter: u32) {
        self.redelivery_counter = Some(counter);
    }

    pub fn last_failure_was_connect_error(&self) -> Option<bool> {
        self.last_failure_was_connect_error
    }

    pub fn set_last_failure_was_connect_error(&mut self, value: bool) {
        self.last_failure_was_connect_error = Some(value);
    }
}
