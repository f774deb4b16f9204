//! Classify failures as connectivity-caused by walking the error source chain.

use std::error::Error;
use std::io;

use super::error::ConnectError;

/// Whether this single error (not its causes) is a connectivity failure.
pub fn is_connect_error(error: &(dyn Error + 'static)) -> bool {
    if error.is::<ConnectError>() {
        return true;
    }
    if let Some(io_error) = error.downcast_ref::<io::Error>() {
        return io_error.kind() == io::ErrorKind::ConnectionRefused;
    }
    false
}

/// Whether `error` or anything in its cause chain is a connectivity failure.
pub fn is_caused_by_connect_error(error: &(dyn Error + 'static)) -> bool {
    let mut current = Some(error);
    while let Some(e) = current {
        if is_connect_error(e) {
            return true;
        }
        current = next_cause(e);
    }
    false
}

fn next_cause<'a>(error: &'a (dyn Error + 'static)) -> Option<&'a (dyn Error + 'static)> {
    // `io::Error::source` skips the wrapped error and returns *its* source, so
    // look at the wrapped error itself first.
    if let Some(io_error) = error.downcast_ref::<io::Error>() {
        if let Some(inner) = io_error.get_ref() {
            return Some(inner);
        }
    }
    error.source()
}
