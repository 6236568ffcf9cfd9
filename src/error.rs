//! Errors owned by the engine itself.
//!
//! Stream errors are user-typed (the `Err` parameter of every observable);
//! the types here only cover failures the engine detects on its own.

use thiserror::Error;

/// Error type accepted from fallible teardown logic.
pub type BoxError = Box<dyn std::error::Error + 'static>;

/// Raised when one or more teardowns fail while a subscription closes.
///
/// Every teardown still runs. Failures are collected in the order the
/// teardowns ran, with failures of child subscriptions flattened in.
#[derive(Debug, Error)]
#[error("{} error(s) occurred during unsubscription", .errors.len())]
pub struct UnsubscriptionError {
  pub errors: Vec<BoxError>,
}

impl UnsubscriptionError {
  pub fn new(errors: Vec<BoxError>) -> Self { Self { errors } }
}
