//! Global hooks for failures that have no observer to go to.
//!
//! Two channels exist, both thread-local since the engine never crosses
//! threads:
//!
//! - **Unhandled errors**: a producer returned `Err` after its subscriber had
//!   already stopped, or a plain [`Subscription::unsubscribe`] swallowed
//!   failing teardowns. Always logged through `tracing` at `error` level, then
//!   handed to the handler installed with [`set_unhandled_error_handler`].
//! - **Stopped notifications**: a `next`/`error`/`complete` reached a
//!   subscriber that was already stopped. Logged at `trace` level and handed
//!   to the handler installed with [`set_stopped_notification_handler`].
//!
//! [`Subscription::unsubscribe`]: crate::subscription::Subscription::unsubscribe

use std::{any::Any, cell::RefCell, rc::Rc};

use crate::error::UnsubscriptionError;

#[derive(Debug)]
pub enum UnhandledError {
  /// A producer raised after its subscriber reached a terminal state or was
  /// unsubscribed.
  Producer { type_name: &'static str, error: Box<dyn Any> },
  /// Teardown failures collected by `unsubscribe()`.
  Teardown(UnsubscriptionError),
}

impl UnhandledError {
  /// Recovers the producer's error value when it has type `E`.
  pub fn downcast_producer<E: 'static>(&self) -> Option<&E> {
    match self {
      UnhandledError::Producer { error, .. } => error.downcast_ref::<E>(),
      UnhandledError::Teardown(_) => None,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoppedNotification {
  Next,
  Error,
  Complete,
}

type UnhandledErrorHandler = Rc<dyn Fn(&UnhandledError)>;
type StoppedNotificationHandler = Rc<dyn Fn(StoppedNotification)>;

#[derive(Default)]
struct Config {
  on_unhandled_error: Option<UnhandledErrorHandler>,
  on_stopped_notification: Option<StoppedNotificationHandler>,
}

thread_local! {
  static CONFIG: RefCell<Config> = RefCell::new(Config::default());
}

/// Installs the catch-all handler for errors no observer can receive.
pub fn set_unhandled_error_handler(handler: impl Fn(&UnhandledError) + 'static) {
  CONFIG.with(|c| c.borrow_mut().on_unhandled_error = Some(Rc::new(handler)));
}

/// Installs the handler for notifications dropped by stopped subscribers.
pub fn set_stopped_notification_handler(handler: impl Fn(StoppedNotification) + 'static) {
  CONFIG.with(|c| c.borrow_mut().on_stopped_notification = Some(Rc::new(handler)));
}

/// Removes both handlers on the current thread.
pub fn reset() { CONFIG.with(|c| *c.borrow_mut() = Config::default()); }

pub(crate) fn report_unhandled_error(err: UnhandledError) {
  match &err {
    UnhandledError::Producer { type_name, .. } => {
      tracing::error!(error_type = *type_name, "producer raised after its subscriber stopped");
    }
    UnhandledError::Teardown(e) => {
      tracing::error!(error = %e, "teardown failed during unsubscribe");
    }
  }
  // Clone the handler out so it may itself touch the config.
  let handler = CONFIG.with(|c| c.borrow().on_unhandled_error.clone());
  if let Some(handler) = handler {
    handler(&err);
  }
}

pub(crate) fn report_stopped_notification(kind: StoppedNotification) {
  tracing::trace!(?kind, "notification dropped by a stopped subscriber");
  let handler = CONFIG.with(|c| c.borrow().on_stopped_notification.clone());
  if let Some(handler) = handler {
    handler(kind);
  }
}
