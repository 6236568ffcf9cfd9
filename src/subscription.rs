//! Cancellation handles with composable teardown.
//!
//! A [`Subscription`] is either open or closed. It owns an optional initial
//! teardown plus any number of finalizers added later: plain closures,
//! fallible closures, or child subscriptions. Closing runs the initial
//! teardown first, then the finalizers in reverse registration order, exactly
//! once. A failing teardown never stops the others; failures are aggregated
//! into an [`UnsubscriptionError`].

use std::fmt::{Debug, Formatter};

use smallvec::SmallVec;

use crate::{
  config::{report_unhandled_error, UnhandledError},
  error::{BoxError, UnsubscriptionError},
  rc::MutRc,
};

enum Finalizer {
  Action(Box<dyn FnOnce()>),
  Fallible(Box<dyn FnOnce() -> Result<(), BoxError>>),
  Child(Subscription),
}

impl Finalizer {
  fn run(self, errors: &mut Vec<BoxError>) {
    match self {
      Finalizer::Action(f) => f(),
      Finalizer::Fallible(f) => {
        if let Err(e) = f() {
          errors.push(e);
        }
      }
      Finalizer::Child(child) => {
        if let Err(e) = child.try_unsubscribe() {
          errors.extend(e.errors);
        }
      }
    }
  }

  fn is_closed(&self) -> bool { matches!(self, Finalizer::Child(s) if s.is_closed()) }
}

#[derive(Default)]
struct Inner {
  closed: bool,
  initial: Option<Finalizer>,
  finalizers: SmallVec<[Finalizer; 2]>,
}

/// Handle returned from every `subscribe` call.
///
/// Cloning yields another handle to the same subscription.
#[derive(Clone, Default)]
pub struct Subscription(MutRc<Inner>);

impl Subscription {
  pub fn new() -> Self { Self::default() }

  /// A subscription that is already closed, like the one returned for
  /// streams that finish during `subscribe`.
  pub fn closed() -> Self {
    Self(MutRc::own(Inner { closed: true, ..Inner::default() }))
  }

  /// Creates a subscription whose own teardown is `f`.
  pub fn with_teardown(f: impl FnOnce() + 'static) -> Self {
    Self(MutRc::own(Inner { initial: Some(Finalizer::Action(Box::new(f))), ..Inner::default() }))
  }

  #[inline]
  pub fn is_closed(&self) -> bool { self.0.rc_deref().closed }

  /// Attaches `child` so that closing `self` closes it too.
  ///
  /// If `self` is already closed the child is closed right away. Adding a
  /// subscription to itself is a no-op.
  pub fn add(&self, child: Subscription) {
    if self.0.ptr_eq(&child.0) || child.is_closed() {
      return;
    }
    self.push(Finalizer::Child(child));
  }

  pub fn add_teardown(&self, f: impl FnOnce() + 'static) {
    self.push(Finalizer::Action(Box::new(f)));
  }

  pub fn add_fallible_teardown(&self, f: impl FnOnce() -> Result<(), BoxError> + 'static) {
    self.push(Finalizer::Fallible(Box::new(f)));
  }

  /// Detaches `child` without closing it.
  pub fn remove(&self, child: &Subscription) {
    self
      .0
      .rc_deref_mut()
      .finalizers
      .retain(|f| !matches!(f, Finalizer::Child(s) if s.0.ptr_eq(&child.0)));
  }

  /// Number of finalizers still registered, excluding the initial teardown.
  pub fn teardown_size(&self) -> usize { self.0.rc_deref().finalizers.len() }

  /// Closes the subscription. Teardown failures are routed to the unhandled
  /// error hook in [`crate::config`].
  pub fn unsubscribe(&self) {
    if let Err(e) = self.try_unsubscribe() {
      report_unhandled_error(UnhandledError::Teardown(e));
    }
  }

  /// Closes the subscription and reports aggregated teardown failures.
  ///
  /// Calling this on an already closed subscription does nothing and
  /// returns `Ok(())`.
  pub fn try_unsubscribe(&self) -> Result<(), UnsubscriptionError> {
    let (initial, finalizers) = {
      let mut inner = self.0.rc_deref_mut();
      if inner.closed {
        return Ok(());
      }
      inner.closed = true;
      (inner.initial.take(), std::mem::take(&mut inner.finalizers))
    };

    let mut errors = Vec::new();
    if let Some(initial) = initial {
      initial.run(&mut errors);
    }
    for finalizer in finalizers.into_iter().rev() {
      finalizer.run(&mut errors);
    }

    if errors.is_empty() { Ok(()) } else { Err(UnsubscriptionError::new(errors)) }
  }

  /// Activates RAII behavior: the returned guard unsubscribes on drop.
  ///
  /// **Attention:** if the guard is not bound to a variable it is dropped,
  /// and the subscription closed, immediately.
  pub fn unsubscribe_when_dropped(self) -> SubscriptionGuard { SubscriptionGuard(self) }

  fn push(&self, finalizer: Finalizer) {
    let rejected = {
      let mut inner = self.0.rc_deref_mut();
      if inner.closed {
        Some(finalizer)
      } else {
        inner.finalizers.retain(|f| !f.is_closed());
        inner.finalizers.push(finalizer);
        None
      }
    };
    if let Some(finalizer) = rejected {
      let mut errors = Vec::new();
      finalizer.run(&mut errors);
      if !errors.is_empty() {
        report_unhandled_error(UnhandledError::Teardown(UnsubscriptionError::new(errors)));
      }
    }
  }
}

impl Debug for Subscription {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let inner = self.0.rc_deref();
    f.debug_struct("Subscription")
      .field("closed", &inner.closed)
      .field("teardown_count", &inner.finalizers.len())
      .finish()
  }
}

/// Unsubscribes the wrapped subscription when dropped.
#[derive(Debug)]
#[must_use]
pub struct SubscriptionGuard(Subscription);

impl SubscriptionGuard {
  pub fn new(subscription: Subscription) -> Self { Self(subscription) }

  pub fn subscription(&self) -> &Subscription { &self.0 }
}

impl Drop for SubscriptionGuard {
  #[inline]
  fn drop(&mut self) { self.0.unsubscribe() }
}
