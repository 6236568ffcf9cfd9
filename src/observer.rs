//! The receiving end of a stream.
//!
//! Anything that wants notifications implements [`Observer`]. Closures are
//! adapted with [`FnMutObserver`] (values only) or assembled into a [`Sink`]
//! when errors or completion matter too.

// ============================================================================
// Observer Trait
// ============================================================================

/// Consumer of `next`, `error` and `complete` notifications.
///
/// After `error` or `complete` no further call reaches the observer.
pub trait Observer<Item, Err> {
  fn next(&mut self, value: Item);

  /// Terminal. The stream failed with `err`.
  fn error(&mut self, err: Err);

  /// Terminal. The stream ended normally.
  fn complete(&mut self);
}

/// Boxed observer, the form in which subscribers store their destination.
pub type BoxedObserver<Item, Err> = Box<dyn Observer<Item, Err>>;

impl<Item, Err> Observer<Item, Err> for Box<dyn Observer<Item, Err>> {
  #[inline]
  fn next(&mut self, value: Item) { (**self).next(value) }

  #[inline]
  fn error(&mut self, err: Err) { (**self).error(err) }

  #[inline]
  fn complete(&mut self) { (**self).complete() }
}

// ============================================================================
// FnMutObserver - Closure adapter
// ============================================================================

/// Closure adapter used by `subscribe(|v| ...)`.
///
/// The closure becomes the `next` handler; errors and completion are
/// dropped silently.
#[derive(Clone)]
pub struct FnMutObserver<F>(pub F);

impl<F, Item, Err> Observer<Item, Err> for FnMutObserver<F>
where
  F: FnMut(Item),
{
  #[inline]
  fn next(&mut self, v: Item) { (self.0)(v); }

  #[inline]
  fn error(&mut self, _err: Err) {}

  #[inline]
  fn complete(&mut self) {}
}

// ============================================================================
// Sink - normalized callback record
// ============================================================================

/// A set of optional callbacks; omitted callbacks are no-ops.
///
/// ```rust
/// use rxstream::prelude::*;
///
/// let sink = Sink::<i32, String>::new()
///   .on_next(|v| println!("{v}"))
///   .on_complete(|| println!("done"));
/// Observable::from_iter(vec![1, 2]).subscribe_with(sink);
/// ```
pub struct Sink<Item, Err> {
  next: Option<Box<dyn FnMut(Item)>>,
  error: Option<Box<dyn FnOnce(Err)>>,
  complete: Option<Box<dyn FnOnce()>>,
}

impl<Item, Err> Sink<Item, Err> {
  pub fn new() -> Self { Self { next: None, error: None, complete: None } }

  pub fn on_next(mut self, f: impl FnMut(Item) + 'static) -> Self {
    self.next = Some(Box::new(f));
    self
  }

  pub fn on_error(mut self, f: impl FnOnce(Err) + 'static) -> Self {
    self.error = Some(Box::new(f));
    self
  }

  pub fn on_complete(mut self, f: impl FnOnce() + 'static) -> Self {
    self.complete = Some(Box::new(f));
    self
  }
}

impl<Item, Err> Default for Sink<Item, Err> {
  fn default() -> Self { Self::new() }
}

impl<Item, Err> Observer<Item, Err> for Sink<Item, Err> {
  fn next(&mut self, value: Item) {
    if let Some(next) = self.next.as_mut() {
      next(value);
    }
  }

  fn error(&mut self, err: Err) {
    if let Some(error) = self.error.take() {
      error(err);
    }
  }

  fn complete(&mut self) {
    if let Some(complete) = self.complete.take() {
      complete();
    }
  }
}

// ============================================================================
// Notification
// ============================================================================

/// A reified observer call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification<Item, Err> {
  Next(Item),
  Error(Err),
  Complete,
}

impl<Item, Err> Notification<Item, Err> {
  #[inline]
  pub fn is_terminal(&self) -> bool { !matches!(self, Notification::Next(_)) }

  /// Replays the notification onto `observer`.
  pub fn accept<O: Observer<Item, Err> + ?Sized>(self, observer: &mut O) {
    match self {
      Notification::Next(v) => observer.next(v),
      Notification::Error(e) => observer.error(e),
      Notification::Complete => observer.complete(),
    }
  }
}

// ============================================================================
// Tests
// ============================================================================
