//! Test Scheduler for deterministic testing of time-based operators.
//!
//! Provides virtual time that only advances when explicitly instructed,
//! enabling deterministic testing of `interval`, `timer`, replay windows and
//! every combinator built on top of them.
//!
//! # Usage
//!
//! ```rust
//! use std::time::Duration;
//!
//! use rxstream::prelude::*;
//!
//! let scheduler = TestScheduler::new();
//! let ticks = std::rc::Rc::new(std::cell::RefCell::new(vec![]));
//! let c_ticks = ticks.clone();
//!
//! Observable::<usize>::interval(Duration::from_millis(100), scheduler.clone())
//!   .take(3)
//!   .subscribe(move |v| c_ticks.borrow_mut().push(v));
//!
//! // Advance virtual time to trigger the emissions
//! scheduler.advance_by(Duration::from_millis(250));
//! assert_eq!(*ticks.borrow(), vec![0, 1]);
//! ```
//!
//! Every clone of a `TestScheduler` shares the same clock and timer queue;
//! separate `TestScheduler::new()` calls are fully independent.

use std::{cell::Cell, rc::Rc, time::Duration};

use super::{
  timer_queue::{TimerQueue, TimerTask},
  Scheduler, TimerHandle, MIN_INTERVAL,
};

/// A virtual time scheduler for deterministic testing.
#[derive(Clone, Default)]
pub struct TestScheduler {
  now: Rc<Cell<Duration>>,
  queue: TimerQueue,
}

impl TestScheduler {
  pub fn new() -> Self { Self::default() }

  /// Moves virtual time forward by `duration`, running every timer that
  /// becomes due on the way.
  pub fn advance_by(&self, duration: Duration) { self.advance_to(self.now.get() + duration); }

  /// Moves virtual time to `time`. Moving backwards is ignored.
  pub fn advance_to(&self, time: Duration) {
    let now = self.now.clone();
    let ran = self.queue.run_until(time, |at| now.set(at.max(now.get())));
    if time > self.now.get() {
      self.now.set(time);
    }
    tracing::trace!(?time, ran, "test scheduler advanced");
  }

  /// Number of live timers.
  pub fn pending_timers(&self) -> usize { self.queue.len() }

  pub fn is_idle(&self) -> bool { self.pending_timers() == 0 }
}

impl Scheduler for TestScheduler {
  fn now(&self) -> Duration { self.now.get() }

  fn set_timeout(&self, task: Box<dyn FnOnce()>, delay: Duration) -> TimerHandle {
    self.queue.schedule(self.now.get() + delay, TimerTask::Once(task))
  }

  fn set_interval(&self, task: Box<dyn FnMut()>, period: Duration) -> TimerHandle {
    let period = period.max(MIN_INTERVAL);
    self.queue.schedule(self.now.get() + period, TimerTask::Repeat { period, task })
  }

  fn clear_timer(&self, handle: TimerHandle) { self.queue.cancel(handle) }
}
