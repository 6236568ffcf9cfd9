//! The clock abstraction time-based producers depend on.
//!
//! The engine never owns a thread or an event loop. Producers that model
//! asynchronous sources (`interval`, `timer`, replay windows) register
//! callbacks with an injected [`Scheduler`] and return a teardown that
//! clears them. Two implementations ship with the crate:
//!
//! - [`TestScheduler`]: virtual time that only moves when told to, for
//!   deterministic tests.
//! - [`RealTimeScheduler`]: wall-clock time; the caller drives due timers on
//!   its own thread with `run_until_idle` / `run_for`.

use std::time::Duration;

mod real_time;
mod test_scheduler;
mod timer_queue;

pub use real_time::RealTimeScheduler;
pub use test_scheduler::TestScheduler;

/// Shortest interval period. Zero periods are raised to this so that a
/// repeating timer is due strictly after the run that fired it.
pub(crate) const MIN_INTERVAL: Duration = Duration::from_nanos(1);

/// Token identifying a registered timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub(crate) u64);

/// Clock and timer registration.
///
/// Time is expressed as the [`Duration`] elapsed since the scheduler's
/// origin. Callbacks run synchronously on the thread that drives the
/// scheduler. Timers due at the same instant run in registration order.
pub trait Scheduler {
  fn now(&self) -> Duration;

  /// Runs `task` once, `delay` from now.
  fn set_timeout(&self, task: Box<dyn FnOnce()>, delay: Duration) -> TimerHandle;

  /// Runs `task` every `period`, first at `now + period`. A zero `period`
  /// is treated as one nanosecond.
  fn set_interval(&self, task: Box<dyn FnMut()>, period: Duration) -> TimerHandle;

  /// Cancels a timer. Unknown or already fired handles are ignored; clearing
  /// an interval from inside its own callback stops it.
  fn clear_timer(&self, handle: TimerHandle);
}
