use std::time::{Duration, Instant};

use super::{
  timer_queue::{TimerQueue, TimerTask},
  Scheduler, TimerHandle, MIN_INTERVAL,
};

/// Wall-clock scheduler driven by the caller's thread.
///
/// Registering a timer never blocks. Nothing fires until the owner calls
/// [`run_until_idle`](Self::run_until_idle) or [`run_for`](Self::run_for),
/// which sleep until the next deadline and run due callbacks in order.
#[derive(Clone)]
pub struct RealTimeScheduler {
  origin: Instant,
  queue: TimerQueue,
}

impl Default for RealTimeScheduler {
  fn default() -> Self { Self::new() }
}

impl RealTimeScheduler {
  pub fn new() -> Self { Self { origin: Instant::now(), queue: TimerQueue::default() } }

  /// Runs timers until none is left.
  pub fn run_until_idle(&self) {
    while let Some(deadline) = self.queue.next_deadline() {
      self.sleep_until(deadline);
      self.queue.run_until(self.now(), |_| {});
    }
  }

  /// Runs timers for `duration`, returning early if none is left.
  pub fn run_for(&self, duration: Duration) {
    let end = self.now() + duration;
    while let Some(deadline) = self.queue.next_deadline() {
      if deadline > end {
        self.sleep_until(end);
        return;
      }
      self.sleep_until(deadline);
      self.queue.run_until(self.now().min(end), |_| {});
    }
  }

  pub fn pending_timers(&self) -> usize { self.queue.len() }

  fn sleep_until(&self, deadline: Duration) {
    let now = self.now();
    if deadline > now {
      std::thread::sleep(deadline - now);
    }
  }
}

impl Scheduler for RealTimeScheduler {
  fn now(&self) -> Duration { self.origin.elapsed() }

  fn set_timeout(&self, task: Box<dyn FnOnce()>, delay: Duration) -> TimerHandle {
    self.queue.schedule(self.now() + delay, TimerTask::Once(task))
  }

  fn set_interval(&self, task: Box<dyn FnMut()>, period: Duration) -> TimerHandle {
    let period = period.max(MIN_INTERVAL);
    self.queue.schedule(self.now() + period, TimerTask::Repeat { period, task })
  }

  fn clear_timer(&self, handle: TimerHandle) { self.queue.cancel(handle) }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use super::*;

  #[rxstream_macro::test]
  fn runs_due_timers_in_order() {
    let scheduler = RealTimeScheduler::new();
    let log = Rc::new(RefCell::new(vec![]));
    for (name, ms) in [("late", 6), ("early", 2)] {
      let l = log.clone();
      scheduler.set_timeout(Box::new(move || l.borrow_mut().push(name)), Duration::from_millis(ms));
    }
    scheduler.run_until_idle();
    assert_eq!(*log.borrow(), vec!["early", "late"]);
    assert_eq!(scheduler.pending_timers(), 0);
  }
}
