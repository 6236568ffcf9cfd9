use std::{cell::Cell, rc::Rc, time::Duration};

use crate::{observable::Observable, scheduler::Scheduler};

impl<Err: 'static> Observable<usize, Err> {
  /// Emits `0` after `delay`, then completes.
  pub fn timer<S>(delay: Duration, scheduler: S) -> Self
  where
    S: Scheduler + Clone + 'static,
  {
    Self::create(move |subscriber| {
      let emitter = subscriber.clone();
      let handle = scheduler.set_timeout(
        Box::new(move || {
          emitter.next(0);
          emitter.complete();
        }),
        delay,
      );
      let scheduler = scheduler.clone();
      subscriber.add_teardown(move || scheduler.clear_timer(handle));
      Ok(())
    })
  }

  /// Emits `0` after `delay`, then `1, 2, ...` every `period`. Never
  /// completes.
  pub fn timer_with_period<S>(delay: Duration, period: Duration, scheduler: S) -> Self
  where
    S: Scheduler + Clone + 'static,
  {
    Self::create(move |subscriber| {
      // The timeout hands over to an interval; teardown clears whichever is
      // current.
      let current = Rc::new(Cell::new(None));
      let emitter = subscriber.clone();
      let (c_current, c_scheduler) = (current.clone(), scheduler.clone());
      let first = scheduler.set_timeout(
        Box::new(move || {
          emitter.next(0);
          if emitter.is_closed() {
            return;
          }
          let mut seq = 1;
          let ticker = emitter.clone();
          let handle = c_scheduler.set_interval(
            Box::new(move || {
              ticker.next(seq);
              seq += 1;
            }),
            period,
          );
          c_current.set(Some(handle));
        }),
        delay,
      );
      current.set(Some(first));

      let scheduler = scheduler.clone();
      subscriber.add_teardown(move || {
        if let Some(handle) = current.get() {
          scheduler.clear_timer(handle);
        }
      });
      Ok(())
    })
  }
}
