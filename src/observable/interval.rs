use std::time::Duration;

use crate::{observable::Observable, scheduler::Scheduler};

impl<Err: 'static> Observable<usize, Err> {
  /// Emits `0, 1, 2, ...` every `period`, the first value one period after
  /// subscribing. Never completes; unsubscribing clears the timer.
  pub fn interval<S>(period: Duration, scheduler: S) -> Self
  where
    S: Scheduler + Clone + 'static,
  {
    Self::create(move |subscriber| {
      let emitter = subscriber.clone();
      let mut seq = 0;
      let handle = scheduler.set_interval(
        Box::new(move || {
          emitter.next(seq);
          seq += 1;
        }),
        period,
      );
      let scheduler = scheduler.clone();
      subscriber.add_teardown(move || scheduler.clear_timer(handle));
      Ok(())
    })
  }
}
