use std::{collections::VecDeque, convert::Infallible, rc::Rc, time::Duration};

use super::Subject;
use crate::{observable::Observable, rc::MutRc, scheduler::Scheduler};

struct Window {
  length: Duration,
  clock: Rc<dyn Scheduler>,
}

/// Subject that records pushed values and replays them to new subscribers.
///
/// The buffer keeps at most `buffer_size` values and, when a window is set,
/// only values younger than the window. The count limit is applied first,
/// then the age limit. A value pushed at `t` expires once `t + window <= now`.
/// Stopped subjects still replay their buffer before the terminal
/// notification.
pub struct ReplaySubject<Item, Err = Infallible> {
  subject: Subject<Item, Err>,
  buffer: MutRc<VecDeque<(Item, Duration)>>,
  buffer_size: usize,
  window: Option<Rc<Window>>,
}

impl<Item, Err> Clone for ReplaySubject<Item, Err> {
  fn clone(&self) -> Self {
    Self {
      subject: self.subject.clone(),
      buffer: self.buffer.clone(),
      buffer_size: self.buffer_size,
      window: self.window.clone(),
    }
  }
}

impl<Item: Clone + 'static, Err: Clone + 'static> ReplaySubject<Item, Err> {
  /// Replays up to `buffer_size` most recent values. A size of zero is
  /// raised to one.
  pub fn new(buffer_size: usize) -> Self {
    Self {
      subject: Subject::new(),
      buffer: MutRc::own(VecDeque::new()),
      buffer_size: buffer_size.max(1),
      window: None,
    }
  }

  /// Replays every value ever pushed.
  pub fn unbounded() -> Self { Self::new(usize::MAX) }

  /// Replays up to `buffer_size` values pushed within the last `window`,
  /// as measured by `scheduler`.
  pub fn with_window(buffer_size: usize, window: Duration, scheduler: impl Scheduler + 'static) -> Self {
    Self {
      window: Some(Rc::new(Window { length: window, clock: Rc::new(scheduler) })),
      ..Self::new(buffer_size)
    }
  }

  pub fn next(&self, value: Item) {
    if self.subject.is_stopped() {
      return;
    }
    let stamp = self.window.as_ref().map_or(Duration::ZERO, |w| w.clock.now());
    self.buffer.rc_deref_mut().push_back((value.clone(), stamp));
    self.trim();
    self.subject.next(value);
  }

  #[inline]
  pub fn error(&self, err: Err) { self.subject.error(err) }

  #[inline]
  pub fn complete(&self) { self.subject.complete() }

  pub fn observer_count(&self) -> usize { self.subject.observer_count() }

  pub fn is_stopped(&self) -> bool { self.subject.is_stopped() }

  pub fn as_observable(&self) -> Observable<Item, Err> {
    let replay = self.clone();
    Observable::create(move |subscriber| {
      replay.trim();
      let terminal = replay.subject.register(&subscriber);
      let values: Vec<Item> = replay.buffer.rc_deref().iter().map(|(v, _)| v.clone()).collect();
      for value in values {
        if subscriber.is_closed() {
          return Ok(());
        }
        subscriber.next(value);
      }
      if let Some(terminal) = terminal {
        terminal.deliver(&subscriber);
      }
      Ok(())
    })
  }

  fn trim(&self) {
    let expired = {
      let mut buffer = self.buffer.rc_deref_mut();
      let mut expired = Vec::new();
      while buffer.len() > self.buffer_size {
        expired.extend(buffer.pop_front());
      }
      if let Some(window) = &self.window {
        let now = window.clock.now();
        while buffer.front().map_or(false, |(_, at)| *at + window.length <= now) {
          expired.extend(buffer.pop_front());
        }
      }
      expired
    };
    drop(expired);
  }
}

impl_subject_surface!(ReplaySubject);

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::prelude::*;

  fn collect(subject: &ReplaySubject<i32>) -> Rc<RefCell<Vec<i32>>> {
    let hit = Rc::new(RefCell::new(vec![]));
    let c_hit = hit.clone();
    subject.subscribe(move |v| c_hit.borrow_mut().push(v));
    hit
  }

  #[rxstream_macro::test]
  fn replays_last_n_values() {
    let subject = ReplaySubject::new(2);
    subject.next(1);
    subject.next(2);
    subject.next(3);

    let late = collect(&subject);
    subject.next(4);
    assert_eq!(*late.borrow(), vec![2, 3, 4]);
  }

  #[rxstream_macro::test]
  fn unbounded_keeps_everything() {
    let subject = ReplaySubject::unbounded();
    for i in 0..5 {
      subject.next(i);
    }
    assert_eq!(*collect(&subject).borrow(), vec![0, 1, 2, 3, 4]);
  }

  #[rxstream_macro::test]
  fn window_drops_old_values() {
    let scheduler = TestScheduler::new();
    let subject = ReplaySubject::with_window(10, Duration::from_millis(500), scheduler.clone());

    subject.next(1);
    scheduler.advance_by(Duration::from_millis(200));
    subject.next(2);
    scheduler.advance_by(Duration::from_millis(200));
    subject.next(3);
    scheduler.advance_by(Duration::from_millis(100));

    // 1 was pushed at 0ms and expires exactly at 500ms.
    assert_eq!(*collect(&subject).borrow(), vec![2, 3]);
    scheduler.advance_by(Duration::from_millis(500));
    assert!(collect(&subject).borrow().is_empty());
  }

  #[rxstream_macro::test]
  fn count_limit_applies_before_age() {
    let scheduler = TestScheduler::new();
    let subject = ReplaySubject::with_window(2, Duration::from_secs(1), scheduler.clone());
    for i in 1..=4 {
      subject.next(i);
      scheduler.advance_by(Duration::from_millis(300));
    }
    // Count keeps 3 and 4; 3 was pushed at 600ms and is still young.
    assert_eq!(*collect(&subject).borrow(), vec![3, 4]);
  }

  #[rxstream_macro::test]
  fn stopped_subject_replays_then_terminates() {
    let subject = ReplaySubject::<i32>::new(3);
    subject.next(1);
    subject.next(2);
    subject.complete();
    subject.next(3);

    let log = Rc::new(RefCell::new(vec![]));
    let (l1, l2) = (log.clone(), log.clone());
    subject.subscribe_complete(
      move |v| l1.borrow_mut().push(v.to_string()),
      move || l2.borrow_mut().push("complete".to_string()),
    );
    assert_eq!(*log.borrow(), vec!["1", "2", "complete"]);
  }

  #[rxstream_macro::test]
  fn zero_size_keeps_latest_value() {
    let subject = ReplaySubject::<i32>::new(0);
    subject.next(1);
    subject.next(2);
    assert_eq!(*collect(&subject).borrow(), vec![2]);
  }
}
