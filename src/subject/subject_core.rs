use std::convert::Infallible;

use super::subscribers::Subscribers;
use crate::{observable::Observable, rc::MutRc, subscriber::Subscriber};

/// Stored terminal notification of a stopped subject.
#[derive(Clone)]
pub(crate) enum Terminal<Err> {
  Error(Err),
  Complete,
}

impl<Err> Terminal<Err> {
  pub(crate) fn deliver<Item>(self, subscriber: &Subscriber<Item, Err>) {
    match self {
      Terminal::Error(err) => subscriber.error(err),
      Terminal::Complete => subscriber.complete(),
    }
  }
}

struct SubjectState<Item, Err> {
  observers: Subscribers<Item, Err>,
  terminal: Option<Terminal<Err>>,
}

/// Hot multicast subject without replay.
///
/// Cloning yields another handle to the same subject.
///
/// ```rust
/// use rxstream::prelude::*;
///
/// let subject = Subject::<i32>::new();
/// subject.subscribe(|v| println!("A: {v}"));
/// subject.next(1);
/// subject.subscribe(|v| println!("B: {v}"));
/// subject.next(2);
/// ```
pub struct Subject<Item, Err = Infallible> {
  state: MutRc<SubjectState<Item, Err>>,
}

impl<Item, Err> Clone for Subject<Item, Err> {
  fn clone(&self) -> Self { Self { state: self.state.clone() } }
}

impl<Item, Err> Default for Subject<Item, Err> {
  fn default() -> Self {
    Self { state: MutRc::own(SubjectState { observers: Subscribers::default(), terminal: None }) }
  }
}

impl<Item: Clone + 'static, Err: Clone + 'static> Subject<Item, Err> {
  pub fn new() -> Self { Self::default() }

  /// Broadcasts `value` to every current observer. Ignored once stopped.
  pub fn next(&self, value: Item) {
    let targets = {
      let state = self.state.rc_deref();
      if state.terminal.is_some() {
        return;
      }
      state.observers.snapshot()
    };

    let mut iter = targets.into_iter().peekable();
    while let Some(subscriber) = iter.next() {
      if subscriber.is_closed() {
        continue;
      }
      if iter.peek().is_some() {
        subscriber.next(value.clone());
      } else {
        subscriber.next(value);
        break;
      }
    }
  }

  pub fn error(&self, err: Err) {
    let Some(targets) = self.stop(Terminal::Error(err.clone())) else { return };
    tracing::debug!(observers = targets.len(), "subject errored");
    for subscriber in targets {
      subscriber.error(err.clone());
    }
  }

  pub fn complete(&self) {
    let Some(targets) = self.stop(Terminal::Complete) else { return };
    tracing::debug!(observers = targets.len(), "subject completed");
    for subscriber in targets {
      subscriber.complete();
    }
  }

  /// Number of observers currently subscribed.
  pub fn observer_count(&self) -> usize { self.state.rc_deref().observers.len() }

  /// Whether `error` or `complete` has been called.
  pub fn is_stopped(&self) -> bool { self.state.rc_deref().terminal.is_some() }

  /// Observable view of this subject, hiding the observer side.
  pub fn as_observable(&self) -> Observable<Item, Err> {
    let subject = self.clone();
    Observable::create(move |subscriber| {
      if let Some(terminal) = subject.register(&subscriber) {
        terminal.deliver(&subscriber);
      }
      Ok(())
    })
  }

  /// Adds `subscriber` to the observer list, or returns the stored terminal
  /// notification if the subject has stopped. The entry is removed when the
  /// subscriber closes.
  pub(crate) fn register(&self, subscriber: &Subscriber<Item, Err>) -> Option<Terminal<Err>> {
    let id = {
      let mut state = self.state.rc_deref_mut();
      if let Some(terminal) = &state.terminal {
        return Some(terminal.clone());
      }
      state.observers.add(subscriber.clone())
    };

    let weak = self.state.downgrade();
    subscriber.add_teardown(move || {
      if let Some(state) = weak.upgrade() {
        let removed = state.rc_deref_mut().observers.remove(id);
        drop(removed);
      }
    });
    None
  }

  fn stop(&self, terminal: Terminal<Err>) -> Option<Vec<Subscriber<Item, Err>>> {
    let mut state = self.state.rc_deref_mut();
    if state.terminal.is_some() {
      return None;
    }
    state.terminal = Some(terminal);
    Some(state.observers.take_all())
  }
}

impl_subject_surface!(Subject);

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::prelude::*;

  #[rxstream_macro::test]
  fn late_subscriber_only_sees_later_values() {
    let subject = Subject::<i32>::new();
    let a = Rc::new(RefCell::new(vec![]));
    let b = Rc::new(RefCell::new(vec![]));

    let c_a = a.clone();
    subject.subscribe(move |v| c_a.borrow_mut().push(v));
    subject.next(1);
    let c_b = b.clone();
    subject.subscribe(move |v| c_b.borrow_mut().push(v));
    subject.next(2);

    assert_eq!(*a.borrow(), vec![1, 2]);
    assert_eq!(*b.borrow(), vec![2]);
    assert_eq!(subject.observer_count(), 2);
  }

  #[rxstream_macro::test]
  fn unsubscribe_removes_observer() {
    let subject = Subject::<i32>::new();
    let hit = Rc::new(RefCell::new(0));
    let c_hit = hit.clone();
    let subscription = subject.subscribe(move |v| *c_hit.borrow_mut() = v);
    subscription.unsubscribe();
    subject.next(100);

    assert_eq!(*hit.borrow(), 0);
    assert_eq!(subject.observer_count(), 0);
  }

  #[rxstream_macro::test]
  fn terminal_is_replayed_to_late_subscribers() {
    let subject = Subject::<i32, &'static str>::new();
    subject.error("boom");
    subject.next(1);

    let log = Rc::new(RefCell::new(vec![]));
    let (l1, l2) = (log.clone(), log.clone());
    let subscription = subject.subscribe_err(
      move |v| l1.borrow_mut().push(v.to_string()),
      move |e| l2.borrow_mut().push(e.to_string()),
    );

    assert_eq!(*log.borrow(), vec!["boom"]);
    assert!(subscription.is_closed());
    assert!(subject.is_stopped());
  }

  #[rxstream_macro::test]
  fn complete_releases_observers() {
    let subject = Subject::<i32>::new();
    let completed = Rc::new(RefCell::new(0));
    for _ in 0..3 {
      let c = completed.clone();
      subject.subscribe_complete(|_| {}, move || *c.borrow_mut() += 1);
    }
    subject.complete();
    subject.complete();

    assert_eq!(*completed.borrow(), 3);
    assert_eq!(subject.observer_count(), 0);
  }

  #[rxstream_macro::test]
  fn observer_may_unsubscribe_another_during_broadcast() {
    let subject = Subject::<i32>::new();
    let log = Rc::new(RefCell::new(vec![]));
    let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

    let (c_log, c_victim) = (log.clone(), victim.clone());
    subject.subscribe(move |v| {
      c_log.borrow_mut().push(format!("first {v}"));
      let target = c_victim.borrow().clone();
      if let Some(s) = target {
        s.unsubscribe();
      }
    });
    let c_log = log.clone();
    *victim.borrow_mut() = Some(subject.subscribe(move |v| c_log.borrow_mut().push(format!("second {v}"))));

    subject.next(1);
    subject.next(2);
    assert_eq!(*log.borrow(), vec!["first 1", "first 2"]);
    assert_eq!(subject.observer_count(), 1);
  }

  #[rxstream_macro::test]
  fn subject_subscribes_to_observable() {
    let subject = Subject::<i32>::new();
    let hit = Rc::new(RefCell::new(vec![]));
    let completed = Rc::new(RefCell::new(false));
    let (c_hit, c_completed) = (hit.clone(), completed.clone());
    subject.subscribe_complete(
      move |v| c_hit.borrow_mut().push(v),
      move || *c_completed.borrow_mut() = true,
    );

    Observable::from_iter(vec![1, 2, 3]).subscribe_with(subject.clone());
    assert_eq!(*hit.borrow(), vec![1, 2, 3]);
    assert!(*completed.borrow());
    assert!(subject.is_stopped());
  }
}
