use std::{cell::Cell, rc::Rc};

use crate::{
  observable::Observable, observer::Observer, subscriber::Subscriber, subscription::Subscription,
};

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Drops source values until `notifier` emits its first value.
  ///
  /// Both are subscribed at subscribe time, the notifier first. Its first
  /// value opens the gate and its subscription is dropped; an error from it
  /// is forwarded downstream. If it completes without emitting, no source
  /// value ever passes.
  pub fn skip_until<N: 'static>(self, notifier: Observable<N, Err>) -> Self {
    Observable::create(move |subscriber| {
      let open = Rc::new(Cell::new(false));

      let notifier_subscription = Subscription::new();
      subscriber.add(notifier_subscription.clone());
      notifier.subscribe_into(
        notifier_subscription.clone(),
        NotifierObserver {
          open: open.clone(),
          observer: subscriber.clone(),
          subscription: notifier_subscription,
        },
      );

      self.subscribe_within(subscriber.subscription(), SkipUntilObserver { open, observer: subscriber.clone() });
      Ok(())
    })
  }
}

struct SkipUntilObserver<Item, Err> {
  open: Rc<Cell<bool>>,
  observer: Subscriber<Item, Err>,
}

impl<Item, Err> Observer<Item, Err> for SkipUntilObserver<Item, Err> {
  fn next(&mut self, value: Item) {
    if self.open.get() {
      self.observer.next(value);
    }
  }

  #[inline]
  fn error(&mut self, err: Err) { self.observer.error(err) }

  #[inline]
  fn complete(&mut self) { self.observer.complete() }
}

struct NotifierObserver<Item, Err> {
  open: Rc<Cell<bool>>,
  observer: Subscriber<Item, Err>,
  subscription: Subscription,
}

impl<Item, N, Err> Observer<N, Err> for NotifierObserver<Item, Err> {
  fn next(&mut self, _: N) {
    self.open.set(true);
    self.subscription.unsubscribe();
  }

  #[inline]
  fn error(&mut self, err: Err) { self.observer.error(err) }

  fn complete(&mut self) {}
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::prelude::*;

  #[rxstream_macro::test]
  fn passes_values_after_notifier_emits() {
    let source = Subject::<i32>::new();
    let notifier = Subject::<()>::new();
    let hit = Rc::new(RefCell::new(vec![]));
    let c_hit = hit.clone();
    source
      .as_observable()
      .skip_until(notifier.as_observable())
      .subscribe(move |v| c_hit.borrow_mut().push(v));

    source.next(1);
    source.next(2);
    notifier.next(());
    source.next(3);
    notifier.next(());
    source.next(4);

    assert_eq!(*hit.borrow(), vec![3, 4]);
    assert_eq!(notifier.observer_count(), 0);
  }

  #[rxstream_macro::test]
  fn notifier_completing_empty_blocks_forever() {
    let source = Subject::<i32>::new();
    let hit = Rc::new(RefCell::new(vec![]));
    let c_hit = hit.clone();
    source
      .as_observable()
      .skip_until(Observable::<(), Infallible>::empty())
      .subscribe(move |v| c_hit.borrow_mut().push(v));

    source.next(1);
    assert!(hit.borrow().is_empty());
  }

  #[rxstream_macro::test]
  fn notifier_error_is_forwarded() {
    let source = Subject::<i32, &'static str>::new();
    let log = Rc::new(RefCell::new(vec![]));
    let (l1, l2) = (log.clone(), log.clone());
    source
      .as_observable()
      .skip_until(Observable::<(), _>::throw_error("notifier failed"))
      .subscribe_err(
        move |v| l1.borrow_mut().push(v.to_string()),
        move |e| l2.borrow_mut().push(e.to_string()),
      );

    assert_eq!(*log.borrow(), vec!["notifier failed"]);
    assert_eq!(source.observer_count(), 0);
  }

  #[rxstream_macro::test]
  fn timed_notifier() {
    let scheduler = TestScheduler::new();
    let hit = Rc::new(RefCell::new(vec![]));
    let c_hit = hit.clone();
    Observable::<_, Infallible>::interval(Duration::from_millis(100), scheduler.clone())
      .skip_until(Observable::timer(Duration::from_millis(250), scheduler.clone()))
      .take(3)
      .subscribe(move |v| c_hit.borrow_mut().push(v));

    scheduler.advance_by(Duration::from_secs(1));
    assert_eq!(*hit.borrow(), vec![2, 3, 4]);
    assert!(scheduler.is_idle());
  }
}
