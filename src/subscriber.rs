//! The handle a producer pushes notifications into.
//!
//! A [`Subscriber`] wraps the downstream observer and enforces the observer
//! contract on its behalf:
//!
//! - terminal notifications are absorbing; anything after them is dropped
//!   and reported to the stopped-notification hook,
//! - after a terminal notification has been delivered the subscriber closes
//!   its own [`Subscription`], releasing every resource the producer
//!   registered,
//! - once its subscription is closed nothing reaches the observer any more,
//! - notifications pushed while the observer is still busy with a previous
//!   one (re-entrant delivery) are queued and delivered in order when the
//!   current call returns, so no borrow is ever held across user code.

use std::collections::VecDeque;

use crate::{
  config::{report_stopped_notification, StoppedNotification},
  observer::{BoxedObserver, Notification, Observer},
  rc::MutRc,
  subscription::Subscription,
};

struct State<Item, Err> {
  observer: Option<BoxedObserver<Item, Err>>,
  stopped: bool,
  draining: bool,
  queue: VecDeque<Notification<Item, Err>>,
}

pub struct Subscriber<Item, Err> {
  state: MutRc<State<Item, Err>>,
  subscription: Subscription,
}

impl<Item, Err> Clone for Subscriber<Item, Err> {
  fn clone(&self) -> Self {
    Self { state: self.state.clone(), subscription: self.subscription.clone() }
  }
}

impl<Item: 'static, Err: 'static> Subscriber<Item, Err> {
  /// Wraps `observer`, tying its lifetime to `subscription`.
  pub fn new(observer: impl Observer<Item, Err> + 'static, subscription: Subscription) -> Self {
    let state = MutRc::own(State {
      observer: Some(Box::new(observer) as BoxedObserver<Item, Err>),
      stopped: false,
      draining: false,
      queue: VecDeque::new(),
    });
    let weak = state.downgrade();
    subscription.add_teardown(move || {
      if let Some(state) = weak.upgrade() {
        let observer = {
          let mut st = state.rc_deref_mut();
          st.stopped = true;
          st.queue.clear();
          st.observer.take()
        };
        drop(observer);
      }
    });
    Self { state, subscription }
  }
}

impl<Item, Err> Subscriber<Item, Err> {
  #[inline]
  pub fn next(&self, value: Item) { self.deliver(Notification::Next(value)) }

  #[inline]
  pub fn error(&self, err: Err) { self.deliver(Notification::Error(err)) }

  #[inline]
  pub fn complete(&self) { self.deliver(Notification::Complete) }

  /// Whether producers should stop emitting: a terminal notification was
  /// accepted or the subscription was closed.
  pub fn is_closed(&self) -> bool { self.is_stopped() || self.subscription.is_closed() }

  /// Whether a terminal notification was accepted or the subscriber was torn
  /// down.
  pub fn is_stopped(&self) -> bool { self.state.rc_deref().stopped }

  /// Registers a resource to release when this subscriber closes.
  pub fn add(&self, subscription: Subscription) { self.subscription.add(subscription) }

  pub fn add_teardown(&self, f: impl FnOnce() + 'static) { self.subscription.add_teardown(f) }

  pub fn unsubscribe(&self) { self.subscription.unsubscribe() }

  pub fn subscription(&self) -> &Subscription { &self.subscription }

  fn deliver(&self, notification: Notification<Item, Err>) {
    {
      let mut st = self.state.rc_deref_mut();
      if st.stopped || self.subscription.is_closed() {
        drop(st);
        report_stopped_notification(kind_of(&notification));
        return;
      }
      if notification.is_terminal() {
        st.stopped = true;
      }
      st.queue.push_back(notification);
      if st.draining {
        return;
      }
      st.draining = true;
    }
    self.drain();
  }

  fn drain(&self) {
    loop {
      let step = {
        let mut st = self.state.rc_deref_mut();
        match st.queue.pop_front() {
          Some(n) => st.observer.take().map(|o| (n, o)),
          None => None,
        }
      };
      let Some((notification, mut observer)) = step else {
        self.state.rc_deref_mut().draining = false;
        return;
      };

      let terminal = notification.is_terminal();
      notification.accept(&mut observer);

      if terminal {
        drop(observer);
        self.state.rc_deref_mut().draining = false;
        self.subscription.unsubscribe();
        return;
      }
      if self.subscription.is_closed() {
        drop(observer);
        self.state.rc_deref_mut().draining = false;
        return;
      }
      self.state.rc_deref_mut().observer = Some(observer);
    }
  }
}

fn kind_of<Item, Err>(n: &Notification<Item, Err>) -> StoppedNotification {
  match n {
    Notification::Next(_) => StoppedNotification::Next,
    Notification::Error(_) => StoppedNotification::Error,
    Notification::Complete => StoppedNotification::Complete,
  }
}

/// Lets a subscriber act as the observer of another stream.
impl<Item, Err> Observer<Item, Err> for Subscriber<Item, Err> {
  #[inline]
  fn next(&mut self, value: Item) { Subscriber::next(self, value) }

  #[inline]
  fn error(&mut self, err: Err) { Subscriber::error(self, err) }

  #[inline]
  fn complete(&mut self) { Subscriber::complete(self) }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use super::*;
  use crate::observer::Sink;

  fn recorder() -> (Rc<RefCell<Vec<String>>>, Sink<i32, &'static str>) {
    let log = Rc::new(RefCell::new(vec![]));
    let (l1, l2, l3) = (log.clone(), log.clone(), log.clone());
    let sink = Sink::new()
      .on_next(move |v| l1.borrow_mut().push(format!("next {v}")))
      .on_error(move |e| l2.borrow_mut().push(format!("error {e}")))
      .on_complete(move || l3.borrow_mut().push("complete".to_string()));
    (log, sink)
  }

  #[rxstream_macro::test]
  fn terminal_is_absorbing() {
    let (log, sink) = recorder();
    let subscriber = Subscriber::new(sink, Subscription::new());
    subscriber.next(1);
    subscriber.complete();
    subscriber.next(2);
    subscriber.error("late");

    assert_eq!(*log.borrow(), vec!["next 1", "complete"]);
    assert!(subscriber.subscription().is_closed());
  }

  #[rxstream_macro::test]
  fn closed_subscription_silences_observer() {
    let (log, sink) = recorder();
    let subscriber = Subscriber::new(sink, Subscription::new());
    subscriber.next(1);
    subscriber.unsubscribe();
    subscriber.next(2);

    assert_eq!(*log.borrow(), vec!["next 1"]);
    assert!(subscriber.is_closed());
  }

  #[rxstream_macro::test]
  fn reentrant_next_is_queued() {
    let log = Rc::new(RefCell::new(vec![]));
    let slot: Rc<RefCell<Option<Subscriber<i32, ()>>>> = Rc::new(RefCell::new(None));

    let c_log = log.clone();
    let c_slot = slot.clone();
    let subscriber = Subscriber::new(
      Sink::new().on_next(move |v: i32| {
        c_log.borrow_mut().push(v);
        if v == 1 {
          let inner = c_slot.borrow().clone();
          if let Some(s) = inner {
            s.next(2);
            s.next(3);
          }
        }
      }),
      Subscription::new(),
    );
    *slot.borrow_mut() = Some(subscriber.clone());

    subscriber.next(1);
    subscriber.next(4);
    assert_eq!(*log.borrow(), vec![1, 2, 3, 4]);
    slot.borrow_mut().take();
  }
}
