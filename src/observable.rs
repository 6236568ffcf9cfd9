//! The lazy, push-based producer type.
//!
//! An [`Observable`] is an immutable descriptor around a producer function.
//! Every subscription invokes the producer afresh with a new [`Subscriber`];
//! nothing is shared between two subscriptions unless the producer closes
//! over a subject or other shared state on purpose.
//!
//! ```rust
//! use std::convert::Infallible;
//!
//! use rxstream::prelude::*;
//!
//! let numbers = Observable::<i32, Infallible>::create(|subscriber| {
//!   subscriber.next(1);
//!   subscriber.next(2);
//!   subscriber.complete();
//!   Ok(())
//! });
//!
//! numbers.map(|v| v * 10).subscribe(|v| println!("{v}"));
//! ```

use std::{convert::Infallible, rc::Rc};

use crate::{
  config::{report_unhandled_error, UnhandledError},
  observer::{FnMutObserver, Observer, Sink},
  subscriber::Subscriber,
  subscription::Subscription,
};

mod defer;
mod from_event;
mod interval;
mod of;
mod timer;
mod trivial;

type Producer<Item, Err> = dyn Fn(Subscriber<Item, Err>) -> Result<(), Err>;

/// A representation of any set of values over any amount of time.
pub struct Observable<Item, Err = Infallible> {
  producer: Rc<Producer<Item, Err>>,
}

impl<Item, Err> Clone for Observable<Item, Err> {
  fn clone(&self) -> Self { Self { producer: self.producer.clone() } }
}

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Builds an observable from a producer.
  ///
  /// The producer runs synchronously inside every `subscribe` call. It pushes
  /// notifications into the [`Subscriber`] it receives and registers the
  /// resources it allocates (timers, listeners, inner subscriptions) with
  /// [`Subscriber::add`] / [`Subscriber::add_teardown`], so that
  /// unsubscribing releases them. Producers that outlive the call must check
  /// [`Subscriber::is_closed`] before emitting.
  ///
  /// Returning `Err` is the producer's way to raise: the error is delivered
  /// to the observer, unless the subscriber has already stopped, in which
  /// case it goes to the unhandled error hook in [`crate::config`].
  pub fn create(producer: impl Fn(Subscriber<Item, Err>) -> Result<(), Err> + 'static) -> Self {
    Self { producer: Rc::new(producer) }
  }

  /// Subscribes with a `next` callback only. Errors are dropped silently.
  pub fn subscribe(&self, next: impl FnMut(Item) + 'static) -> Subscription {
    self.subscribe_with(FnMutObserver(next))
  }

  pub fn subscribe_err(
    &self,
    next: impl FnMut(Item) + 'static,
    error: impl FnOnce(Err) + 'static,
  ) -> Subscription {
    self.subscribe_with(Sink::new().on_next(next).on_error(error))
  }

  pub fn subscribe_complete(
    &self,
    next: impl FnMut(Item) + 'static,
    complete: impl FnOnce() + 'static,
  ) -> Subscription {
    self.subscribe_with(Sink::new().on_next(next).on_complete(complete))
  }

  pub fn subscribe_all(
    &self,
    next: impl FnMut(Item) + 'static,
    error: impl FnOnce(Err) + 'static,
    complete: impl FnOnce() + 'static,
  ) -> Subscription {
    self.subscribe_with(Sink::new().on_next(next).on_error(error).on_complete(complete))
  }

  /// Subscribes any [`Observer`], including subjects and [`Sink`]s.
  pub fn subscribe_with(&self, observer: impl Observer<Item, Err> + 'static) -> Subscription {
    let subscription = Subscription::new();
    self.subscribe_into(subscription.clone(), observer);
    subscription
  }

  /// Subscribes `observer` on a child of `parent`, registered before the
  /// producer runs so that closing `parent` (even from inside the producer)
  /// stops it.
  pub(crate) fn subscribe_within(
    &self,
    parent: &Subscription,
    observer: impl Observer<Item, Err> + 'static,
  ) -> Subscription {
    let subscription = Subscription::new();
    parent.add(subscription.clone());
    self.subscribe_into(subscription.clone(), observer);
    subscription
  }

  /// Runs the producer against `observer`, bound to an existing
  /// subscription.
  pub(crate) fn subscribe_into(
    &self,
    subscription: Subscription,
    observer: impl Observer<Item, Err> + 'static,
  ) {
    if subscription.is_closed() {
      return;
    }
    let subscriber = Subscriber::new(observer, subscription);
    if let Err(err) = (self.producer)(subscriber.clone()) {
      if subscriber.is_closed() {
        report_unhandled_error(UnhandledError::Producer {
          type_name: std::any::type_name::<Err>(),
          error: Box::new(err),
        });
      } else {
        subscriber.error(err);
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::{config, prelude::*};

  #[rxstream_macro::test]
  fn proxy_call() {
    let next = Rc::new(RefCell::new(0));
    let err = Rc::new(RefCell::new(0));
    let complete = Rc::new(RefCell::new(0));

    let (c_next, c_err, c_complete) = (next.clone(), err.clone(), complete.clone());
    Observable::create(|subscriber| {
      subscriber.next(1);
      subscriber.next(2);
      subscriber.next(3);
      subscriber.complete();
      subscriber.next(3);
      subscriber.error("never dispatch error");
      Ok(())
    })
    .subscribe_all(
      move |_| *c_next.borrow_mut() += 1,
      move |_: &str| *c_err.borrow_mut() += 1,
      move || *c_complete.borrow_mut() += 1,
    );

    assert_eq!(*next.borrow(), 3);
    assert_eq!(*complete.borrow(), 1);
    assert_eq!(*err.borrow(), 0);
  }

  #[rxstream_macro::test]
  fn each_subscription_runs_the_producer() {
    let runs = Rc::new(RefCell::new(0));
    let c_runs = runs.clone();
    let o = Observable::<i32, Infallible>::create(move |subscriber| {
      *c_runs.borrow_mut() += 1;
      subscriber.next(*c_runs.borrow());
      subscriber.complete();
      Ok(())
    });

    let sum1 = Rc::new(RefCell::new(vec![]));
    let sum2 = Rc::new(RefCell::new(vec![]));
    let (c1, c2) = (sum1.clone(), sum2.clone());
    o.subscribe(move |v| c1.borrow_mut().push(v));
    o.subscribe(move |v| c2.borrow_mut().push(v));

    assert_eq!(*runs.borrow(), 2);
    assert_eq!(*sum1.borrow(), vec![1]);
    assert_eq!(*sum2.borrow(), vec![2]);
  }

  #[rxstream_macro::test]
  fn producer_error_becomes_error_notification() {
    let got = Rc::new(RefCell::new(vec![]));
    let c_got = got.clone();
    let c_got2 = got.clone();
    Observable::<i32, String>::create(|subscriber| {
      subscriber.next(1);
      Err("boom".to_string())
    })
    .subscribe_err(
      move |v| c_got.borrow_mut().push(v.to_string()),
      move |e| c_got2.borrow_mut().push(e),
    );

    assert_eq!(*got.borrow(), vec!["1", "boom"]);
  }

  #[rxstream_macro::test]
  fn raise_after_terminal_goes_to_diagnostics() {
    let reported = Rc::new(RefCell::new(None));
    let c_reported = reported.clone();
    config::set_unhandled_error_handler(move |e| {
      *c_reported.borrow_mut() = e.downcast_producer::<&'static str>().copied();
    });

    let errors = Rc::new(RefCell::new(0));
    let c_errors = errors.clone();
    Observable::<i32, &'static str>::create(|subscriber| {
      subscriber.complete();
      Err("too late")
    })
    .subscribe_err(|_| {}, move |_| *c_errors.borrow_mut() += 1);

    config::reset();
    assert_eq!(*errors.borrow(), 0);
    assert_eq!(*reported.borrow(), Some("too late"));
  }

  #[rxstream_macro::test]
  fn unsubscribe_runs_producer_teardown() {
    let torn_down = Rc::new(RefCell::new(false));
    let c_torn_down = torn_down.clone();
    let subscription = Observable::<i32, Infallible>::create(move |subscriber| {
      let flag = c_torn_down.clone();
      subscriber.add_teardown(move || *flag.borrow_mut() = true);
      Ok(())
    })
    .subscribe(|_| {});

    assert!(!*torn_down.borrow());
    subscription.unsubscribe();
    assert!(*torn_down.borrow());
  }
}
