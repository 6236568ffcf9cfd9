use std::{cell::Cell, convert::Infallible, rc::Rc};

use super::{subject_core::Terminal, Subject};
use crate::{observable::Observable, rc::MutRc};

/// Subject that emits only its last value, and only once it completes.
///
/// Every subscriber, before or after completion, receives the final value
/// followed by `complete`. If no value was pushed only `complete` is sent.
/// An error is forwarded as is and discards the held value.
pub struct AsyncSubject<Item, Err = Infallible> {
  subject: Subject<Item, Err>,
  last: MutRc<Option<Item>>,
  // Set while `complete` broadcasts the final value.
  completing: Rc<Cell<bool>>,
}

impl<Item, Err> Clone for AsyncSubject<Item, Err> {
  fn clone(&self) -> Self {
    Self { subject: self.subject.clone(), last: self.last.clone(), completing: self.completing.clone() }
  }
}

impl<Item: Clone + 'static, Err: Clone + 'static> Default for AsyncSubject<Item, Err> {
  fn default() -> Self { Self::new() }
}

impl<Item: Clone + 'static, Err: Clone + 'static> AsyncSubject<Item, Err> {
  pub fn new() -> Self {
    Self { subject: Subject::new(), last: MutRc::own(None), completing: Rc::new(Cell::new(false)) }
  }

  pub fn next(&self, value: Item) {
    if !self.subject.is_stopped() && !self.completing.get() {
      *self.last.rc_deref_mut() = Some(value);
    }
  }

  pub fn error(&self, err: Err) {
    if self.subject.is_stopped() || self.completing.get() {
      return;
    }
    let discarded = self.last.rc_deref_mut().take();
    drop(discarded);
    self.subject.error(err);
  }

  pub fn complete(&self) {
    if self.subject.is_stopped() || self.completing.replace(true) {
      return;
    }
    let last = self.last.rc_deref().clone();
    if let Some(value) = last {
      self.subject.next(value);
    }
    self.subject.complete();
    self.completing.set(false);
  }

  pub fn observer_count(&self) -> usize { self.subject.observer_count() }

  pub fn is_stopped(&self) -> bool { self.subject.is_stopped() }

  pub fn as_observable(&self) -> Observable<Item, Err> {
    let (subject, last, completing) = (self.subject.clone(), self.last.clone(), self.completing.clone());
    Observable::create(move |subscriber| {
      match subject.register(&subscriber) {
        Some(Terminal::Complete) => {
          let value = last.rc_deref().clone();
          if let Some(value) = value {
            subscriber.next(value);
          }
          subscriber.complete();
        }
        Some(terminal) => terminal.deliver(&subscriber),
        // Joined while the final value is on its way out: the broadcast
        // missed it, `complete` will still reach it.
        None if completing.get() => {
          let value = last.rc_deref().clone();
          if let Some(value) = value {
            subscriber.next(value);
          }
        }
        None => {}
      }
      Ok(())
    })
  }
}

impl_subject_surface!(AsyncSubject);

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::prelude::*;

  fn record(subject: &AsyncSubject<i32, &'static str>) -> Rc<RefCell<Vec<String>>> {
    let log = Rc::new(RefCell::new(vec![]));
    let (l1, l2, l3) = (log.clone(), log.clone(), log.clone());
    subject.subscribe_all(
      move |v| l1.borrow_mut().push(v.to_string()),
      move |e| l2.borrow_mut().push(format!("error {e}")),
      move || l3.borrow_mut().push("complete".to_string()),
    );
    log
  }

  #[rxstream_macro::test]
  fn emits_last_value_on_completion() {
    let subject = AsyncSubject::new();
    let early = record(&subject);
    subject.next(1);
    subject.next(2);
    subject.next(3);
    assert!(early.borrow().is_empty());

    subject.complete();
    let late = record(&subject);
    assert_eq!(*early.borrow(), vec!["3", "complete"]);
    assert_eq!(*late.borrow(), vec!["3", "complete"]);
  }

  #[rxstream_macro::test]
  fn completes_without_value() {
    let subject = AsyncSubject::new();
    let early = record(&subject);
    subject.complete();
    let late = record(&subject);
    assert_eq!(*early.borrow(), vec!["complete"]);
    assert_eq!(*late.borrow(), vec!["complete"]);
  }

  #[rxstream_macro::test]
  fn error_discards_value() {
    let subject = AsyncSubject::new();
    subject.next(1);
    subject.error("boom");
    subject.complete();
    let late = record(&subject);
    assert_eq!(*late.borrow(), vec!["error boom"]);
  }

  #[rxstream_macro::test]
  fn subscriber_joining_during_completion_gets_value() {
    let subject = AsyncSubject::<i32, &'static str>::new();
    let late = Rc::new(RefCell::new(None));
    let (c_subject, c_late) = (subject.clone(), late.clone());
    let joined = Rc::new(RefCell::new(false));
    subject.subscribe(move |_| {
      if !joined.replace(true) {
        *c_late.borrow_mut() = Some(record(&c_subject));
      }
    });

    subject.next(7);
    subject.complete();
    let late = late.borrow_mut().take().unwrap();
    assert_eq!(*late.borrow(), vec!["7", "complete"]);
  }
}
