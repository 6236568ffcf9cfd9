use std::convert::Infallible;

use super::Subject;
use crate::{observable::Observable, rc::MutRc};

/// Subject holding a current value, sent to every new subscriber right away.
pub struct BehaviorSubject<Item, Err = Infallible> {
  subject: Subject<Item, Err>,
  value: MutRc<Item>,
}

impl<Item, Err> Clone for BehaviorSubject<Item, Err> {
  fn clone(&self) -> Self { Self { subject: self.subject.clone(), value: self.value.clone() } }
}

impl<Item: Clone + 'static, Err: Clone + 'static> BehaviorSubject<Item, Err> {
  pub fn new(initial: Item) -> Self { Self { subject: Subject::new(), value: MutRc::own(initial) } }

  /// The most recent value, or the initial one if nothing was pushed.
  pub fn value(&self) -> Item { self.value.rc_deref().clone() }

  pub fn next(&self, value: Item) {
    if self.subject.is_stopped() {
      return;
    }
    *self.value.rc_deref_mut() = value.clone();
    self.subject.next(value);
  }

  #[inline]
  pub fn error(&self, err: Err) { self.subject.error(err) }

  #[inline]
  pub fn complete(&self) { self.subject.complete() }

  pub fn observer_count(&self) -> usize { self.subject.observer_count() }

  pub fn is_stopped(&self) -> bool { self.subject.is_stopped() }

  pub fn as_observable(&self) -> Observable<Item, Err> {
    let (subject, value) = (self.subject.clone(), self.value.clone());
    Observable::create(move |subscriber| {
      match subject.register(&subscriber) {
        Some(terminal) => terminal.deliver(&subscriber),
        None => {
          let current = value.rc_deref().clone();
          subscriber.next(current);
        }
      }
      Ok(())
    })
  }
}

impl_subject_surface!(BehaviorSubject);
