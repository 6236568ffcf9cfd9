use std::rc::Rc;

use crate::{observable::Observable, observer::Observer, subscriber::Subscriber};

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Emits only the values for which `predicate` returns `true`.
  pub fn filter(self, predicate: impl Fn(&Item) -> bool + 'static) -> Self {
    self.try_filter(move |v| Ok(predicate(v)))
  }

  /// Fallible `filter`: an `Err` from the predicate is sent downstream as
  /// the error notification and the source is unsubscribed.
  pub fn try_filter(self, predicate: impl Fn(&Item) -> Result<bool, Err> + 'static) -> Self {
    let predicate = Rc::new(predicate);
    self.lift(move |observer| FilterObserver { observer, predicate: predicate.clone() })
  }
}

struct FilterObserver<Item, Err, F> {
  observer: Subscriber<Item, Err>,
  predicate: Rc<F>,
}

impl<Item, Err, F> Observer<Item, Err> for FilterObserver<Item, Err, F>
where
  F: Fn(&Item) -> Result<bool, Err>,
{
  fn next(&mut self, value: Item) {
    match (self.predicate)(&value) {
      Ok(true) => self.observer.next(value),
      Ok(false) => {}
      Err(err) => self.observer.error(err),
    }
  }

  #[inline]
  fn error(&mut self, err: Err) { self.observer.error(err) }

  #[inline]
  fn complete(&mut self) { self.observer.complete() }
}
