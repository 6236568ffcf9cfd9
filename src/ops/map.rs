use std::rc::Rc;

use crate::{observable::Observable, observer::Observer, subscriber::Subscriber};

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Creates a new stream which calls a closure on each element and uses
  /// its return as the value.
  pub fn map<B: 'static>(self, f: impl Fn(Item) -> B + 'static) -> Observable<B, Err> {
    self.try_map_with_index(move |v, _| Ok(f(v)))
  }

  /// Like [`map`](Self::map), the closure also receives the zero-based
  /// index of the value within this subscription.
  pub fn map_with_index<B: 'static>(self, f: impl Fn(Item, usize) -> B + 'static) -> Observable<B, Err> {
    self.try_map_with_index(move |v, i| Ok(f(v, i)))
  }

  /// Fallible `map`: an `Err` returned by the closure is sent downstream as
  /// the error notification and the source is unsubscribed.
  pub fn try_map<B: 'static>(self, f: impl Fn(Item) -> Result<B, Err> + 'static) -> Observable<B, Err> {
    self.try_map_with_index(move |v, _| f(v))
  }

  fn try_map_with_index<B, F>(self, f: F) -> Observable<B, Err>
  where
    B: 'static,
    F: Fn(Item, usize) -> Result<B, Err> + 'static,
  {
    let f = Rc::new(f);
    self.lift(move |observer| MapObserver { observer, f: f.clone(), index: 0 })
  }
}

struct MapObserver<B, Err, F> {
  observer: Subscriber<B, Err>,
  f: Rc<F>,
  index: usize,
}

impl<Item, B, Err, F> Observer<Item, Err> for MapObserver<B, Err, F>
where
  F: Fn(Item, usize) -> Result<B, Err>,
{
  fn next(&mut self, value: Item) {
    let index = self.index;
    self.index += 1;
    match (self.f)(value, index) {
      Ok(v) => self.observer.next(v),
      Err(err) => self.observer.error(err),
    }
  }

  #[inline]
  fn error(&mut self, err: Err) { self.observer.error(err) }

  #[inline]
  fn complete(&mut self) { self.observer.complete() }
}
