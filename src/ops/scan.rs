use std::rc::Rc;

use crate::{observable::Observable, observer::Observer, subscriber::Subscriber};

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Emits the running accumulation of the source, starting from `seed`.
  ///
  /// Each subscription starts from its own copy of `seed`. The seed itself
  /// is not emitted.
  pub fn scan<Acc>(self, seed: Acc, f: impl Fn(Acc, Item) -> Acc + 'static) -> Observable<Acc, Err>
  where
    Acc: Clone + 'static,
  {
    self.try_scan_with_index(seed, move |acc, v, _| Ok(f(acc, v)))
  }

  /// Like [`scan`](Self::scan), the closure also receives the zero-based
  /// index of the value.
  pub fn scan_with_index<Acc>(
    self,
    seed: Acc,
    f: impl Fn(Acc, Item, usize) -> Acc + 'static,
  ) -> Observable<Acc, Err>
  where
    Acc: Clone + 'static,
  {
    self.try_scan_with_index(seed, move |acc, v, i| Ok(f(acc, v, i)))
  }

  /// Fallible `scan`: an `Err` from the accumulator is sent downstream as
  /// the error notification and the source is unsubscribed.
  pub fn try_scan<Acc>(
    self,
    seed: Acc,
    f: impl Fn(Acc, Item) -> Result<Acc, Err> + 'static,
  ) -> Observable<Acc, Err>
  where
    Acc: Clone + 'static,
  {
    self.try_scan_with_index(seed, move |acc, v, _| f(acc, v))
  }

  fn try_scan_with_index<Acc, F>(self, seed: Acc, f: F) -> Observable<Acc, Err>
  where
    Acc: Clone + 'static,
    F: Fn(Acc, Item, usize) -> Result<Acc, Err> + 'static,
  {
    let f = Rc::new(f);
    self.lift(move |observer| ScanObserver {
      observer,
      f: f.clone(),
      acc: Some(seed.clone()),
      index: 0,
    })
  }
}

struct ScanObserver<Acc, Err, F> {
  observer: Subscriber<Acc, Err>,
  f: Rc<F>,
  // Only `None` while the accumulator closure runs or after it failed.
  acc: Option<Acc>,
  index: usize,
}

impl<Item, Acc, Err, F> Observer<Item, Err> for ScanObserver<Acc, Err, F>
where
  Acc: Clone,
  F: Fn(Acc, Item, usize) -> Result<Acc, Err>,
{
  fn next(&mut self, value: Item) {
    let Some(acc) = self.acc.take() else { return };
    let index = self.index;
    self.index += 1;
    match (self.f)(acc, value, index) {
      Ok(acc) => {
        self.acc = Some(acc.clone());
        self.observer.next(acc);
      }
      Err(err) => self.observer.error(err),
    }
  }

  #[inline]
  fn error(&mut self, err: Err) { self.observer.error(err) }

  #[inline]
  fn complete(&mut self) { self.observer.complete() }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::prelude::*;

  #[rxstream_macro::test]
  fn running_sum() {
    let hit = Rc::new(RefCell::new(vec![]));
    let c_hit = hit.clone();
    Observable::<_, Infallible>::from_iter(vec![1, 2, 3, 4])
      .scan(0, |acc, v| acc + v)
      .subscribe(move |v| c_hit.borrow_mut().push(v));
    assert_eq!(*hit.borrow(), vec![1, 3, 6, 10]);
  }

  #[rxstream_macro::test]
  fn seed_is_copied_per_subscription() {
    let collected = Observable::<_, Infallible>::from_iter(vec!["a", "b"]).scan(vec![], |mut acc, v| {
      acc.push(v);
      acc
    });
    let hit = Rc::new(RefCell::new(vec![]));
    for _ in 0..2 {
      let c_hit = hit.clone();
      collected.clone().subscribe(move |v: Vec<&str>| c_hit.borrow_mut().push(v.len()));
    }
    assert_eq!(*hit.borrow(), vec![1, 2, 1, 2]);
  }

  #[rxstream_macro::test]
  fn index_is_passed() {
    let hit = Rc::new(RefCell::new(vec![]));
    let c_hit = hit.clone();
    Observable::<_, Infallible>::from_iter(vec![10, 10, 10])
      .scan_with_index(0, |acc, v, i| acc + v * i as i32)
      .subscribe(move |v| c_hit.borrow_mut().push(v));
    assert_eq!(*hit.borrow(), vec![0, 10, 30]);
  }

  #[rxstream_macro::test]
  fn accumulator_error_terminates() {
    let log = Rc::new(RefCell::new(vec![]));
    let (l1, l2) = (log.clone(), log.clone());
    Observable::<_, String>::from_iter(vec![5, 10, 20])
      .try_scan(0, |acc, v| if acc + v > 12 { Err(format!("overflow at {v}")) } else { Ok(acc + v) })
      .subscribe_err(
        move |v| l1.borrow_mut().push(v.to_string()),
        move |e| l2.borrow_mut().push(e),
      );
    assert_eq!(*log.borrow(), vec!["5", "overflow at 10"]);
  }
}
