use crate::observable::Observable;

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Emits `value` once, then completes.
  pub fn of(value: Item) -> Self
  where
    Item: Clone,
  {
    Self::from_iter(std::iter::once(value))
  }

  /// Emits every item of `iter` in order, then completes.
  ///
  /// The iterable is cloned for each subscription. Emission stops early
  /// once the subscriber is closed, so infinite iterators are fine behind
  /// `take`.
  pub fn from_iter<I>(iter: I) -> Self
  where
    I: IntoIterator<Item = Item> + Clone + 'static,
  {
    Self::create(move |subscriber| {
      for v in iter.clone() {
        if subscriber.is_closed() {
          return Ok(());
        }
        subscriber.next(v);
      }
      subscriber.complete();
      Ok(())
    })
  }
}

impl<Err: 'static> Observable<i64, Err> {
  /// Emits `count` consecutive integers starting at `start`.
  pub fn range(start: i64, count: usize) -> Self { Self::from_iter((start..).take(count)) }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::prelude::*;

  #[rxstream_macro::test]
  fn from_iter_emits_then_completes() {
    let hit = Rc::new(RefCell::new(vec![]));
    let completed = Rc::new(RefCell::new(false));
    let (c_hit, c_completed) = (hit.clone(), completed.clone());

    Observable::<_, Infallible>::from_iter(vec![1, 2, 3, 4]).subscribe_complete(
      move |v| c_hit.borrow_mut().push(v),
      move || *c_completed.borrow_mut() = true,
    );

    assert_eq!(*hit.borrow(), vec![1, 2, 3, 4]);
    assert!(*completed.borrow());
  }

  #[rxstream_macro::test]
  fn infinite_source_stops_when_closed() {
    let hit = Rc::new(RefCell::new(vec![]));
    let c_hit = hit.clone();
    Observable::<_, Infallible>::from_iter(0..).take(3).subscribe(move |v| c_hit.borrow_mut().push(v));
    assert_eq!(*hit.borrow(), vec![0, 1, 2]);
  }

  #[rxstream_macro::test]
  fn range_counts_from_start() {
    let hit = Rc::new(RefCell::new(vec![]));
    let c_hit = hit.clone();
    Observable::<_, Infallible>::range(3, 4).subscribe(move |v| c_hit.borrow_mut().push(v));
    assert_eq!(*hit.borrow(), vec![3, 4, 5, 6]);
  }

  #[rxstream_macro::test]
  fn of_emits_single_value() {
    let hit = Rc::new(RefCell::new(vec![]));
    let c_hit = hit.clone();
    Observable::<_, Infallible>::of("even").subscribe(move |v| c_hit.borrow_mut().push(v));
    assert_eq!(*hit.borrow(), vec!["even"]);
  }
}
