use crate::{observable::Observable, observer::Observer, subscriber::Subscriber};

impl<Item: Clone + 'static, Err: 'static> Observable<Item, Err> {
  /// Emits `(previous, current)` for every value after the first.
  pub fn pairwise(self) -> Observable<(Item, Item), Err> {
    self.lift(|observer| PairwiseObserver { observer, previous: None })
  }
}

struct PairwiseObserver<Item, Err> {
  observer: Subscriber<(Item, Item), Err>,
  previous: Option<Item>,
}

impl<Item: Clone, Err> Observer<Item, Err> for PairwiseObserver<Item, Err> {
  fn next(&mut self, value: Item) {
    if let Some(previous) = self.previous.replace(value.clone()) {
      self.observer.next((previous, value));
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
  fn emits_consecutive_pairs() {
    let hit = Rc::new(RefCell::new(vec![]));
    let c_hit = hit.clone();
    Observable::<_, Infallible>::from_iter(vec![1, 2, 3, 4])
      .pairwise()
      .subscribe(move |v| c_hit.borrow_mut().push(v));
    assert_eq!(*hit.borrow(), vec![(1, 2), (2, 3), (3, 4)]);
  }

  #[rxstream_macro::test]
  fn single_value_emits_nothing() {
    let hit = Rc::new(RefCell::new(0));
    let completed = Rc::new(RefCell::new(false));
    let (c_hit, c_completed) = (hit.clone(), completed.clone());
    Observable::<_, Infallible>::of(1).pairwise().subscribe_complete(
      move |_| *c_hit.borrow_mut() += 1,
      move || *c_completed.borrow_mut() = true,
    );
    assert_eq!(*hit.borrow(), 0);
    assert!(*completed.borrow());
  }
}
