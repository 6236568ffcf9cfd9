use crate::observable::Observable;

/// Subscribes to every source at once and forwards all their values as they
/// arrive.
///
/// Completes after every source has completed. The first error from any
/// source is forwarded and unsubscribes the others.
pub fn merge<Item: 'static, Err: 'static>(sources: Vec<Observable<Item, Err>>) -> Observable<Item, Err> {
  Observable::from_iter(sources).merge_map(|source| source)
}

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  pub fn merge_with(self, other: Observable<Item, Err>) -> Self { merge(vec![self, other]) }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use super::*;
  use crate::prelude::*;

  #[rxstream_macro::test]
  fn odd_even_merge() {
    let even = Subject::<i32>::new();
    let odd = Subject::<i32>::new();
    let hit = Rc::new(RefCell::new(vec![]));
    let completed = Rc::new(RefCell::new(false));
    let (c_hit, c_completed) = (hit.clone(), completed.clone());

    even.as_observable().merge_with(odd.as_observable()).subscribe_complete(
      move |v| c_hit.borrow_mut().push(v),
      move || *c_completed.borrow_mut() = true,
    );

    (0..6).for_each(|v| if v % 2 == 0 { even.next(v) } else { odd.next(v) });
    even.complete();
    assert!(!*completed.borrow());
    odd.complete();

    assert_eq!(*hit.borrow(), vec![0, 1, 2, 3, 4, 5]);
    assert!(*completed.borrow());
  }

  #[rxstream_macro::test]
  fn error_unsubscribes_other_sources() {
    let a = Subject::<i32, &'static str>::new();
    let b = Subject::<i32, &'static str>::new();
    let errors = Rc::new(RefCell::new(vec![]));
    let c_errors = errors.clone();
    merge(vec![a.as_observable(), b.as_observable()])
      .subscribe_err(|_| {}, move |e| c_errors.borrow_mut().push(e));

    a.error("a failed");
    assert_eq!(*errors.borrow(), vec!["a failed"]);
    assert_eq!(b.observer_count(), 0);
  }

  #[rxstream_macro::test]
  fn empty_list_completes() {
    let completed = Rc::new(RefCell::new(false));
    let c_completed = completed.clone();
    merge(Vec::<Observable<i32>>::new()).subscribe_complete(|_| {}, move || *c_completed.borrow_mut() = true);
    assert!(*completed.borrow());
  }
}
