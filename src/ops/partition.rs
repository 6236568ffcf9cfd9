use std::rc::Rc;

use crate::observable::Observable;

/// Splits `source` into the values matching `predicate` and the rest.
///
/// Both outputs go through one shared subscription to `source` while they
/// are subscribed at the same time, and terminate together with it. A source
/// that completes synchronously finishes before the second output subscribes,
/// so it runs once more for that output.
///
/// ```rust
/// use rxstream::{ops::partition, prelude::*};
///
/// let (evens, odds) = partition(Observable::<_, Infallible>::range(0, 6), |v| v % 2 == 0);
/// evens.subscribe(|v| println!("even {v}"));
/// odds.subscribe(|v| println!("odd {v}"));
/// ```
pub fn partition<Item, Err>(
  source: Observable<Item, Err>,
  predicate: impl Fn(&Item) -> bool + 'static,
) -> (Observable<Item, Err>, Observable<Item, Err>)
where
  Item: Clone + 'static,
  Err: Clone + 'static,
{
  let shared = source.share();
  let predicate = Rc::new(predicate);
  let matching = predicate.clone();
  (shared.clone().filter(move |v| matching(v)), shared.filter(move |v| !predicate(v)))
}
