use crate::{observable::Observable, observer::Observer, subscriber::Subscriber};

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Emits only the first `count` values emitted by the source, then
  /// completes and unsubscribes from it.
  ///
  /// If the source emits fewer than `count` values all of them are emitted.
  /// `take(0)` completes on subscribe without subscribing to the source.
  ///
  /// ```rust
  /// use rxstream::prelude::*;
  ///
  /// Observable::<_, Infallible>::range(0, 10).take(5).subscribe(|v| println!("{v}"));
  ///
  /// // print logs:
  /// // 0
  /// // 1
  /// // 2
  /// // 3
  /// // 4
  /// ```
  pub fn take(self, count: usize) -> Self {
    if count == 0 {
      return Observable::empty();
    }
    self.lift(move |observer| TakeObserver { observer, remaining: count })
  }
}

struct TakeObserver<Item, Err> {
  observer: Subscriber<Item, Err>,
  remaining: usize,
}

impl<Item, Err> Observer<Item, Err> for TakeObserver<Item, Err> {
  fn next(&mut self, value: Item) {
    if self.remaining == 0 {
      return;
    }
    self.remaining -= 1;
    self.observer.next(value);
    if self.remaining == 0 {
      self.observer.complete();
    }
  }

  #[inline]
  fn error(&mut self, err: Err) { self.observer.error(err) }

  #[inline]
  fn complete(&mut self) { self.observer.complete() }
}
