use crate::observable::Observable;

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Calls `factory` at subscribe time and mirrors the observable it
  /// returns.
  pub fn defer(factory: impl Fn() -> Observable<Item, Err> + 'static) -> Self {
    Self::create(move |subscriber| {
      factory().subscribe_within(subscriber.subscription(), subscriber.clone());
      Ok(())
    })
  }

  /// Chooses between two observables at subscribe time.
  pub fn iif(
    condition: impl Fn() -> bool + 'static,
    when_true: Observable<Item, Err>,
    when_false: Observable<Item, Err>,
  ) -> Self {
    Self::defer(move || if condition() { when_true.clone() } else { when_false.clone() })
  }
}
