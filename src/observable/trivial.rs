use crate::observable::Observable;

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Completes immediately without emitting.
  pub fn empty() -> Self {
    Self::create(|subscriber| {
      subscriber.complete();
      Ok(())
    })
  }

  /// Never emits and never terminates.
  pub fn never() -> Self { Self::create(|_| Ok(())) }

  /// Errors immediately with a clone of `err`.
  pub fn throw_error(err: Err) -> Self
  where
    Err: Clone,
  {
    Self::throw_error_with(move || err.clone())
  }

  /// Errors immediately with a fresh error from `factory` per subscription.
  pub fn throw_error_with(factory: impl Fn() -> Err + 'static) -> Self {
    Self::create(move |subscriber| {
      subscriber.error(factory());
      Ok(())
    })
  }
}
