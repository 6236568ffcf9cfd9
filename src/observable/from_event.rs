use std::{borrow::Borrow, rc::Rc};

use crate::{
  event::{EventHandler, EventSource},
  observable::Observable,
};

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Emits every `event_name` event `source` dispatches for `target`.
  ///
  /// The listener is added per subscription and removed on unsubscribe.
  /// Never completes.
  pub fn from_event<S>(source: S, target: &S::Target, event_name: &str) -> Self
  where
    S: EventSource<Event = Item> + 'static,
    S::Target: ToOwned,
    <S::Target as ToOwned>::Owned: 'static,
  {
    let target = target.to_owned();
    let event_name = event_name.to_owned();
    Self::create(move |subscriber| {
      let emitter = subscriber.clone();
      let remove = source.add_listener(
        Borrow::borrow(&target),
        &event_name,
        Box::new(move |event| emitter.next(event)),
      );
      subscriber.add_teardown(remove);
      Ok(())
    })
  }

  /// Event observable over arbitrary registration functions.
  ///
  /// `add_handler` is called on subscribe and may return a token, which is
  /// passed back to `remove_handler` together with the same handler on
  /// unsubscribe.
  pub fn from_event_pattern<Token: 'static>(
    add_handler: impl Fn(EventHandler<Item>) -> Token + 'static,
    remove_handler: impl Fn(EventHandler<Item>, Token) + 'static,
  ) -> Self {
    let remove_handler = Rc::new(remove_handler);
    Self::create(move |subscriber| {
      let emitter = subscriber.clone();
      let handler: EventHandler<Item> = Rc::new(move |event| emitter.next(event));
      let token = add_handler(handler.clone());
      let remove_handler = remove_handler.clone();
      subscriber.add_teardown(move || remove_handler(handler, token));
      Ok(())
    })
  }
}
