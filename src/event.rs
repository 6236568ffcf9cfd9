//! Event registration, the collaborator behind `Observable::from_event`.
//!
//! An [`EventSource`] lets a handler be attached to a named event of some
//! target and hands back a closure that detaches it again. [`EventHub`] is a
//! small in-process implementation keyed by `(target, event_name)`, good
//! enough to drive event-sourced observables in tests and demos.

use std::rc::Rc;

use crate::rc::MutRc;

/// Detaches a previously added listener.
pub type RemoveListener = Box<dyn FnOnce()>;

/// Shared handler passed to `from_event_pattern` registration callbacks.
pub type EventHandler<Event> = Rc<dyn Fn(Event)>;

pub trait EventSource {
  type Target: ?Sized;
  type Event;

  fn add_listener(
    &self,
    target: &Self::Target,
    event_name: &str,
    handler: Box<dyn Fn(Self::Event)>,
  ) -> RemoveListener;
}

struct Listener<Event> {
  id: u64,
  target: String,
  event_name: String,
  handler: EventHandler<Event>,
}

struct HubState<Event> {
  next_id: u64,
  listeners: Vec<Listener<Event>>,
}

impl<Event> Default for HubState<Event> {
  fn default() -> Self { Self { next_id: 0, listeners: vec![] } }
}

/// In-process event dispatcher. Clones share the same listener table.
pub struct EventHub<Event>(MutRc<HubState<Event>>);

impl<Event> Clone for EventHub<Event> {
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<Event> Default for EventHub<Event> {
  fn default() -> Self { Self(MutRc::default()) }
}

impl<Event: Clone> EventHub<Event> {
  pub fn new() -> Self { Self::default() }

  /// Calls every listener registered for `(target, event_name)`, in
  /// registration order.
  ///
  /// Listeners added during dispatch are not called for this event;
  /// listeners removed during dispatch are skipped.
  pub fn emit(&self, target: &str, event_name: &str, event: Event) {
    let snapshot: Vec<_> = self
      .0
      .rc_deref()
      .listeners
      .iter()
      .filter(|l| l.target == target && l.event_name == event_name)
      .map(|l| (l.id, l.handler.clone()))
      .collect();

    for (id, handler) in snapshot {
      if self.is_registered(id) {
        handler(event.clone());
      }
    }
  }

  pub fn listener_count(&self, target: &str, event_name: &str) -> usize {
    self
      .0
      .rc_deref()
      .listeners
      .iter()
      .filter(|l| l.target == target && l.event_name == event_name)
      .count()
  }

  fn is_registered(&self, id: u64) -> bool { self.0.rc_deref().listeners.iter().any(|l| l.id == id) }
}

impl<Event: 'static> EventSource for EventHub<Event> {
  type Target = str;
  type Event = Event;

  fn add_listener(
    &self,
    target: &str,
    event_name: &str,
    handler: Box<dyn Fn(Event)>,
  ) -> RemoveListener {
    let id = {
      let mut state = self.0.rc_deref_mut();
      let id = state.next_id;
      state.next_id += 1;
      state.listeners.push(Listener {
        id,
        target: target.to_owned(),
        event_name: event_name.to_owned(),
        handler: Rc::from(handler),
      });
      id
    };

    let weak = self.0.downgrade();
    Box::new(move || {
      if let Some(state) = weak.upgrade() {
        let removed = {
          let mut state = state.rc_deref_mut();
          let pos = state.listeners.iter().position(|l| l.id == id);
          pos.map(|pos| state.listeners.remove(pos))
        };
        drop(removed);
      }
    })
  }
}

#[cfg(test)]
mod tests {
  use std::cell::RefCell;

  use super::*;

  #[rxstream_macro::test]
  fn dispatches_by_target_and_name() {
    let hub = EventHub::<i32>::new();
    let log = Rc::new(RefCell::new(vec![]));

    let l = log.clone();
    let remove = hub.add_listener("button", "click", Box::new(move |e| l.borrow_mut().push(e)));
    let l = log.clone();
    hub.add_listener("button", "hover", Box::new(move |e| l.borrow_mut().push(-e)));

    hub.emit("button", "click", 1);
    hub.emit("input", "click", 2);
    hub.emit("button", "hover", 3);
    assert_eq!(*log.borrow(), vec![1, -3]);

    remove();
    hub.emit("button", "click", 4);
    assert_eq!(hub.listener_count("button", "click"), 0);
    assert_eq!(*log.borrow(), vec![1, -3]);
  }

  #[rxstream_macro::test]
  fn listener_removed_during_dispatch_is_skipped() {
    let hub = EventHub::<()>::new();
    let hit = Rc::new(RefCell::new(vec![]));
    let second_remover: Rc<RefCell<Option<RemoveListener>>> = Rc::new(RefCell::new(None));

    let (c_hit, c_remover) = (hit.clone(), second_remover.clone());
    hub.add_listener(
      "doc",
      "tick",
      Box::new(move |_| {
        c_hit.borrow_mut().push("first");
        let remover = c_remover.borrow_mut().take();
        if let Some(remove) = remover {
          remove();
        }
      }),
    );
    let c_hit = hit.clone();
    let remove = hub.add_listener("doc", "tick", Box::new(move |_| c_hit.borrow_mut().push("second")));
    *second_remover.borrow_mut() = Some(remove);

    hub.emit("doc", "tick", ());
    assert_eq!(*hit.borrow(), vec!["first"]);
  }
}
