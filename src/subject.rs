//! Multicast producers that are observers at the same time.
//!
//! A subject keeps a list of subscribed observers and forwards each
//! notification it receives to all of them, in subscription order. Once it
//! has seen `error` or `complete` it is stopped: its observers are released,
//! later `next` calls are ignored and every late subscriber is immediately
//! sent the stored terminal notification.
//!
//! | subject | what a new subscriber gets first |
//! |---|---|
//! | [`Subject`] | nothing, only what is pushed afterwards |
//! | [`BehaviorSubject`] | the current value |
//! | [`ReplaySubject`] | the buffered values, bounded by count and age |
//! | [`AsyncSubject`] | nothing until completion, then the last value |
//!
//! Delivery iterates over a copy of the observer list, so observers may
//! subscribe or unsubscribe (themselves or others) while a notification is
//! being broadcast.

/// Shared subscribe surface, `Observer` impl and `Observable` conversion for
/// every subject wrapper exposing `as_observable`.
macro_rules! impl_subject_surface {
  ($ty:ident) => {
    impl<Item: Clone + 'static, Err: Clone + 'static> $ty<Item, Err> {
      pub fn subscribe(
        &self,
        next: impl FnMut(Item) + 'static,
      ) -> $crate::subscription::Subscription {
        self.as_observable().subscribe(next)
      }

      pub fn subscribe_err(
        &self,
        next: impl FnMut(Item) + 'static,
        error: impl FnOnce(Err) + 'static,
      ) -> $crate::subscription::Subscription {
        self.as_observable().subscribe_err(next, error)
      }

      pub fn subscribe_complete(
        &self,
        next: impl FnMut(Item) + 'static,
        complete: impl FnOnce() + 'static,
      ) -> $crate::subscription::Subscription {
        self.as_observable().subscribe_complete(next, complete)
      }

      pub fn subscribe_all(
        &self,
        next: impl FnMut(Item) + 'static,
        error: impl FnOnce(Err) + 'static,
        complete: impl FnOnce() + 'static,
      ) -> $crate::subscription::Subscription {
        self.as_observable().subscribe_all(next, error, complete)
      }

      pub fn subscribe_with(
        &self,
        observer: impl $crate::observer::Observer<Item, Err> + 'static,
      ) -> $crate::subscription::Subscription {
        self.as_observable().subscribe_with(observer)
      }
    }

    impl<Item: Clone + 'static, Err: Clone + 'static> $crate::observer::Observer<Item, Err>
      for $ty<Item, Err>
    {
      #[inline]
      fn next(&mut self, value: Item) { $ty::next(self, value) }

      #[inline]
      fn error(&mut self, err: Err) { $ty::error(self, err) }

      #[inline]
      fn complete(&mut self) { $ty::complete(self) }
    }

    impl<Item: Clone + 'static, Err: Clone + 'static> From<$ty<Item, Err>>
      for $crate::observable::Observable<Item, Err>
    {
      fn from(subject: $ty<Item, Err>) -> Self { subject.as_observable() }
    }
  };
}

mod async_subject;
mod behavior_subject;
mod replay_subject;
mod subject_core;
mod subscribers;

pub use async_subject::AsyncSubject;
pub use behavior_subject::BehaviorSubject;
pub use replay_subject::ReplaySubject;
pub use subject_core::Subject;
