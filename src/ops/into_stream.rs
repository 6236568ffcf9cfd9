//! Bridge from an [`Observable`] to a `futures` [`Stream`].
//!
//! ```rust
//! use futures::StreamExt;
//! use rxstream::prelude::*;
//!
//! # futures::executor::block_on(async {
//! let mut stream = Observable::<_, Infallible>::of(1).into_stream();
//! if let Some(Ok(value)) = stream.next().await {
//!   println!("Received: {value}");
//! }
//! # });
//! ```

use std::{
  collections::VecDeque,
  pin::Pin,
  task::{Context, Poll, Waker},
};

use futures::stream::Stream;

use crate::{
  observable::Observable,
  observer::Observer,
  rc::MutRc,
  subscription::{Subscription, SubscriptionGuard},
};

struct StreamState<Item, Err> {
  queue: VecDeque<Result<Item, Err>>,
  waker: Option<Waker>,
  is_closed: bool,
}

impl<Item, Err> StreamState<Item, Err> {
  fn push(&mut self, item: Option<Result<Item, Err>>) {
    match item {
      Some(item) => self.queue.push_back(item),
      None => self.is_closed = true,
    }
    if let Some(waker) = self.waker.take() {
      waker.wake();
    }
  }
}

/// A `Stream` yielding `Ok(value)` for each `next`, `Err(err)` for an error
/// notification, and ending after the error or on completion.
///
/// Values are buffered until polled. Dropping the stream unsubscribes from
/// the observable.
pub struct ObservableStream<Item, Err> {
  state: MutRc<StreamState<Item, Err>>,
  guard: SubscriptionGuard,
}

impl<Item, Err> ObservableStream<Item, Err> {
  pub fn subscription(&self) -> &Subscription { self.guard.subscription() }
}

impl<Item, Err> Stream for ObservableStream<Item, Err> {
  type Item = Result<Item, Err>;

  fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
    let mut state = self.state.rc_deref_mut();
    if let Some(item) = state.queue.pop_front() {
      return Poll::Ready(Some(item));
    }
    if state.is_closed {
      return Poll::Ready(None);
    }
    state.waker = Some(cx.waker().clone());
    Poll::Pending
  }
}

struct StreamObserver<Item, Err>(MutRc<StreamState<Item, Err>>);

impl<Item, Err> Observer<Item, Err> for StreamObserver<Item, Err> {
  fn next(&mut self, value: Item) { self.0.rc_deref_mut().push(Some(Ok(value))) }

  fn error(&mut self, err: Err) {
    let mut state = self.0.rc_deref_mut();
    state.queue.push_back(Err(err));
    state.push(None);
  }

  fn complete(&mut self) { self.0.rc_deref_mut().push(None) }
}

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Subscribes and exposes the notifications as a [`Stream`].
  pub fn into_stream(self) -> ObservableStream<Item, Err> {
    let state = MutRc::own(StreamState { queue: VecDeque::new(), waker: None, is_closed: false });
    let subscription = self.subscribe_with(StreamObserver(state.clone()));
    ObservableStream { state, guard: subscription.unsubscribe_when_dropped() }
  }
}
