use std::{collections::VecDeque, rc::Rc};

use crate::{observable::Observable, observer::Observer, rc::MutRc, subscriber::Subscriber};

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Maps every value to an inner observable and subscribes to all of them
  /// at once, forwarding inner values as they arrive.
  ///
  /// Completes once the source and every inner observable have completed.
  pub fn merge_map<Out: 'static>(
    self,
    project: impl Fn(Item) -> Observable<Out, Err> + 'static,
  ) -> Observable<Out, Err> {
    self.merge_map_with_concurrency(project, usize::MAX)
  }

  /// Like [`merge_map`](Self::merge_map) with at most `limit` inner
  /// subscriptions active. Source values arriving while the limit is reached
  /// are queued and projected in arrival order as inner observables
  /// complete. A `limit` of zero is treated as one.
  pub fn merge_map_with_concurrency<Out: 'static>(
    self,
    project: impl Fn(Item) -> Observable<Out, Err> + 'static,
    limit: usize,
  ) -> Observable<Out, Err> {
    let project: Rc<dyn Fn(Item) -> Observable<Out, Err>> = Rc::new(project);
    let limit = limit.max(1);
    self.lift(move |observer| {
      MergeMap {
        observer,
        project: project.clone(),
        limit,
        state: MutRc::own(MergeState { active: 0, buffer: VecDeque::new(), outer_done: false }),
      }
    })
  }

  /// Maps every value to an inner observable and subscribes to them one at
  /// a time, in source order.
  pub fn concat_map<Out: 'static>(
    self,
    project: impl Fn(Item) -> Observable<Out, Err> + 'static,
  ) -> Observable<Out, Err> {
    self.merge_map_with_concurrency(project, 1)
  }
}

struct MergeState<Item> {
  active: usize,
  buffer: VecDeque<Item>,
  outer_done: bool,
}

/// Shared by the outer observer and every inner one of a subscription.
struct MergeMap<Item, Out, Err> {
  observer: Subscriber<Out, Err>,
  project: Rc<dyn Fn(Item) -> Observable<Out, Err>>,
  limit: usize,
  state: MutRc<MergeState<Item>>,
}

impl<Item, Out, Err> Clone for MergeMap<Item, Out, Err> {
  fn clone(&self) -> Self {
    Self {
      observer: self.observer.clone(),
      project: self.project.clone(),
      limit: self.limit,
      state: self.state.clone(),
    }
  }
}

impl<Item: 'static, Out: 'static, Err: 'static> MergeMap<Item, Out, Err> {
  fn subscribe_inner(&self, value: Item) {
    self.state.rc_deref_mut().active += 1;
    let inner = (self.project)(value);
    inner.subscribe_within(self.observer.subscription(), InnerObserver(self.clone()));
  }

  fn inner_done(&self) {
    let queued = {
      let mut st = self.state.rc_deref_mut();
      st.active -= 1;
      st.buffer.pop_front()
    };
    match queued {
      Some(value) => self.subscribe_inner(value),
      None => self.complete_if_idle(),
    }
  }

  fn complete_if_idle(&self) {
    let idle = {
      let st = self.state.rc_deref();
      st.outer_done && st.active == 0 && st.buffer.is_empty()
    };
    if idle {
      self.observer.complete();
    }
  }
}

impl<Item: 'static, Out: 'static, Err: 'static> Observer<Item, Err> for MergeMap<Item, Out, Err> {
  fn next(&mut self, value: Item) {
    let value = {
      let mut st = self.state.rc_deref_mut();
      if st.active >= self.limit {
        st.buffer.push_back(value);
        None
      } else {
        Some(value)
      }
    };
    if let Some(value) = value {
      self.subscribe_inner(value);
    }
  }

  #[inline]
  fn error(&mut self, err: Err) { self.observer.error(err) }

  fn complete(&mut self) {
    self.state.rc_deref_mut().outer_done = true;
    self.complete_if_idle();
  }
}

struct InnerObserver<Item, Out, Err>(MergeMap<Item, Out, Err>);

impl<Item: 'static, Out: 'static, Err: 'static> Observer<Out, Err> for InnerObserver<Item, Out, Err> {
  #[inline]
  fn next(&mut self, value: Out) { self.0.observer.next(value) }

  #[inline]
  fn error(&mut self, err: Err) { self.0.observer.error(err) }

  #[inline]
  fn complete(&mut self) { self.0.inner_done() }
}
