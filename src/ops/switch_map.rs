use std::rc::Rc;

use crate::{
  observable::Observable, observer::Observer, rc::MutRc, subscriber::Subscriber, subscription::Subscription,
};

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Maps every value to an inner observable, unsubscribing the previous
  /// inner observable before subscribing to the new one.
  ///
  /// Completes once the source and the current inner observable have
  /// completed.
  pub fn switch_map<Out: 'static>(
    self,
    project: impl Fn(Item) -> Observable<Out, Err> + 'static,
  ) -> Observable<Out, Err> {
    let project: Rc<dyn Fn(Item) -> Observable<Out, Err>> = Rc::new(project);
    self.lift(move |observer| SwitchMap {
      observer,
      project: project.clone(),
      state: MutRc::own(SwitchState { generation: 0, inner: None, outer_done: false }),
    })
  }
}

struct SwitchState {
  // Bumped for every new inner observable; stale inners compare unequal.
  generation: u64,
  inner: Option<Subscription>,
  outer_done: bool,
}

struct SwitchMap<Item, Out, Err> {
  observer: Subscriber<Out, Err>,
  project: Rc<dyn Fn(Item) -> Observable<Out, Err>>,
  state: MutRc<SwitchState>,
}

impl<Item: 'static, Out: 'static, Err: 'static> Observer<Item, Err> for SwitchMap<Item, Out, Err> {
  fn next(&mut self, value: Item) {
    let inner = Subscription::new();
    let (generation, previous) = {
      let mut st = self.state.rc_deref_mut();
      st.generation += 1;
      (st.generation, st.inner.replace(inner.clone()))
    };
    if let Some(previous) = previous {
      previous.unsubscribe();
    }

    self.observer.add(inner.clone());
    let observer = SwitchInner { generation, observer: self.observer.clone(), state: self.state.clone() };
    (self.project)(value).subscribe_into(inner, observer);
  }

  #[inline]
  fn error(&mut self, err: Err) { self.observer.error(err) }

  fn complete(&mut self) {
    let idle = {
      let mut st = self.state.rc_deref_mut();
      st.outer_done = true;
      st.inner.is_none()
    };
    if idle {
      self.observer.complete();
    }
  }
}

struct SwitchInner<Out, Err> {
  generation: u64,
  observer: Subscriber<Out, Err>,
  state: MutRc<SwitchState>,
}

impl<Out, Err> SwitchInner<Out, Err> {
  fn is_current(&self) -> bool { self.state.rc_deref().generation == self.generation }
}

impl<Out, Err> Observer<Out, Err> for SwitchInner<Out, Err> {
  fn next(&mut self, value: Out) {
    if self.is_current() {
      self.observer.next(value);
    }
  }

  fn error(&mut self, err: Err) {
    if self.is_current() {
      self.observer.error(err);
    }
  }

  fn complete(&mut self) {
    let finished = {
      let mut st = self.state.rc_deref_mut();
      if st.generation != self.generation {
        return;
      }
      st.inner = None;
      st.outer_done
    };
    if finished {
      self.observer.complete();
    }
  }
}
