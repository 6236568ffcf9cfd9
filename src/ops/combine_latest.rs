use crate::{observable::Observable, observer::Observer, rc::MutRc, subscriber::Subscriber};

/// Emits the latest value of every source each time any of them emits, once
/// all of them have emitted at least once.
///
/// Completes when every source has completed.
pub fn combine_latest<Item, Err>(sources: Vec<Observable<Item, Err>>) -> Observable<Vec<Item>, Err>
where
  Item: Clone + 'static,
  Err: 'static,
{
  Observable::create(move |subscriber| {
    if sources.is_empty() {
      subscriber.complete();
      return Ok(());
    }
    let state = MutRc::own(LatestState { latest: vec![None; sources.len()], active: sources.len() });
    for (index, source) in sources.iter().enumerate() {
      if subscriber.is_closed() {
        break;
      }
      let observer = CombineLatestObserver { index, state: state.clone(), observer: subscriber.clone() };
      source.subscribe_within(subscriber.subscription(), observer);
    }
    Ok(())
  })
}

struct LatestState<Item> {
  latest: Vec<Option<Item>>,
  active: usize,
}

struct CombineLatestObserver<Item, Err> {
  index: usize,
  state: MutRc<LatestState<Item>>,
  observer: Subscriber<Vec<Item>, Err>,
}

impl<Item: Clone, Err> Observer<Item, Err> for CombineLatestObserver<Item, Err> {
  fn next(&mut self, value: Item) {
    let row = {
      let mut st = self.state.rc_deref_mut();
      st.latest[self.index] = Some(value);
      st.latest.iter().cloned().collect::<Option<Vec<_>>>()
    };
    if let Some(row) = row {
      self.observer.next(row);
    }
  }

  #[inline]
  fn error(&mut self, err: Err) { self.observer.error(err) }

  fn complete(&mut self) {
    let all_done = {
      let mut st = self.state.rc_deref_mut();
      st.active -= 1;
      st.active == 0
    };
    if all_done {
      self.observer.complete();
    }
  }
}
