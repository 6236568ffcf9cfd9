use std::collections::VecDeque;

use crate::{observable::Observable, observer::Observer, rc::MutRc, subscriber::Subscriber};

/// Pairs up the sources' values by index.
///
/// Each source gets a FIFO buffer. Whenever every buffer holds a value, the
/// heads are removed and emitted together. Completes as soon as a completed
/// source has an empty buffer, since no further row can be built.
pub fn zip<Item: 'static, Err: 'static>(sources: Vec<Observable<Item, Err>>) -> Observable<Vec<Item>, Err> {
  Observable::create(move |subscriber| {
    if sources.is_empty() {
      subscriber.complete();
      return Ok(());
    }
    let state = MutRc::own(ZipState {
      buffers: sources.iter().map(|_| VecDeque::new()).collect(),
      completed: vec![false; sources.len()],
    });
    for (index, source) in sources.iter().enumerate() {
      if subscriber.is_closed() {
        break;
      }
      let observer = ZipObserver { index, state: state.clone(), observer: subscriber.clone() };
      source.subscribe_within(subscriber.subscription(), observer);
    }
    Ok(())
  })
}

struct ZipState<Item> {
  buffers: Vec<VecDeque<Item>>,
  completed: Vec<bool>,
}

impl<Item> ZipState<Item> {
  fn exhausted(&self) -> bool { self.buffers.iter().zip(&self.completed).any(|(b, done)| *done && b.is_empty()) }
}

struct ZipObserver<Item, Err> {
  index: usize,
  state: MutRc<ZipState<Item>>,
  observer: Subscriber<Vec<Item>, Err>,
}

impl<Item, Err> Observer<Item, Err> for ZipObserver<Item, Err> {
  fn next(&mut self, value: Item) {
    let (row, exhausted) = {
      let mut st = self.state.rc_deref_mut();
      st.buffers[self.index].push_back(value);
      if st.buffers.iter().all(|b| !b.is_empty()) {
        let row: Vec<Item> = st.buffers.iter_mut().filter_map(VecDeque::pop_front).collect();
        (Some(row), st.exhausted())
      } else {
        (None, false)
      }
    };
    if let Some(row) = row {
      self.observer.next(row);
      if exhausted {
        self.observer.complete();
      }
    }
  }

  #[inline]
  fn error(&mut self, err: Err) { self.observer.error(err) }

  fn complete(&mut self) {
    let exhausted = {
      let mut st = self.state.rc_deref_mut();
      st.completed[self.index] = true;
      st.buffers[self.index].is_empty()
    };
    if exhausted {
      self.observer.complete();
    }
  }
}
