use crate::{observable::Observable, observer::Observer, rc::MutRc, subscriber::Subscriber};

/// Waits for every source to complete, then emits their last values once
/// and completes.
///
/// If a source completes without emitting, the result completes right away
/// without emitting and the other sources are unsubscribed.
pub fn fork_join<Item: 'static, Err: 'static>(sources: Vec<Observable<Item, Err>>) -> Observable<Vec<Item>, Err> {
  Observable::create(move |subscriber| {
    if sources.is_empty() {
      subscriber.complete();
      return Ok(());
    }
    let state = MutRc::own(ForkJoinState {
      last: sources.iter().map(|_| None).collect(),
      remaining: sources.len(),
    });
    for (index, source) in sources.iter().enumerate() {
      if subscriber.is_closed() {
        break;
      }
      let observer = ForkJoinObserver { index, state: state.clone(), observer: subscriber.clone() };
      source.subscribe_within(subscriber.subscription(), observer);
    }
    Ok(())
  })
}

struct ForkJoinState<Item> {
  last: Vec<Option<Item>>,
  remaining: usize,
}

struct ForkJoinObserver<Item, Err> {
  index: usize,
  state: MutRc<ForkJoinState<Item>>,
  observer: Subscriber<Vec<Item>, Err>,
}

enum Outcome<Item> {
  Pending,
  Empty,
  Joined(Vec<Item>),
}

impl<Item, Err> Observer<Item, Err> for ForkJoinObserver<Item, Err> {
  fn next(&mut self, value: Item) {
    let replaced = self.state.rc_deref_mut().last[self.index].replace(value);
    drop(replaced);
  }

  #[inline]
  fn error(&mut self, err: Err) { self.observer.error(err) }

  fn complete(&mut self) {
    let outcome = {
      let mut st = self.state.rc_deref_mut();
      if st.last[self.index].is_none() {
        Outcome::Empty
      } else {
        st.remaining -= 1;
        if st.remaining == 0 {
          Outcome::Joined(st.last.iter_mut().filter_map(Option::take).collect())
        } else {
          Outcome::Pending
        }
      }
    };
    match outcome {
      Outcome::Pending => {}
      Outcome::Empty => self.observer.complete(),
      Outcome::Joined(row) => {
        self.observer.next(row);
        self.observer.complete();
      }
    }
  }
}
