use std::{cell::Cell, rc::Rc};

use crate::{
  observable::Observable, observer::Observer, rc::MutRc, subscriber::Subscriber, subscription::Subscription,
};

/// Mirrors the first source to emit any notification.
///
/// All sources are subscribed in order; as soon as one of them sends a
/// value, an error or a completion, every other source is unsubscribed and
/// only the winner is forwarded from then on.
pub fn race<Item: 'static, Err: 'static>(sources: Vec<Observable<Item, Err>>) -> Observable<Item, Err> {
  Observable::create(move |subscriber| {
    let winner = Rc::new(Cell::new(None));
    let contenders = MutRc::own(Vec::with_capacity(sources.len()));
    for (index, source) in sources.iter().enumerate() {
      if winner.get().is_some() || subscriber.is_closed() {
        break;
      }
      let subscription = Subscription::new();
      subscriber.add(subscription.clone());
      contenders.rc_deref_mut().push(subscription.clone());
      let observer = RaceObserver {
        index,
        winner: winner.clone(),
        contenders: contenders.clone(),
        observer: subscriber.clone(),
      };
      source.subscribe_into(subscription, observer);
    }
    Ok(())
  })
}

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  pub fn race_with(self, other: Observable<Item, Err>) -> Self { race(vec![self, other]) }
}

struct RaceObserver<Item, Err> {
  index: usize,
  winner: Rc<Cell<Option<usize>>>,
  contenders: MutRc<Vec<Subscription>>,
  observer: Subscriber<Item, Err>,
}

impl<Item, Err> RaceObserver<Item, Err> {
  /// Whether this source may forward, claiming the win if nobody has.
  fn claim(&self) -> bool {
    match self.winner.get() {
      Some(winner) => winner == self.index,
      None => {
        self.winner.set(Some(self.index));
        let losers: Vec<_> = {
          let contenders = self.contenders.rc_deref();
          contenders.iter().enumerate().filter(|(i, _)| *i != self.index).map(|(_, s)| s.clone()).collect()
        };
        tracing::trace!(winner = self.index, "race settled");
        losers.iter().for_each(Subscription::unsubscribe);
        true
      }
    }
  }
}

impl<Item, Err> Observer<Item, Err> for RaceObserver<Item, Err> {
  fn next(&mut self, value: Item) {
    if self.claim() {
      self.observer.next(value);
    }
  }

  fn error(&mut self, err: Err) {
    if self.claim() {
      self.observer.error(err);
    }
  }

  fn complete(&mut self) {
    if self.claim() {
      self.observer.complete();
    }
  }
}
