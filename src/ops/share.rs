use crate::{
  observable::Observable, observer::Observer, rc::MutRc, subject::Subject, subscription::Subscription,
};

struct Connection<Item, Err> {
  id: u64,
  subject: Subject<Item, Err>,
  upstream: Subscription,
  subscribers: usize,
}

struct ShareState<Item, Err> {
  next_id: u64,
  current: Option<Connection<Item, Err>>,
}

impl<Item: Clone + 'static, Err: Clone + 'static> Observable<Item, Err> {
  /// Multicasts the source through a [`Subject`] while at least one
  /// subscriber is present.
  ///
  /// The first subscriber connects to the source; later ones join the
  /// running execution. When the last subscriber leaves, or the source
  /// terminates, the connection is dropped and the next subscriber starts a
  /// fresh one.
  pub fn share(self) -> Self {
    let state = MutRc::own(ShareState { next_id: 0, current: None });
    Observable::create(move |subscriber| {
      let (id, subject, connect) = {
        let mut st = state.rc_deref_mut();
        match st.current.as_mut() {
          Some(conn) => {
            conn.subscribers += 1;
            (conn.id, conn.subject.clone(), None)
          }
          None => {
            let id = st.next_id;
            st.next_id += 1;
            let subject = Subject::new();
            let upstream = Subscription::new();
            st.current =
              Some(Connection { id, subject: subject.clone(), upstream: upstream.clone(), subscribers: 1 });
            (id, subject, Some(upstream))
          }
        }
      };

      if let Some(terminal) = subject.register(&subscriber) {
        terminal.deliver(&subscriber);
      }
      let weak = state.downgrade();
      subscriber.add_teardown(move || {
        let Some(state) = weak.upgrade() else { return };
        let released = {
          let mut st = state.rc_deref_mut();
          match st.current.as_mut() {
            Some(conn) if conn.id == id => {
              conn.subscribers -= 1;
              if conn.subscribers == 0 { st.current.take() } else { None }
            }
            _ => None,
          }
        };
        if let Some(conn) = released {
          tracing::trace!(connection = id, "share disconnected");
          conn.upstream.unsubscribe();
        }
      });

      if let Some(upstream) = connect {
        let observer = ShareObserver { id, subject, state: state.clone() };
        self.subscribe_into(upstream, observer);
      }
      Ok(())
    })
  }
}

struct ShareObserver<Item, Err> {
  id: u64,
  subject: Subject<Item, Err>,
  state: MutRc<ShareState<Item, Err>>,
}

impl<Item, Err> ShareObserver<Item, Err> {
  fn reset(&self) {
    let released = {
      let mut st = self.state.rc_deref_mut();
      match &st.current {
        Some(conn) if conn.id == self.id => st.current.take(),
        _ => None,
      }
    };
    drop(released);
  }
}

impl<Item: Clone + 'static, Err: Clone + 'static> Observer<Item, Err> for ShareObserver<Item, Err> {
  #[inline]
  fn next(&mut self, value: Item) { self.subject.next(value) }

  fn error(&mut self, err: Err) {
    self.reset();
    self.subject.error(err);
  }

  fn complete(&mut self) {
    self.reset();
    self.subject.complete();
  }
}
