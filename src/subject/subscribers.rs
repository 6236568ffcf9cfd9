use crate::subscriber::Subscriber;

/// Observer list of a subject, keyed by a per-subject id so that an
/// unsubscribing observer can find and remove its own entry.
pub(crate) struct Subscribers<Item, Err> {
  next_id: usize,
  entries: Vec<(usize, Subscriber<Item, Err>)>,
}

impl<Item, Err> Default for Subscribers<Item, Err> {
  fn default() -> Self { Self { next_id: 0, entries: vec![] } }
}

impl<Item, Err> Subscribers<Item, Err> {
  pub(crate) fn add(&mut self, subscriber: Subscriber<Item, Err>) -> usize {
    let id = self.next_id;
    self.next_id += 1;
    self.entries.push((id, subscriber));
    id
  }

  pub(crate) fn remove(&mut self, id: usize) -> Option<Subscriber<Item, Err>> {
    let pos = self.entries.iter().position(|(i, _)| *i == id)?;
    Some(self.entries.remove(pos).1)
  }

  #[inline]
  pub(crate) fn len(&self) -> usize { self.entries.len() }

  /// Copy of the current list, in subscription order.
  pub(crate) fn snapshot(&self) -> Vec<Subscriber<Item, Err>> {
    self.entries.iter().map(|(_, s)| s.clone()).collect()
  }

  /// Empties the list, returning its former content.
  pub(crate) fn take_all(&mut self) -> Vec<Subscriber<Item, Err>> {
    std::mem::take(&mut self.entries).into_iter().map(|(_, s)| s).collect()
  }
}
