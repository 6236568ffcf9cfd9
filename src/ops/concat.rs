use crate::observable::Observable;

/// Subscribes to the sources one after another, each once the previous one
/// has completed.
///
/// An error from the active source is forwarded and ends the chain.
pub fn concat<Item: 'static, Err: 'static>(sources: Vec<Observable<Item, Err>>) -> Observable<Item, Err> {
  Observable::from_iter(sources).concat_map(|source| source)
}

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  pub fn concat_with(self, other: Observable<Item, Err>) -> Self { concat(vec![self, other]) }
}
