//! Operators and combinators.
//!
//! Unary operators are inherent methods on [`Observable`]: each takes the
//! source by value and returns a new, lazy observable whose producer
//! subscribes to the source with a wrapping observer, once per subscription.
//! Per-subscription state (counters, accumulators, buffers) lives in that
//! observer, so two subscriptions never share it.
//!
//! Combinators over several sources are free functions taking a `Vec` of
//! observables; the ones that join values emit a `Vec` with one slot per
//! source, in source order.
//!
//! Errors raised by user callbacks (`try_map`, `try_filter`, `try_scan`) and
//! errors from any source are forwarded downstream, which closes the
//! downstream subscription and with it every upstream and inner subscription
//! the operator created.

use crate::{observable::Observable, observer::Observer, subscriber::Subscriber};

mod combine_latest;
mod concat;
mod filter;
mod fork_join;
#[cfg(feature = "stream")]
mod into_stream;
mod map;
mod merge;
mod merge_map;
mod pairwise;
mod partition;
mod race;
mod scan;
mod share;
mod skip_until;
mod switch_map;
mod take;
mod zip;

pub use combine_latest::combine_latest;
pub use concat::concat;
pub use fork_join::fork_join;
#[cfg(feature = "stream")]
pub use into_stream::ObservableStream;
pub use merge::merge;
pub use partition::partition;
pub use race::race;
pub use zip::zip;

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Builds an operator from a function turning the downstream subscriber
  /// into the observer subscribed to `self`.
  ///
  /// The upstream subscription is a child of the downstream one, registered
  /// before `self`'s producer runs.
  pub(crate) fn lift<Out, O>(self, wrap: impl Fn(Subscriber<Out, Err>) -> O + 'static) -> Observable<Out, Err>
  where
    Out: 'static,
    O: Observer<Item, Err> + 'static,
  {
    Observable::create(move |subscriber| {
      let observer = wrap(subscriber.clone());
      self.subscribe_within(subscriber.subscription(), observer);
      Ok(())
    })
  }
}
