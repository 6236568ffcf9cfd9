//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

pub use std::{convert::Infallible, time::Duration};

// Errors and global hooks
pub use crate::{
  config::{StoppedNotification, UnhandledError},
  error::UnsubscriptionError,
};
// Event sources
pub use crate::event::{EventHandler, EventHub, EventSource, RemoveListener};
// Core types
pub use crate::observable::Observable;
pub use crate::observer::{FnMutObserver, Notification, Observer, Sink};
// Combinators
#[cfg(feature = "stream")]
pub use crate::ops::ObservableStream;
pub use crate::ops::{combine_latest, concat, fork_join, merge, partition, race, zip};
// Schedulers
pub use crate::scheduler::{RealTimeScheduler, Scheduler, TestScheduler, TimerHandle};
// Subjects
pub use crate::subject::{AsyncSubject, BehaviorSubject, ReplaySubject, Subject};
pub use crate::subscriber::Subscriber;
pub use crate::subscription::{Subscription, SubscriptionGuard};
