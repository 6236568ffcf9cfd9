//! # rxstream: a single-threaded Reactive Extensions engine
//!
//! Lazy push-based [`Observable`]s, multicast [`Subject`]s, composable
//! [`Subscription`]s and the operators needed to combine them, all on one
//! thread with no runtime of its own.
//!
//! ## Quick Start
//!
//! ```rust
//! use rxstream::prelude::*;
//!
//! Observable::<_, Infallible>::from_iter(0..10)
//!   .filter(|v| v % 2 == 0)
//!   .map(|v| v * 2)
//!   .subscribe(|v| println!("Value: {v}"));
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observable`] | A producer, re-run for every subscription |
//! | [`Observer`] | Consumes `next`, `error`, and `complete` notifications |
//! | [`Subscription`] | Handle to cancel an active subscription |
//! | [`Subject`] | Observer and multicast observable at once |
//! | [`Scheduler`] | Injected clock that time-based producers register with |
//!
//! Time never passes on its own: `interval`, `timer` and windowed replay
//! subjects register callbacks with a [`Scheduler`], and the owner of the
//! scheduler decides when they run. Tests use the virtual-time
//! [`TestScheduler`](scheduler::TestScheduler).
//!
//! ## Feature Flags
//!
//! - **`stream`** (default): `Observable::into_stream`, a bridge to
//!   `futures::Stream`.
//!
//! [`Observable`]: observable::Observable
//! [`Observer`]: observer::Observer
//! [`Subscription`]: subscription::Subscription
//! [`Subject`]: subject::Subject
//! [`Scheduler`]: scheduler::Scheduler

pub mod config;
pub mod error;
pub mod event;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod rc;
pub mod scheduler;
pub mod subject;
pub mod subscriber;
pub mod subscription;
