//! # rxsignal: multicast streams and signals
//!
//! A single-threaded reactive core: a multicast [`Subject`] with replay-one
//! semantics, composable operators over it, and [`Signal`]s whose derived
//! values and effects track their dependencies automatically.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//!
//! use rxsignal::prelude::*;
//!
//! let seen = Rc::new(RefCell::new(vec![]));
//! let s = seen.clone();
//! observable::range(0, 10)
//!   .filter(|v, _| v % 2 == 0)
//!   .map(|v| v * 2)
//!   .subscribe(move |v| s.borrow_mut().push(v));
//! assert_eq!(*seen.borrow(), vec![0, 4, 8, 12, 16]);
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Subject`] | Multicast stream caching its last value and error |
//! | [`Observable`] | Capability shared by subjects and signals |
//! | [`Subscriber`] | Consumes `next`, `error`, and `complete` events |
//! | [`Subscription`] | Handle detaching one subscriber |
//! | [`Signal`] | Reactive value with automatic dependency tracking |
//! | [`Scheduler`] | Timers for the time-shaping operators |
//!
//! ## Feature Flags
//!
//! - **`scheduler`** (default): tokio-based [`LocalScheduler`]
//!
//! [`Subject`]: subject::Subject
//! [`Observable`]: observable::Observable
//! [`Subscriber`]: subscriber::Subscriber
//! [`Subscription`]: subscription::Subscription
//! [`Signal`]: signal::Signal
//! [`Scheduler`]: scheduler::Scheduler
//! [`LocalScheduler`]: scheduler::LocalScheduler

pub mod error;
pub mod observable;
pub mod ops;
pub mod pipe;
pub mod prelude;
pub mod rc;
pub mod scheduler;
pub mod signal;
pub mod subject;
pub mod subscriber;
pub mod subscription;

pub use prelude::*;

#[cfg(doctest)]
mod readme {
  #![doc = include_str!("../README.md")]
}
