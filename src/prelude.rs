//! Prelude module for convenient imports

pub use crate::of;
// Errors
pub use crate::error::StreamError;
// Core traits and creation
pub use crate::observable::{self, Observable, ObservableExt, Start};
// Operators
pub use crate::ops;
pub use crate::pipe::{compose, pipe, Operator};
// Scheduler
#[cfg(feature = "scheduler")]
pub use crate::scheduler::LocalScheduler;
pub use crate::scheduler::{Duration, Scheduler, Task, TaskHandle, TaskState, TestScheduler};
// Signals
pub use crate::signal::{untracked, Signal};
// Subject
pub use crate::subject::{ErrorDelivery, Subject};
// Subscriber and subscriptions
pub use crate::subscriber::Subscriber;
pub use crate::subscription::{Disposer, Subscription, SubscriptionLike};
