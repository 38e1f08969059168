//! Timers and future execution for time-shaping operators.
//!
//! Every operator that suspends (`debounce`, `throttle`, `delay`,
//! `from_timer`, `interval`, `from_future`, `from_stream`) receives its
//! [`Scheduler`] explicitly. Two are provided:
//!
//! - [`LocalScheduler`] (feature `scheduler`, on by default): tokio timers and
//!   `spawn_local`. Must run inside a `tokio::task::LocalSet`.
//! - [`TestScheduler`]: virtual time for deterministic tests.

use std::{
  cell::Cell,
  future::Future,
  pin::Pin,
  rc::Rc,
  task::{Context, Poll},
};

use futures::future::LocalBoxFuture;
use pin_project_lite::pin_project;

use crate::subscription::{Subscription, SubscriptionLike};

pub use std::time::Duration;

#[cfg(feature = "scheduler")]
mod local_scheduler;
mod test_scheduler;

#[cfg(feature = "scheduler")]
pub use local_scheduler::LocalScheduler;
pub use test_scheduler::TestScheduler;

/// A source of timers and an executor for `!Send` futures.
pub trait Scheduler: Clone + 'static {
  /// Run `task` after `delay` (or as soon as possible). A task returning
  /// [`TaskState::Sleeping`] runs again after that duration.
  fn schedule(&self, task: Task, delay: Option<Duration>) -> TaskHandle;

  /// Drive `future` to completion on this scheduler's timeline.
  fn spawn(&self, future: LocalBoxFuture<'static, ()>) -> TaskHandle;

  /// Time elapsed on this scheduler's clock since its origin.
  fn elapsed(&self) -> Duration;
}

/// What a task wants after one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
  Finished,
  /// Run again after this duration.
  Sleeping(Duration),
}

/// A unit of work handed to a [`Scheduler`].
pub struct Task(Box<dyn FnMut() -> TaskState>);

impl Task {
  /// A task that runs once.
  pub fn once(f: impl FnOnce() + 'static) -> Self {
    let mut f = Some(f);
    Task(Box::new(move || {
      if let Some(f) = f.take() {
        f();
      }
      TaskState::Finished
    }))
  }

  /// A task that decides after every run whether it wants to run again.
  pub fn repeating(f: impl FnMut() -> TaskState + 'static) -> Self { Task(Box::new(f)) }

  #[inline]
  pub fn step(&mut self) -> TaskState { (self.0)() }
}

/// Cancellation handle of a scheduled task or spawned future.
#[derive(Clone, Default)]
pub struct TaskHandle(Rc<Cell<bool>>);

impl TaskHandle {
  pub fn new() -> Self { Self::default() }

  /// Mark the task as done; it will not run again.
  pub fn mark_finished(&self) { self.0.set(true) }

  pub fn cancel(&self) {
    if !self.0.replace(true) {
      tracing::trace!("scheduled task cancelled");
    }
  }

  pub fn is_closed(&self) -> bool { self.0.get() }

  pub fn into_subscription(self) -> Subscription { Subscription::new(self) }
}

impl SubscriptionLike for TaskHandle {
  fn unsubscribe_with(&self, _clear_last_value: bool) { self.cancel() }

  fn is_closed(&self) -> bool { TaskHandle::is_closed(self) }
}

pin_project! {
  /// A future that stops being polled once its [`TaskHandle`] is closed.
  pub struct Cancellable<F> {
    #[pin]
    future: F,
    handle: TaskHandle,
  }
}

impl<F> Cancellable<F> {
  pub fn new(future: F, handle: TaskHandle) -> Self { Self { future, handle } }
}

impl<F: Future<Output = ()>> Future for Cancellable<F> {
  type Output = ();

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
    let this = self.project();
    if this.handle.is_closed() {
      return Poll::Ready(());
    }
    match this.future.poll(cx) {
      Poll::Ready(()) => {
        this.handle.mark_finished();
        Poll::Ready(())
      }
      Poll::Pending => Poll::Pending,
    }
  }
}
