use futures::future::LocalBoxFuture;
use once_cell::sync::Lazy;
use tokio::time::Instant;

use super::{Cancellable, Duration, Scheduler, Task, TaskHandle, TaskState};

static ORIGIN: Lazy<Instant> = Lazy::new(Instant::now);

/// Tokio-backed scheduler for the current thread.
///
/// Tasks and futures are started with `tokio::task::spawn_local`, so this
/// scheduler must be used from within a `tokio::task::LocalSet`.
///
/// ```rust,no_run
/// use rxsignal::prelude::*;
///
/// # async fn run() {
/// let local = tokio::task::LocalSet::new();
/// local
///   .run_until(async {
///     let period = Duration::from_millis(10);
///     let ticks = observable::interval(period, Start::OnSubscribe, Some(3), LocalScheduler);
///     ticks.subscribe(|v| println!("tick {v}"));
///     tokio::time::sleep(Duration::from_millis(50)).await;
///   })
///   .await;
/// # }
/// ```
#[derive(Clone, Copy, Default, Debug)]
pub struct LocalScheduler;

impl Scheduler for LocalScheduler {
  fn schedule(&self, mut task: Task, delay: Option<Duration>) -> TaskHandle {
    let handle = TaskHandle::new();
    let task_handle = handle.clone();
    tokio::task::spawn_local(async move {
      if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
      }
      loop {
        if task_handle.is_closed() {
          return;
        }
        match task.step() {
          TaskState::Finished => {
            task_handle.mark_finished();
            return;
          }
          TaskState::Sleeping(duration) => tokio::time::sleep(duration).await,
        }
      }
    });
    handle
  }

  fn spawn(&self, future: LocalBoxFuture<'static, ()>) -> TaskHandle {
    let handle = TaskHandle::new();
    tokio::task::spawn_local(Cancellable::new(future, handle.clone()));
    handle
  }

  fn elapsed(&self) -> Duration { ORIGIN.elapsed() }
}
