//! Throttle operator
//!
//! Behavior summary:
//! - A value arriving at least `period` after the last emission (or before any
//!   emission at all) is emitted at once. This is the leading edge.
//! - A value arriving sooner replaces the pending value, and a trailing timer
//!   is armed for the moment the period runs out.
//! - When the trailing timer fires, the pending value is emitted and the
//!   period restarts from that moment.
//! - Completion of the source waits for a pending trailing value.
//! - Errors are forwarded immediately.

use crate::{
  rc::{MutRc, RcDerefMut},
  scheduler::{Duration, Scheduler, Task, TaskHandle},
  subject::Subject,
  subscriber::Subscriber,
};

struct ThrottleState<A> {
  last_emission: Option<Duration>,
  pending: Option<A>,
  trailing: Option<TaskHandle>,
  source_done: bool,
}

impl<A> ThrottleState<A> {
  fn cancel_trailing(&mut self) {
    if let Some(handle) = self.trailing.take() {
      handle.cancel();
    }
  }
}

/// Emits at most one value per `period`, keeping the first and the latest
/// value of every burst.
///
/// ```rust
/// use std::{cell::RefCell, rc::Rc};
///
/// use rxsignal::prelude::*;
///
/// TestScheduler::init();
/// let seen = Rc::new(RefCell::new(vec![]));
/// let s = seen.clone();
/// of![1, 2, 3, 4]
///   .throttle(Duration::from_millis(100), TestScheduler)
///   .subscribe(move |v| s.borrow_mut().push(v));
/// assert_eq!(*seen.borrow(), vec![1]);
///
/// TestScheduler::advance_by(Duration::from_millis(100));
/// assert_eq!(*seen.borrow(), vec![1, 4]);
/// ```
pub fn throttle<A, Err, S>(
  period: Duration, scheduler: S,
) -> impl Fn(Subject<A, Err>) -> Subject<A, Err>
where
  A: Clone + 'static,
  Err: Clone + 'static,
  S: Scheduler,
{
  move |source| {
    let scheduler = scheduler.clone();
    Subject::cold(move |result| {
      let state = MutRc::own(ThrottleState {
        last_emission: None,
        pending: None,
        trailing: None,
        source_done: false,
      });
      let (on_next, on_error, on_complete) = (result.clone(), result.clone(), result.clone());
      let next_state = state.clone();
      source.subscribe_all(
        Subscriber::default()
          .on_next(move |v| {
            let now = scheduler.elapsed();
            {
              let mut state = next_state.rc_deref_mut();
              let since_last = state.last_emission.map(|last| now.saturating_sub(last));
              match since_last {
                Some(since) if since < period => {
                  state.pending = Some(v);
                  state.cancel_trailing();
                  let fire = trailing_edge(next_state.clone(), on_next.clone(), scheduler.clone());
                  state.trailing = Some(scheduler.schedule(fire, Some(period - since)));
                  return;
                }
                _ => {
                  state.cancel_trailing();
                  state.pending = None;
                  state.last_emission = Some(now);
                }
              }
            }
            on_next.emit(v);
          })
          .on_error(move |err| on_error.error(err))
          .on_complete(move || {
            {
              let mut state = state.rc_deref_mut();
              state.source_done = true;
              if state.pending.is_some() {
                tracing::debug!("throttle completion waits for the trailing value");
                return;
              }
              state.cancel_trailing();
            }
            on_complete.complete();
          }),
      );
    })
  }
}

fn trailing_edge<A, Err, S>(
  state: MutRc<ThrottleState<A>>, result: Subject<A, Err>, scheduler: S,
) -> Task
where
  A: Clone + 'static,
  Err: Clone + 'static,
  S: Scheduler,
{
  Task::once(move || {
    if result.is_completed() {
      return;
    }
    let (pending, done) = {
      let mut state = state.rc_deref_mut();
      state.trailing = None;
      let pending = state.pending.take();
      if pending.is_some() {
        state.last_emission = Some(scheduler.elapsed());
      }
      (pending, state.source_done)
    };
    if let Some(v) = pending {
      result.emit(v);
    }
    if done {
      result.complete();
    }
  })
}
