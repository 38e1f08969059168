//! Debounce operator
//!
//! Behavior summary:
//! - A value arriving while no timer runs is emitted at once and starts a
//!   repeating timer of the given period.
//! - Values arriving while the timer runs are queued.
//! - Every tick emits the oldest queued value. A tick finding the queue empty
//!   stops the timer.
//! - Completion of the source waits until the queue has drained.
//! - Errors are forwarded immediately and never complete the result.
//!
//! The effect is a rate limit that loses nothing: a burst is spread out to one
//! value per period.

use std::collections::VecDeque;

use crate::{
  rc::{MutRc, RcDerefMut},
  scheduler::{Duration, Scheduler, Task, TaskHandle, TaskState},
  subject::Subject,
  subscriber::Subscriber,
};

struct DebounceState<A> {
  queue: VecDeque<A>,
  timer: Option<TaskHandle>,
  source_done: bool,
}

/// Spreads values out to at most one per `period`, first one immediately.
///
/// ```rust
/// use std::{cell::RefCell, rc::Rc};
///
/// use rxsignal::prelude::*;
///
/// TestScheduler::init();
/// let seen = Rc::new(RefCell::new(vec![]));
/// let s = seen.clone();
/// of![1, 2, 3]
///   .debounce(Duration::from_millis(10), TestScheduler)
///   .subscribe(move |v| s.borrow_mut().push(v));
/// assert_eq!(*seen.borrow(), vec![1]);
///
/// TestScheduler::advance_by(Duration::from_millis(20));
/// assert_eq!(*seen.borrow(), vec![1, 2, 3]);
/// ```
pub fn debounce<A, Err, S>(
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
      let state =
        MutRc::own(DebounceState { queue: VecDeque::new(), timer: None, source_done: false });
      let (on_next, on_error, on_complete) = (result.clone(), result.clone(), result.clone());
      let next_state = state.clone();
      source.subscribe_all(
        Subscriber::default()
          .on_next(move |v| {
            {
              let mut state = next_state.rc_deref_mut();
              if state.timer.is_some() {
                state.queue.push_back(v);
                return;
              }
              let tick = debounce_tick(next_state.clone(), on_next.clone(), period);
              state.timer = Some(scheduler.schedule(tick, Some(period)));
            }
            on_next.emit(v);
          })
          .on_error(move |err| on_error.error(err))
          .on_complete(move || {
            {
              let mut state = state.rc_deref_mut();
              state.source_done = true;
              if state.timer.is_some() {
                tracing::debug!(queued = state.queue.len(), "debounce completion deferred");
                return;
              }
            }
            on_complete.complete();
          }),
      );
    })
  }
}

fn debounce_tick<A, Err>(
  state: MutRc<DebounceState<A>>, result: Subject<A, Err>, period: Duration,
) -> Task
where
  A: Clone + 'static,
  Err: Clone + 'static,
{
  Task::repeating(move || {
    if result.is_completed() {
      let mut state = state.rc_deref_mut();
      state.timer = None;
      state.queue.clear();
      return TaskState::Finished;
    }
    let (next, done) = {
      let mut state = state.rc_deref_mut();
      let next = state.queue.pop_front();
      if next.is_none() {
        state.timer = None;
      }
      (next, state.source_done)
    };
    match next {
      Some(v) => {
        result.emit(v);
        TaskState::Sleeping(period)
      }
      None => {
        if done {
          result.complete();
        }
        TaskState::Finished
      }
    }
  })
}
