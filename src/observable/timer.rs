use super::Start;
use crate::{
  scheduler::{Duration, Scheduler, Task, TaskState},
  subject::Subject,
};

/// Emits `values` one `period` apart, the first one as soon as the stream
/// starts, and completes one `period` after the last value.
///
/// The timer stops early if the stream is completed from outside.
///
/// ```rust
/// use std::{cell::RefCell, rc::Rc};
///
/// use rxsignal::prelude::*;
///
/// TestScheduler::init();
/// let seen = Rc::new(RefCell::new(vec![]));
/// let s = seen.clone();
/// observable::from_timer(Duration::from_millis(10), [1, 2], Start::OnSubscribe, TestScheduler)
///   .subscribe(move |v| s.borrow_mut().push(v));
/// assert_eq!(*seen.borrow(), vec![1]);
///
/// TestScheduler::advance_by(Duration::from_millis(10));
/// assert_eq!(*seen.borrow(), vec![1, 2]);
/// ```
pub fn from_timer<Iter, S>(
  period: Duration, values: Iter, start: Start, scheduler: S,
) -> Subject<Iter::Item>
where
  Iter: IntoIterator,
  Iter::IntoIter: 'static,
  Iter::Item: Clone + 'static,
  S: Scheduler,
{
  let mut values = values.into_iter();
  start.build(move |subject| {
    if let Some(first) = values.next() {
      subject.emit(first);
    }
    let target = subject.clone();
    scheduler.schedule(
      Task::repeating(move || {
        if target.is_completed() {
          return TaskState::Finished;
        }
        match values.next() {
          Some(v) => {
            target.emit(v);
            TaskState::Sleeping(period)
          }
          None => {
            target.complete();
            TaskState::Finished
          }
        }
      }),
      Some(period),
    );
  })
}
