use super::Start;
use crate::{
  scheduler::{Duration, Scheduler, Task, TaskState},
  subject::Subject,
};

/// Emits `0, 1, 2, ..` once per `period`, the first value one period after
/// the stream starts.
///
/// With `count` set, the stream completes on the tick following the last
/// value; without it, it runs until completed from outside.
pub fn interval<S: Scheduler>(
  period: Duration, start: Start, count: Option<usize>, scheduler: S,
) -> Subject<usize> {
  start.build(move |subject| {
    let target = subject.clone();
    let mut idx = 0;
    scheduler.schedule(
      Task::repeating(move || {
        if target.is_completed() {
          return TaskState::Finished;
        }
        if count.is_some_and(|count| idx >= count) {
          target.complete();
          return TaskState::Finished;
        }
        target.emit(idx);
        idx += 1;
        TaskState::Sleeping(period)
      }),
      Some(period),
    );
  })
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::{observable::Start, prelude::*};

  #[test]
  fn counts_once_per_period() {
    TestScheduler::init();
    let seen = Rc::new(RefCell::new(vec![]));
    let s = seen.clone();
    let ticks =
      observable::interval(Duration::from_millis(10), Start::OnSubscribe, Some(3), TestScheduler);
    ticks.subscribe(move |v| s.borrow_mut().push(v));
    assert!(seen.borrow().is_empty());

    TestScheduler::advance_by(Duration::from_millis(25));
    assert_eq!(*seen.borrow(), vec![0, 1]);

    TestScheduler::advance_by(Duration::from_millis(5));
    assert_eq!(*seen.borrow(), vec![0, 1, 2]);
    assert!(!ticks.is_completed());

    TestScheduler::advance_by(Duration::from_millis(10));
    assert!(ticks.is_completed());
  }

  #[test]
  fn unbounded_interval_runs_until_completed() {
    TestScheduler::init();
    let ticks = observable::interval(Duration::from_millis(1), Start::Now, None, TestScheduler);
    TestScheduler::advance_by(Duration::from_millis(100));
    assert_eq!(ticks.value(), Some(99));
    assert!(!ticks.is_completed());

    ticks.complete();
    TestScheduler::flush();
    assert!(TestScheduler::is_empty());
  }
}
