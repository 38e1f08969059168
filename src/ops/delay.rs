use crate::{
  scheduler::{Duration, Scheduler, Task},
  subject::Subject,
  subscriber::Subscriber,
};

/// Shifts every event, values, errors and completion alike, `period` later.
///
/// Events due at the same instant keep the order they arrived in.
pub fn delay<A, Err, S>(
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
      let (on_next, on_error, on_complete) = (result.clone(), result.clone(), result.clone());
      let (s1, s2, s3) = (scheduler.clone(), scheduler.clone(), scheduler);
      source.subscribe_all(
        Subscriber::default()
          .on_next(move |v| {
            let target = on_next.clone();
            s1.schedule(Task::once(move || target.emit(v)), Some(period));
          })
          .on_error(move |err| {
            let target = on_error.clone();
            s2.schedule(Task::once(move || target.error(err)), Some(period));
          })
          .on_complete(move || {
            let target = on_complete.clone();
            s3.schedule(Task::once(move || target.complete()), Some(period));
          }),
      );
    })
  }
}

#[cfg(test)]
mod tests {
  use crate::{ops::test_util::Recorder, prelude::*};

  fn ms(n: u64) -> Duration { Duration::from_millis(n) }

  #[test]
  fn shifts_every_event() {
    TestScheduler::init();
    let source = Subject::<i32>::new();
    let delayed = ops::delay(ms(50), TestScheduler)(source.clone());
    let recorder = Recorder::attach(&delayed);

    source.emit(1);
    TestScheduler::advance_by(ms(20));
    source.error(StreamError::msg("late"));
    source.complete();
    assert!(recorder.events().is_empty());

    TestScheduler::advance_by(ms(30));
    assert_eq!(recorder.events(), vec!["1"]);

    TestScheduler::advance_by(ms(20));
    assert_eq!(recorder.events(), vec!["1", "error: late", "complete"]);
  }

  #[test]
  fn synchronous_burst_keeps_order() {
    TestScheduler::init();
    let delayed = of![1, 2, 3].delay(ms(10), TestScheduler);
    let recorder = Recorder::attach(&delayed);
    assert_eq!(TestScheduler::pending_count(), 4);

    TestScheduler::advance_by(ms(10));
    assert_eq!(recorder.events(), vec!["1", "2", "3", "complete"]);
  }
}
