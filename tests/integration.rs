//! Integration tests for rxsignal
//!
//! Exercises operator chains, fan-in, flattening, signals and the schedulers
//! through the public API only.

use std::{cell::RefCell, rc::Rc};

use futures::channel::oneshot;
use rxsignal::{compose, pipe, prelude::*};

fn ms(n: u64) -> Duration { Duration::from_millis(n) }

fn collect<T: Clone + 'static>(stream: &Subject<T>) -> Rc<RefCell<Vec<T>>> {
  let out = Rc::new(RefCell::new(vec![]));
  let o = out.clone();
  stream.subscribe(move |v| o.borrow_mut().push(v));
  out
}

fn completed_flag<T: Clone + 'static>(stream: &Subject<T>) -> Rc<RefCell<bool>> {
  let done = Rc::new(RefCell::new(false));
  let d = done.clone();
  stream.subscribe_all(Subscriber::default().on_complete(move || *d.borrow_mut() = true));
  done
}

#[test]
fn test_basic_chain_integration() {
  let result = collect(
    &observable::range(1, 10)
      .map(|x: i32| x * 2)
      .filter(|&x, _| x > 10),
  );
  assert_eq!(*result.borrow(), vec![12, 14, 16, 18, 20]);
}

#[test]
fn test_running_total_with_reduce() {
  let result = collect(&of![1, 2, 3, 4].reduce(|acc, v| acc + v, 0));
  assert_eq!(*result.borrow(), vec![1, 3, 6, 10]);
}

#[test]
fn test_subject_broadcasting() {
  let subject = Subject::<i32>::new();
  let mapped = collect(&subject.map(|x| x * 10).filter(|&x, _| x > 10));
  let direct = collect(&subject);

  for v in 1..=3 {
    subject.emit(v);
  }
  assert_eq!(*mapped.borrow(), vec![20, 30]);
  assert_eq!(*direct.borrow(), vec![1, 2, 3]);
}

#[test]
fn test_late_subscriber_gets_the_last_value_only() {
  let subject = Subject::with_value(1);
  subject.emit(2);
  let late = collect(&subject);
  subject.emit(3);
  assert_eq!(*late.borrow(), vec![2, 3]);
}

#[test]
fn test_completed_subject_ignores_emits_and_subscribers() {
  let subject = Subject::<i32>::new();
  let seen = collect(&subject);
  subject.emit(1);
  subject.complete();
  subject.emit(2);
  assert_eq!(*seen.borrow(), vec![1]);

  let subscription = subject.subscribe(|_| unreachable!());
  assert!(subscription.is_closed());
}

#[test]
fn test_duplicate_subscriber_is_kept_once() {
  let subject = Subject::<i32>::new();
  let hits = Rc::new(RefCell::new(0));
  let h = hits.clone();
  let subscriber = Subscriber::from_next(move |_| *h.borrow_mut() += 1);
  let first = subject.subscribe_all(subscriber.clone());
  let second = subject.subscribe_all(subscriber);
  assert_eq!(subject.subscriber_count(), 1);

  subject.emit(1);
  assert_eq!(*hits.borrow(), 1);

  first.unsubscribe();
  second.unsubscribe();
  assert_eq!(subject.subscriber_count(), 0);
}

#[test]
fn test_error_propagation_keeps_the_stream_open() {
  let subject = Subject::<i32>::new();
  let log = Rc::new(RefCell::new(vec![]));
  let (n, e) = (log.clone(), log.clone());
  subject.map(|v| v + 1).subscribe_all(
    Subscriber::default()
      .on_next(move |v: i32| n.borrow_mut().push(v.to_string()))
      .on_error(move |err: StreamError| e.borrow_mut().push(err.to_string())),
  );
  subject.emit(1);
  subject.error(StreamError::msg("boom"));
  subject.emit(2);
  assert_eq!(*log.borrow(), vec!["2", "boom", "3"]);
}

#[test]
fn test_merge_completes_in_any_order() {
  for first_done in [true, false] {
    let (a, b) = (Subject::<i32>::new(), Subject::<i32>::new());
    let merged = a.merge(&b);
    let done = completed_flag(&merged);
    let (x, y) = if first_done { (&a, &b) } else { (&b, &a) };
    x.complete();
    assert!(!*done.borrow());
    y.complete();
    assert!(*done.borrow());
  }
}

#[test]
fn test_concat_completes_in_any_order() {
  for first_done in [true, false] {
    let (a, b) = (Subject::<i32>::new(), Subject::<i32>::new());
    let joined = a.concat(&b);
    let done = completed_flag(&joined);
    let (x, y) = if first_done { (&a, &b) } else { (&b, &a) };
    x.complete();
    assert!(!*done.borrow());
    y.complete();
    assert!(*done.borrow());
  }
}

#[test]
fn test_merge_array_of_mapped_sources() {
  #[derive(Clone, Debug, PartialEq)]
  enum Event {
    Click(u32),
    Key(char),
  }

  let clicks = Subject::<u32>::new();
  let keys = Subject::<char>::new();
  let events = ops::merge_array(vec![clicks.map(Event::Click), keys.map(Event::Key)], None);
  let seen = collect(&events);

  clicks.emit(1);
  keys.emit('k');
  clicks.emit(2);
  assert_eq!(*seen.borrow(), vec![Event::Click(1), Event::Key('k'), Event::Click(2)]);
}

#[test]
fn test_switch_map_powers() {
  let result = collect(&of![1, 2, 3].switch_map(|x| of![x, x * x, x * x * x]));
  assert_eq!(*result.borrow(), vec![1, 1, 1, 2, 4, 8, 3, 9, 27]);
}

#[test]
fn test_switch_map_with_delayed_inner_streams() {
  TestScheduler::init();
  let source = Subject::<u64>::new();
  let switched = source.switch_map(|x| of![x].delay(ms(50), TestScheduler));
  let result = collect(&switched);

  source.emit(1);
  TestScheduler::advance_by(ms(20));
  source.emit(2);
  TestScheduler::advance_by(ms(20));
  source.emit(3);
  TestScheduler::flush();
  assert_eq!(*result.borrow(), vec![3]);
}

#[test]
fn test_concat_map_never_interleaves() {
  TestScheduler::init();
  let timer = |x: u64| {
    observable::from_timer(ms(40 / x), [x, x * 10], Start::OnSubscribe, TestScheduler)
  };
  let mapped = of![1u64, 2, 3].concat_map(timer);
  let result = collect(&mapped);
  let done = completed_flag(&mapped);
  TestScheduler::flush();
  assert_eq!(*result.borrow(), vec![1, 10, 2, 20, 3, 30]);
  assert!(*done.borrow());
}

#[test]
fn test_flat_map_interleaves_by_time() {
  TestScheduler::init();
  let timer = |x: u64| observable::from_timer(ms(10 * x), [x; 3], Start::OnSubscribe, TestScheduler);
  let mapped = of![1u64, 2].flat_map(timer);
  let result = collect(&mapped);
  TestScheduler::flush();
  assert_eq!(*result.borrow(), vec![1, 2, 1, 2, 1, 2]);
}

#[test]
fn test_timed_operators_over_a_timer() {
  TestScheduler::init();
  let source = observable::from_timer(ms(10), [1, 2], Start::OnSubscribe, TestScheduler);
  let result = collect(&source);
  assert_eq!(*result.borrow(), vec![1]);
  TestScheduler::advance_by(ms(10));
  assert_eq!(*result.borrow(), vec![1, 2]);
  TestScheduler::advance_by(ms(10));
  assert!(source.is_completed());
}

#[test]
fn test_debounce_spreads_a_burst() {
  TestScheduler::init();
  let debounced = of![1, 2, 3, 4, 5].debounce(ms(10), TestScheduler);
  let result = collect(&debounced);
  let done = completed_flag(&debounced);
  TestScheduler::advance_by(ms(40));
  assert_eq!(*result.borrow(), vec![1, 2, 3, 4, 5]);
  assert!(!*done.borrow());
  TestScheduler::advance_by(ms(10));
  assert!(*done.borrow());
}

#[test]
fn test_throttle_keeps_first_and_last() {
  TestScheduler::init();
  let throttled = of![1, 2, 3, 4, 5].throttle(ms(10), TestScheduler);
  let result = collect(&throttled);
  TestScheduler::flush();
  assert_eq!(*result.borrow(), vec![1, 5]);
}

#[test]
fn test_pipe_and_compose() {
  let double_then_stringify =
    compose!(ops::map(|v: i32| v * 2), ops::map(|v: i32| v.to_string()));
  let piped = pipe!(of![1, 2], ops::tap(|_: &i32| {}), double_then_stringify);
  assert_eq!(*collect(&piped).borrow(), vec!["2".to_owned(), "4".to_owned()]);

  let plus_one = ops::map(|v: i32| v + 1);
  let twice = compose(ops::map(|v: i32| v + 1), plus_one);
  assert_eq!(*collect(&pipe(of![1], twice)).borrow(), vec![3]);
  assert_eq!(*collect(&of![5].pipe(ops::map(|v: i32| v * 3))).borrow(), vec![15]);
}

#[test]
fn test_from_future_resolves_through_the_scheduler() {
  TestScheduler::init();
  let (tx, rx) = oneshot::channel::<i32>();
  let stream = observable::from_future(
    async move { rx.await.map_err(StreamError::from_error) },
    TestScheduler,
  );
  let result = collect(&stream);
  let done = completed_flag(&stream);

  tx.send(42).unwrap();
  TestScheduler::flush();
  assert_eq!(*result.borrow(), vec![42]);
  assert!(*done.borrow());
}

#[test]
fn test_computed_signal() {
  let source = Signal::new(100);
  let s = source.clone();
  let doubled = Signal::computed(move || s.get() * 2);
  assert_eq!(doubled.get(), 200);

  source.set(5);
  assert_eq!(doubled.get(), 10);
}

#[test]
fn test_computed_chain_evaluates_each_level_once() {
  let evaluations = Rc::new(RefCell::new(vec![]));
  let source = Signal::new(0);

  let (s, e1) = (source.clone(), evaluations.clone());
  let c1 = Signal::computed(move || {
    e1.borrow_mut().push("c1");
    s.get() + 100
  });
  let (c, e2) = (c1.clone(), evaluations.clone());
  let c2 = Signal::computed(move || {
    e2.borrow_mut().push("c2");
    c.get() + 100
  });
  evaluations.borrow_mut().clear();

  source.set(1000);
  assert_eq!(*evaluations.borrow(), vec!["c1", "c2"]);
  assert_eq!(c2.get(), 1200);
}

#[test]
fn test_signal_from_debounced_stream() {
  TestScheduler::init();
  let input = Subject::<i32>::new();
  let done = Rc::new(RefCell::new(false));
  let d = done.clone();
  let debounced = input.debounce(ms(10), TestScheduler);
  let latest = Signal::from_observable(&debounced, move || *d.borrow_mut() = true);
  let seen = Rc::new(RefCell::new(vec![]));
  let (s, l) = (seen.clone(), latest.clone());
  Signal::effect(move || s.borrow_mut().push(l.value()));

  input.emit(1);
  input.emit(2);
  input.complete();
  TestScheduler::flush();
  assert_eq!(*seen.borrow(), vec![None, Some(1), Some(2)]);
  assert!(*done.borrow());
}

#[cfg(feature = "scheduler")]
#[tokio::test(flavor = "current_thread")]
async fn test_local_scheduler_drives_an_interval() {
  let local = tokio::task::LocalSet::new();
  let ticks = Rc::new(RefCell::new(vec![]));
  let t = ticks.clone();
  local
    .run_until(async move {
      let interval = observable::interval(ms(5), Start::OnSubscribe, Some(3), LocalScheduler);
      interval.subscribe(move |v| t.borrow_mut().push(v));
      tokio::time::sleep(ms(60)).await;
      assert!(interval.is_completed());
    })
    .await;
  assert_eq!(*ticks.borrow(), vec![0, 1, 2]);
}
