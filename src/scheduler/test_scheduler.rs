//! Virtual time for tests of the timed operators.
//!
//! The clock stands still until a test moves it with
//! [`TestScheduler::advance_by`] or runs everything left with
//! [`TestScheduler::flush`]; timers due on the way fire in order.
//!
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//!
//! use rxsignal::prelude::*;
//!
//! TestScheduler::init();
//!
//! let seen = Rc::new(RefCell::new(vec![]));
//! let s = seen.clone();
//! of![42]
//!   .delay(Duration::from_millis(100), TestScheduler)
//!   .subscribe(move |v| s.borrow_mut().push(v));
//! assert!(seen.borrow().is_empty());
//!
//! TestScheduler::advance_by(Duration::from_millis(100));
//! assert_eq!(*seen.borrow(), vec![42]);
//! ```
//!
//! Futures handed to [`Scheduler::spawn`] live in a `futures` `LocalPool`
//! that is polled until it stalls before every timer fires.
//!
//! The clock and the pool are thread-local: every test thread sees its own
//! timeline, so tests running in parallel never observe each other.

use std::{
  cell::RefCell,
  cmp::{Ordering, Reverse},
  collections::BinaryHeap,
};

use futures::{
  executor::{LocalPool, LocalSpawner},
  future::LocalBoxFuture,
  task::LocalSpawnExt,
};

use super::{Cancellable, Duration, Scheduler, Task, TaskHandle, TaskState};

/// A task waiting for the clock to reach `due`.
struct Timer {
  due: Duration,
  seq: usize,
  task: Task,
  handle: TaskHandle,
}

impl Timer {
  // `BinaryHeap` pops the largest key: the earliest due time, then the
  // oldest sequence number.
  fn key(&self) -> Reverse<(Duration, usize)> { Reverse((self.due, self.seq)) }
}

impl PartialEq for Timer {
  fn eq(&self, other: &Self) -> bool { self.key() == other.key() }
}

impl Eq for Timer {}

impl PartialOrd for Timer {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for Timer {
  fn cmp(&self, other: &Self) -> Ordering { self.key().cmp(&other.key()) }
}

struct VirtualClock {
  now: Duration,
  timers: BinaryHeap<Timer>,
  seq: usize,
  spawner: LocalSpawner,
}

impl VirtualClock {
  fn new(spawner: LocalSpawner) -> Self {
    Self { now: Duration::ZERO, timers: BinaryHeap::new(), seq: 0, spawner }
  }

  /// Queue `task` to fire `delay` from now. A re-armed task gets a fresh
  /// sequence number, so it runs after everything already due at that time.
  fn arm(&mut self, task: Task, handle: TaskHandle, delay: Duration) {
    let seq = self.seq;
    self.seq += 1;
    self.timers.push(Timer { due: self.now + delay, seq, task, handle });
  }

  /// The earliest timer due no later than `limit`; the clock jumps to it.
  fn pop_due(&mut self, limit: Option<Duration>) -> Option<Timer> {
    let due = self.timers.peek()?.due;
    if limit.is_some_and(|limit| due > limit) {
      return None;
    }
    self.now = due;
    self.timers.pop()
  }
}

thread_local! {
  static CLOCK: RefCell<Option<VirtualClock>> = const { RefCell::new(None) };
  static POOL: RefCell<LocalPool> = RefCell::new(LocalPool::new());
}

fn with_clock<R>(f: impl FnOnce(&mut VirtualClock) -> R) -> R {
  CLOCK.with(|clock| {
    let mut clock = clock.borrow_mut();
    let Some(clock) = clock.as_mut() else {
      panic!("TestScheduler::init() must be called before using the scheduler");
    };
    f(clock)
  })
}

/// Handle to the calling thread's virtual clock.
///
/// Zero-sized; every copy on one thread drives the same timeline.
#[derive(Clone, Copy, Default, Debug)]
pub struct TestScheduler;

impl TestScheduler {
  /// Start a fresh timeline at zero.
  ///
  /// Pending timers and spawned futures of the previous timeline are dropped.
  /// Every other function panics on a thread that never called `init`.
  pub fn init() {
    let spawner = POOL.with(|pool| {
      let mut pool = pool.borrow_mut();
      *pool = LocalPool::new();
      pool.spawner()
    });
    let _previous = CLOCK.with(|clock| clock.replace(Some(VirtualClock::new(spawner))));
  }

  /// The current virtual time.
  pub fn now() -> Duration { with_clock(|clock| clock.now) }

  /// Timers still queued, cancelled ones included until their time comes.
  pub fn pending_count() -> usize { with_clock(|clock| clock.timers.len()) }

  pub fn is_empty() -> bool { with_clock(|clock| clock.timers.is_empty()) }

  /// Move the clock forward by `duration`, firing every timer due by then.
  ///
  /// Timers fire in due order, those due together in the order they were
  /// armed. A task answering [`TaskState::Sleeping`] is re-armed relative to
  /// its own firing time and fires again if that is still within range.
  pub fn advance_by(duration: Duration) {
    let target = with_clock(|clock| clock.now + duration);
    Self::run(Some(target));
    with_clock(|clock| clock.now = target);
  }

  /// Fire timers until none is left, jumping the clock from one to the next.
  ///
  /// Never returns while an unbounded repeating task (an `interval` without a
  /// count, say) is still armed.
  pub fn flush() { Self::run(None) }

  // A future polled from inside another one must not re-enter the pool.
  fn drive_futures() {
    POOL.with(|pool| {
      if let Ok(mut pool) = pool.try_borrow_mut() {
        pool.run_until_stalled();
      }
    });
  }

  fn run(limit: Option<Duration>) {
    loop {
      Self::drive_futures();
      let Some(mut timer) = with_clock(|clock| clock.pop_due(limit)) else {
        break;
      };
      if timer.handle.is_closed() {
        continue;
      }
      match timer.task.step() {
        TaskState::Finished => timer.handle.mark_finished(),
        TaskState::Sleeping(delay) => {
          with_clock(|clock| clock.arm(timer.task, timer.handle, delay))
        }
      }
    }
  }
}

impl Scheduler for TestScheduler {
  fn schedule(&self, task: Task, delay: Option<Duration>) -> TaskHandle {
    let handle = TaskHandle::new();
    with_clock(|clock| clock.arm(task, handle.clone(), delay.unwrap_or_default()));
    handle
  }

  fn spawn(&self, future: LocalBoxFuture<'static, ()>) -> TaskHandle {
    let handle = TaskHandle::new();
    let spawner = with_clock(|clock| clock.spawner.clone());
    if let Err(err) = spawner.spawn_local(Cancellable::new(future, handle.clone())) {
      tracing::warn!(%err, "test scheduler could not spawn future");
      handle.mark_finished();
    }
    handle
  }

  fn elapsed(&self) -> Duration { TestScheduler::now() }
}
