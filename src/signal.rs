//! Signals: reactive values with automatic dependency tracking.
//!
//! A [`Signal`] wraps a [`Subject`] holding its current value. Effects and
//! computed signals never subscribe by hand: reading a signal while an effect
//! runs for the first time wires the effect to it.
//!
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//!
//! use rxsignal::prelude::*;
//!
//! let price = Signal::new(10);
//! let quantity = Signal::new(2);
//! let (p, q) = (price.clone(), quantity.clone());
//! let total = Signal::computed(move || p.get() * q.get());
//! assert_eq!(total.get(), 20);
//!
//! let log = Rc::new(RefCell::new(vec![]));
//! let (l, t) = (log.clone(), total.clone());
//! let disposer = Signal::effect(move || l.borrow_mut().push(t.get()));
//! quantity.set(3);
//! assert_eq!(*log.borrow(), vec![20, 30]);
//!
//! disposer.dispose();
//! price.set(1);
//! assert_eq!(total.get(), 3);
//! assert_eq!(*log.borrow(), vec![20, 30]);
//! ```
//!
//! Propagation is eager and synchronous. A computed signal re-evaluates once
//! for every change of one of its dependencies, so changing two dependencies
//! one after the other evaluates it twice.

use crate::{
  error::StreamError,
  observable::Observable,
  subject::Subject,
  subscriber::Subscriber,
  subscription::Disposer,
};

mod tracking;

pub use tracking::untracked;
use tracking::{run_tracked, track_read, EffectScope};

/// A reactive value.
///
/// Cloning a signal shares it.
pub struct Signal<T> {
  stream: Subject<T>,
}

impl<T> Clone for Signal<T> {
  fn clone(&self) -> Self { Self { stream: self.stream.clone() } }
}

impl<T> std::fmt::Debug for Signal<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Signal").field("stream", &self.stream).finish()
  }
}

impl Signal<()> {
  /// Runs `f` once, tracking every signal it reads, and re-runs it whenever
  /// one of them changes.
  ///
  /// Dependencies are collected on the first run only. The returned disposer
  /// detaches the effect; the signals it read keep their values.
  pub fn effect(f: impl Fn() + 'static) -> Disposer {
    let scope = EffectScope::new(f);
    run_tracked(&scope);
    scope.disposer()
  }
}

impl<T: Clone + 'static> Signal<T> {
  pub fn new(value: T) -> Self { Self { stream: Subject::with_value(value) } }

  /// A signal derived from the signals `f` reads.
  ///
  /// `f` runs once right away to seed the value, then again after every
  /// change of a dependency, and each result is emitted into the derived
  /// signal.
  pub fn computed(f: impl Fn() -> T + 'static) -> Self {
    let (derived, _) = Self::computed_with_disposer(f);
    derived
  }

  /// Like [`Signal::computed`], also returning the disposer that stops the
  /// re-evaluation.
  pub fn computed_with_disposer(f: impl Fn() -> T + 'static) -> (Self, Disposer) {
    let stream = Subject::new();
    let target = stream.clone();
    let disposer = Signal::<()>::effect(move || target.emit(f()));
    (Self { stream }, disposer)
  }

  /// A signal view of `stream`.
  ///
  /// The stream is shared, not copied, and started if it is cold.
  /// `on_complete` runs when the stream completes.
  pub fn from_observable(stream: &impl Observable<T>, on_complete: impl Fn() + 'static) -> Self {
    let stream = stream.stream();
    stream.subscribe_all(Subscriber::default().on_complete(on_complete));
    Self { stream }
  }

  /// The current value, recorded as a dependency of the running effect.
  pub fn value(&self) -> Option<T> {
    track_read(&self.stream);
    self.stream.value()
  }

  /// Like [`Signal::value`], with a default for a signal that has none yet.
  pub fn get(&self) -> T
  where
    T: Default,
  {
    self.value().unwrap_or_default()
  }

  /// The current value, without recording a dependency.
  pub fn peek(&self) -> Option<T> { self.stream.value() }

  /// Replaces the value and notifies everything depending on it.
  pub fn set(&self, value: T) { self.stream.emit(value) }

  pub fn emit(&self, value: T) { self.set(value) }

  /// The stream backing the signal.
  pub fn stream(&self) -> Subject<T> { self.stream.clone() }

  /// Runs `f` with the current value now and with every later one.
  ///
  /// Unlike [`Signal::effect`], nothing is tracked: `f` only depends on this
  /// signal. Disposing keeps the signal's value.
  pub fn add_effect(&self, f: impl Fn(T) + 'static) -> Disposer {
    Disposer::from(self.stream.subscribe(f))
  }

  pub fn complete(&self) { self.stream.complete() }

  pub fn is_completed(&self) -> bool { self.stream.is_completed() }
}

impl<T: Clone + 'static> Observable<T, StreamError> for Signal<T> {
  fn stream(&self) -> Subject<T> { self.stream.clone() }

  fn value(&self) -> Option<T> { Signal::value(self) }
}

impl<T: Clone + 'static> From<T> for Signal<T> {
  fn from(value: T) -> Self { Signal::new(value) }
}

#[cfg(test)]
mod tests {
  use std::{cell::Cell, rc::Rc};

  use super::*;
  use crate::{observable::ObservableExt, of};

  fn counter() -> (Rc<Cell<usize>>, Rc<Cell<usize>>) {
    let c = Rc::new(Cell::new(0));
    (c.clone(), c)
  }

  #[test]
  fn computed_follows_its_source() {
    let source = Signal::new(100);
    let s = source.clone();
    let doubled = Signal::computed(move || s.get() * 2);
    assert_eq!(doubled.get(), 200);

    source.set(5);
    assert_eq!(doubled.get(), 10);
  }

  #[test]
  fn effect_runs_once_then_on_every_change() {
    let (runs, r) = counter();
    let signal = Signal::new(100);
    let s = signal.clone();
    Signal::effect(move || {
      s.value();
      r.set(r.get() + 1);
    });
    assert_eq!(runs.get(), 1);

    signal.set(200);
    assert_eq!(runs.get(), 2);
  }

  #[test]
  fn disposed_effect_stops_running() {
    let (runs, r) = counter();
    let signal = Signal::new(100);
    let s = signal.clone();
    let disposer = Signal::effect(move || {
      s.value();
      r.set(r.get() + 1);
    });
    disposer.dispose();
    signal.set(200);
    assert_eq!(runs.get(), 1);
    assert_eq!(signal.peek(), Some(200));
  }

  #[test]
  fn chain_re_evaluates_each_level_once() {
    let (first_runs, f1) = counter();
    let (second_runs, f2) = counter();
    let source = Signal::new(0);
    let s = source.clone();
    let plus_100 = Signal::computed(move || {
      f1.set(f1.get() + 1);
      s.get() + 100
    });
    let p = plus_100.clone();
    let plus_200 = Signal::computed(move || {
      f2.set(f2.get() + 1);
      p.get() + 100
    });
    assert_eq!((first_runs.get(), second_runs.get()), (1, 1));

    source.set(1000);
    assert_eq!((first_runs.get(), second_runs.get()), (2, 2));
    assert_eq!(plus_200.get(), 1200);
  }

  #[test]
  fn two_dependencies_changing_evaluate_twice() {
    let (runs, r) = counter();
    let (a, b) = (Signal::new(100), Signal::new(300));
    let (sa, sb) = (a.clone(), b.clone());
    let sum = Signal::computed(move || {
      r.set(r.get() + 1);
      sa.get() + sb.get()
    });
    a.set(200);
    b.set(400);
    assert_eq!(runs.get(), 3);
    assert_eq!(sum.get(), 600);
  }

  #[test]
  fn effect_sees_two_computed_siblings() {
    let (runs, r) = counter();
    let source = Signal::new(100);
    let (s1, s2) = (source.clone(), source.clone());
    let even = Signal::computed(move || s1.get() % 2 == 0);
    let odd = Signal::computed(move || s2.get() % 2 != 0);
    let (e, o) = (even.clone(), odd.clone());
    Signal::effect(move || {
      e.value();
      o.value();
      r.set(r.get() + 1);
    });
    source.set(201);
    assert_eq!(runs.get(), 3);
    assert_eq!((even.get(), odd.get()), (false, true));
  }

  #[test]
  fn reads_inside_untracked_are_not_dependencies() {
    let (runs, r) = counter();
    let (tracked, ignored) = (Signal::new(1), Signal::new(1));
    let (t, i) = (tracked.clone(), ignored.clone());
    Signal::effect(move || {
      t.value();
      untracked(|| i.value());
      r.set(r.get() + 1);
    });
    ignored.set(2);
    assert_eq!(runs.get(), 1);
    tracked.set(2);
    assert_eq!(runs.get(), 2);
  }

  #[test]
  fn add_effect_replays_and_keeps_value_on_dispose() {
    let seen = Rc::new(std::cell::RefCell::new(vec![]));
    let s = seen.clone();
    let signal = Signal::new("a");
    let disposer = signal.add_effect(move |v| s.borrow_mut().push(v));
    signal.set("b");
    disposer.dispose();
    signal.set("c");
    assert_eq!(*seen.borrow(), vec!["a", "b"]);
    assert_eq!(signal.peek(), Some("c"));
  }

  #[test]
  fn from_observable_shares_and_starts_the_stream() {
    let (completions, c) = counter();
    let stream = of![1, 2, 3];
    let signal = Signal::from_observable(&stream, move || c.set(c.get() + 1));
    assert_eq!(signal.peek(), Some(3));
    assert_eq!(completions.get(), 1);
    assert_eq!(signal.stream().id(), stream.id());
  }

  #[test]
  fn signal_is_an_observable() {
    let signal = Signal::new(2);
    let squares = signal.map(|v| v * v);
    signal.set(3);
    assert_eq!(squares.value(), None);
    let seen = Rc::new(Cell::new(0));
    let s = seen.clone();
    squares.subscribe(move |v| s.set(v));
    assert_eq!(seen.get(), 9);
  }
}
