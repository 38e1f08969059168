//! Ambient dependency tracking.
//!
//! While an effect runs for the first time its scope sits on a thread-local
//! stack. Every signal read during that run subscribes the effect to the
//! signal's stream, so later changes re-run the effect.

use std::{cell::RefCell, rc::Rc};

use smallvec::SmallVec;

use crate::{subject::Subject, subscriber::Subscriber, subscription::Disposer};

/// One effect: the function to re-run and what it already depends on.
pub(crate) struct EffectScope {
  run: Rc<dyn Fn()>,
  deps: RefCell<SmallVec<[usize; 4]>>,
  disposer: Disposer,
}

impl EffectScope {
  pub(crate) fn new(run: impl Fn() + 'static) -> Rc<Self> {
    Rc::new(Self { run: Rc::new(run), deps: RefCell::default(), disposer: Disposer::new() })
  }

  pub(crate) fn disposer(&self) -> Disposer { self.disposer.clone() }

  #[cfg(test)]
  pub(crate) fn dependency_count(&self) -> usize { self.deps.borrow().len() }

  fn depends_on(&self, stream_id: usize) -> bool { self.deps.borrow().contains(&stream_id) }
}

enum Tracking {
  Idle,
  Active(Vec<Rc<EffectScope>>),
}

thread_local! {
  static TRACKING: RefCell<Tracking> = const { RefCell::new(Tracking::Idle) };
}

fn active_scopes() -> Vec<Rc<EffectScope>> {
  TRACKING.with(|tracking| match &*tracking.borrow() {
    Tracking::Idle => Vec::new(),
    Tracking::Active(scopes) => scopes.clone(),
  })
}

fn replace_tracking(next: Tracking) -> Tracking {
  TRACKING.with(|tracking| std::mem::replace(&mut *tracking.borrow_mut(), next))
}

// Restores the previous tracking state, even if the effect panics.
struct Restore(Option<Tracking>);

impl Drop for Restore {
  fn drop(&mut self) {
    if let Some(previous) = self.0.take() {
      replace_tracking(previous);
    }
  }
}

/// Runs the scope's function once with the scope on the tracking stack.
pub(crate) fn run_tracked(scope: &Rc<EffectScope>) {
  let mut scopes = active_scopes();
  scopes.push(scope.clone());
  let _restore = Restore(Some(replace_tracking(Tracking::Active(scopes))));
  (scope.run)();
}

/// Runs `f` with tracking suspended: signals read inside `f` do not become
/// dependencies of the effect currently running.
pub fn untracked<R>(f: impl FnOnce() -> R) -> R {
  let _restore = Restore(Some(replace_tracking(Tracking::Idle)));
  f()
}

/// Records a read of `stream` for every active scope that does not depend on
/// it yet.
pub(crate) fn track_read<T>(stream: &Subject<T>)
where
  T: Clone + 'static,
{
  let stream_id = stream.id();
  for scope in active_scopes() {
    if scope.depends_on(stream_id) {
      continue;
    }
    scope.deps.borrow_mut().push(stream_id);
    let run = scope.run.clone();
    let rerun = Subscriber::from_next(move |_| untracked(|| run()));
    scope.disposer.add(stream.subscribe_with(rerun, false));
  }
}

#[cfg(test)]
mod tests {
  use std::cell::Cell;

  use super::*;

  #[test]
  fn reads_outside_a_scope_are_not_tracked() {
    let stream = Subject::<i32>::with_value(1);
    track_read(&stream);
    assert_eq!(stream.subscriber_count(), 0);
  }

  #[test]
  fn each_stream_is_tracked_once_per_scope() {
    let stream = Subject::<i32>::with_value(1);
    let s = stream.clone();
    let scope = EffectScope::new(move || {
      track_read(&s);
      track_read(&s);
    });
    run_tracked(&scope);
    assert_eq!(scope.dependency_count(), 1);
    assert_eq!(stream.subscriber_count(), 1);
  }

  #[test]
  fn nested_scopes_both_track() {
    let stream = Subject::<i32>::with_value(1);
    let s = stream.clone();
    let inner = EffectScope::new(move || track_read(&s));
    let i = inner.clone();
    let outer = EffectScope::new(move || run_tracked(&i));
    run_tracked(&outer);
    assert_eq!(outer.dependency_count(), 1);
    assert_eq!(inner.dependency_count(), 1);
    assert_eq!(stream.subscriber_count(), 2);
  }

  #[test]
  fn untracked_suspends_and_restores() {
    let (a, b) = (Subject::<i32>::with_value(1), Subject::<i32>::with_value(2));
    let (sa, sb) = (a.clone(), b.clone());
    let scope = EffectScope::new(move || {
      untracked(|| track_read(&sa));
      track_read(&sb);
    });
    run_tracked(&scope);
    assert_eq!(a.subscriber_count(), 0);
    assert_eq!(b.subscriber_count(), 1);
  }

  #[test]
  fn change_reruns_without_new_tracking() {
    let runs = Rc::new(Cell::new(0));
    let stream = Subject::<i32>::with_value(1);
    let (r, s) = (runs.clone(), stream.clone());
    let scope = EffectScope::new(move || {
      r.set(r.get() + 1);
      track_read(&s);
    });
    run_tracked(&scope);
    stream.emit(2);
    stream.emit(3);
    assert_eq!(runs.get(), 3);
    assert_eq!(stream.subscriber_count(), 1);

    scope.disposer().dispose();
    stream.emit(4);
    assert_eq!(runs.get(), 3);
    assert_eq!(stream.value(), Some(4));
  }
}
