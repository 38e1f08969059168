use std::rc::Rc;

use crate::{
  rc::{MutRc, RcDeref, RcDerefMut},
  subject::Subject,
  subscriber::Subscriber,
};

struct SwitchState<B, Err> {
  generation: usize,
  current: Option<Subject<B, Err>>,
  inner_done: bool,
  source_done: bool,
}

/// Maps every source value to an inner stream and follows only the latest one.
///
/// A new source value completes the previous inner stream before the new one
/// is subscribed, so a stale inner stream can never leak values into the
/// result. The result completes once the source and the current inner stream
/// have completed.
///
/// ```rust
/// use std::{cell::RefCell, rc::Rc};
///
/// use rxsignal::prelude::*;
///
/// let seen = Rc::new(RefCell::new(vec![]));
/// let s = seen.clone();
/// of![1, 2]
///   .switch_map(|x| of![x, x * 10])
///   .subscribe(move |v| s.borrow_mut().push(v));
/// assert_eq!(*seen.borrow(), vec![1, 10, 2, 20]);
/// ```
pub fn switch_map<A, B, Err>(
  f: impl Fn(A) -> Subject<B, Err> + 'static,
) -> impl Fn(Subject<A, Err>) -> Subject<B, Err>
where
  A: Clone + 'static,
  B: Clone + 'static,
  Err: Clone + 'static,
{
  let f = Rc::new(f);
  move |source| {
    let f = f.clone();
    Subject::cold(move |result| {
      let state = MutRc::own(SwitchState {
        generation: 0,
        current: None,
        inner_done: false,
        source_done: false,
      });
      let (on_next, on_error, on_complete) = (result.clone(), result.clone(), result.clone());
      let next_state = state.clone();
      source.subscribe_all(
        Subscriber::default()
          .on_next(move |v| switch_to(&next_state, f(v), &on_next))
          .on_error(move |err| on_error.error(err))
          .on_complete(move || {
            let finished = {
              let mut state = state.rc_deref_mut();
              state.source_done = true;
              state.current.is_none() || state.inner_done
            };
            if finished {
              on_complete.complete();
            }
          }),
      );
    })
  }
}

fn switch_to<B, Err>(
  state: &MutRc<SwitchState<B, Err>>, inner: Subject<B, Err>, result: &Subject<B, Err>,
) where
  B: Clone + 'static,
  Err: Clone + 'static,
{
  let (generation, previous) = {
    let mut state = state.rc_deref_mut();
    state.generation += 1;
    state.inner_done = inner.is_completed();
    (state.generation, state.current.replace(inner.clone()))
  };
  if let Some(previous) = previous {
    previous.complete();
  }
  if inner.is_completed() {
    return;
  }

  let (next_state, error_state, done_state) = (state.clone(), state.clone(), state.clone());
  let (on_next, on_error, on_complete) = (result.clone(), result.clone(), result.clone());
  let is_current =
    move |state: &MutRc<SwitchState<B, Err>>| state.rc_deref().generation == generation;
  inner.subscribe_all(
    Subscriber::default()
      .on_next(move |v| {
        if is_current(&next_state) {
          on_next.emit(v);
        }
      })
      .on_error(move |err| {
        if is_current(&error_state) {
          on_error.error(err);
        }
      })
      .on_complete(move || {
        let finished = {
          let mut state = done_state.rc_deref_mut();
          if state.generation != generation {
            return;
          }
          state.inner_done = true;
          state.source_done
        };
        if finished {
          on_complete.complete();
        }
      }),
  );
}
