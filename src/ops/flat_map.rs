use std::{collections::BTreeMap, rc::Rc};

use crate::{
  rc::{MutRc, RcDerefMut},
  subject::Subject,
  subscriber::Subscriber,
  subscription::Subscription,
};

struct FlatMapState {
  // `None` marks an inner stream whose subscription is still being set up.
  inners: BTreeMap<usize, Option<Subscription>>,
  next_id: usize,
  source_done: bool,
}

impl FlatMapState {
  fn is_finished(&self) -> bool { self.source_done && self.inners.is_empty() }
}

/// Maps every source value to an inner stream and merges all inner streams
/// into the result, concurrently.
///
/// The result completes once the source and every inner stream have completed.
///
/// ```rust
/// use std::{cell::RefCell, rc::Rc};
///
/// use rxsignal::prelude::*;
///
/// let seen = Rc::new(RefCell::new(vec![]));
/// let s = seen.clone();
/// of![1, 2]
///   .flat_map(|x| of![x, x * 10])
///   .subscribe(move |v| s.borrow_mut().push(v));
/// assert_eq!(*seen.borrow(), vec![1, 10, 2, 20]);
/// ```
pub fn flat_map<A, B, Err>(
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
      let state =
        MutRc::own(FlatMapState { inners: BTreeMap::new(), next_id: 0, source_done: false });
      let (on_next, on_error, on_complete) = (result.clone(), result.clone(), result.clone());
      let next_state = state.clone();
      source.subscribe_all(
        Subscriber::default()
          .on_next(move |v| {
            let inner = f(v);
            if inner.is_completed() {
              return;
            }
            subscribe_inner(&next_state, &inner, &on_next);
          })
          .on_error(move |err| on_error.error(err))
          .on_complete(move || {
            let finished = {
              let mut state = state.rc_deref_mut();
              state.source_done = true;
              state.is_finished()
            };
            if finished {
              on_complete.complete();
            }
          }),
      );
    })
  }
}

fn subscribe_inner<B, Err>(
  state: &MutRc<FlatMapState>, inner: &Subject<B, Err>, result: &Subject<B, Err>,
) where
  B: Clone + 'static,
  Err: Clone + 'static,
{
  let id = {
    let mut state = state.rc_deref_mut();
    let id = state.next_id;
    state.next_id += 1;
    state.inners.insert(id, None);
    id
  };

  let (on_next, on_error, on_complete) = (result.clone(), result.clone(), result.clone());
  let done_state = state.clone();
  let subscription = inner.subscribe_all(
    Subscriber::default()
      .on_next(move |v| on_next.emit(v))
      .on_error(move |err| on_error.error(err))
      .on_complete(move || {
        let finished = {
          let mut state = done_state.rc_deref_mut();
          state.inners.remove(&id);
          state.is_finished()
        };
        if finished {
          on_complete.complete();
        }
      }),
  );

  // An inner stream that completed while subscribing has already left the map.
  if let Some(slot) = state.rc_deref_mut().inners.get_mut(&id) {
    *slot = Some(subscription);
  }
}
