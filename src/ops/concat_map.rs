use std::rc::Rc;

use super::concat;
use crate::{
  rc::{MutRc, RcDerefMut},
  subject::Subject,
  subscriber::Subscriber,
  subscription::Subscription,
};

struct ConcatMapState<B, Err> {
  chain: Option<Subject<B, Err>>,
  subscription: Subscription,
  generation: usize,
  chain_done: bool,
  source_done: bool,
}

/// Maps every source value to an inner stream and plays the inner streams one
/// after another, in source order.
///
/// Inner streams are subscribed as soon as their source value arrives; values
/// an inner stream emits before its predecessors have completed are held back.
/// The result completes once the source and every inner stream have completed.
pub fn concat_map<A, B, Err>(
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
      let state = MutRc::own(ConcatMapState {
        chain: None,
        subscription: Subscription::inert(),
        generation: 0,
        chain_done: false,
        source_done: false,
      });
      let (on_next, on_error, on_complete) = (result.clone(), result.clone(), result.clone());
      let next_state = state.clone();
      source.subscribe_all(
        Subscriber::default()
          .on_next(move |v| extend_chain(&next_state, f(v), &on_next))
          .on_error(move |err| on_error.error(err))
          .on_complete(move || {
            let finished = {
              let mut state = state.rc_deref_mut();
              state.source_done = true;
              state.chain.is_none() || state.chain_done
            };
            if finished {
              on_complete.complete();
            }
          }),
      );
    })
  }
}

// The chain is re-subscribed as `concat(inner)(chain)`. Dropping the old
// subscription clears the cached value of the old chain, so the new
// subscription does not replay a value that was already delivered.
fn extend_chain<B, Err>(
  state: &MutRc<ConcatMapState<B, Err>>, inner: Subject<B, Err>, result: &Subject<B, Err>,
) where
  B: Clone + 'static,
  Err: Clone + 'static,
{
  let (previous, chain, generation) = {
    let mut state = state.rc_deref_mut();
    let chain = match state.chain.take() {
      Some(chain) => concat(inner)(chain),
      None => inner,
    };
    state.chain = Some(chain.clone());
    state.generation += 1;
    state.chain_done = false;
    let previous = std::mem::replace(&mut state.subscription, Subscription::inert());
    (previous, chain, state.generation)
  };
  previous.unsubscribe();

  let (on_next, on_error, on_complete) = (result.clone(), result.clone(), result.clone());
  let done_state = state.clone();
  let subscription = chain.subscribe_all(
    Subscriber::default()
      .on_next(move |v| on_next.emit(v))
      .on_error(move |err| on_error.error(err))
      .on_complete(move || {
        let finished = {
          let mut state = done_state.rc_deref_mut();
          if state.generation != generation {
            return;
          }
          state.chain_done = true;
          state.source_done
        };
        if finished {
          on_complete.complete();
        }
      }),
  );

  let mut state = state.rc_deref_mut();
  if state.generation == generation {
    state.subscription = subscription;
  }
}
