use std::collections::VecDeque;

use crate::{
  rc::{MutRc, RcDeref, RcDerefMut},
  subject::Subject,
  subscriber::Subscriber,
};

struct ConcatState<A> {
  buffer: VecDeque<A>,
  first_done: bool,
  second_done: bool,
}

/// Emits the values of the source, then the values `second` produced, in the
/// order they arrived.
///
/// `second` is subscribed as soon as the result is, so nothing it emits while
/// the source is still running gets lost; those values are held back until
/// the source completes. Errors of either side are forwarded immediately. The
/// result completes once both sides have completed.
///
/// ```rust
/// use std::{cell::RefCell, rc::Rc};
///
/// use rxsignal::prelude::*;
///
/// let (first, second) = (Subject::<i32>::new(), Subject::<i32>::new());
/// let seen = Rc::new(RefCell::new(vec![]));
/// let s = seen.clone();
/// first.concat(&second).subscribe(move |v| s.borrow_mut().push(v));
/// second.emit(10);
/// first.emit(1);
/// first.complete();
/// assert_eq!(*seen.borrow(), vec![1, 10]);
/// ```
pub fn concat<A, Err>(second: Subject<A, Err>) -> impl Fn(Subject<A, Err>) -> Subject<A, Err>
where
  A: Clone + 'static,
  Err: Clone + 'static,
{
  move |first| {
    let second = second.clone();
    Subject::cold(move |result| {
      let state = MutRc::own(ConcatState {
        buffer: VecDeque::new(),
        first_done: false,
        second_done: second.is_completed(),
      });
      second.subscribe_all(second_half(&state, result));

      if first.is_completed() {
        flush(&state, result);
        return;
      }
      let (on_next, on_error, on_complete) = (result.clone(), result.clone(), result.clone());
      first.subscribe_all(
        Subscriber::default()
          .on_next(move |v| on_next.emit(v))
          .on_error(move |err| on_error.error(err))
          .on_complete(move || flush(&state, &on_complete)),
      );
    })
  }
}

fn second_half<A, Err>(
  state: &MutRc<ConcatState<A>>, result: &Subject<A, Err>,
) -> Subscriber<A, Err>
where
  A: Clone + 'static,
  Err: Clone + 'static,
{
  let (next_state, done_state) = (state.clone(), state.clone());
  let (on_next, on_error, on_complete) = (result.clone(), result.clone(), result.clone());
  Subscriber::default()
    .on_next(move |v| {
      let live = {
        let mut state = next_state.rc_deref_mut();
        if state.first_done {
          Some(v)
        } else {
          state.buffer.push_back(v);
          None
        }
      };
      if let Some(v) = live {
        on_next.emit(v);
      }
    })
    .on_error(move |err| on_error.error(err))
    .on_complete(move || {
      let first_done = {
        let mut state = done_state.rc_deref_mut();
        state.second_done = true;
        state.first_done
      };
      if first_done {
        on_complete.complete();
      }
    })
}

// Values the second half emits while the buffer is replayed are appended to
// it and picked up by the next round.
fn flush<A, Err>(state: &MutRc<ConcatState<A>>, result: &Subject<A, Err>)
where
  A: Clone + 'static,
  Err: Clone + 'static,
{
  loop {
    let batch = {
      let mut state = state.rc_deref_mut();
      if state.buffer.is_empty() {
        state.first_done = true;
        break;
      }
      std::mem::take(&mut state.buffer)
    };
    batch.into_iter().for_each(|v| result.emit(v));
  }
  let second_done = state.rc_deref().second_done;
  if second_done {
    result.complete();
  }
}
