use std::cell::Cell;
use std::rc::Rc;

use crate::{subject::Subject, subscriber::Subscriber};

/// Interleaves `other` with the source, in arrival order.
///
/// Both sources replay their current value to the result. The result completes
/// once both sources have completed; errors of either are forwarded as they
/// arrive.
///
/// ```rust
/// use std::{cell::RefCell, rc::Rc};
///
/// use rxsignal::prelude::*;
///
/// let (a, b) = (Subject::<i32>::new(), Subject::<i32>::new());
/// let seen = Rc::new(RefCell::new(vec![]));
/// let s = seen.clone();
/// a.merge(&b).subscribe(move |v| s.borrow_mut().push(v));
/// a.emit(1);
/// b.emit(2);
/// a.emit(3);
/// assert_eq!(*seen.borrow(), vec![1, 2, 3]);
/// ```
pub fn merge<A, Err>(other: Subject<A, Err>) -> impl Fn(Subject<A, Err>) -> Subject<A, Err>
where
  A: Clone + 'static,
  Err: Clone + 'static,
{
  move |source| {
    let sources = vec![source, other.clone()];
    Subject::cold(move |result| fan_in(result, &sources, |_| true))
  }
}

/// Merges any number of sources into one stream.
///
/// Only the source at `replay_index`, if any, replays its current value to the
/// result; the others contribute the values they emit from now on. An empty
/// list yields a stream that completes immediately.
pub fn merge_array<A, Err>(
  sources: Vec<Subject<A, Err>>, replay_index: Option<usize>,
) -> Subject<A, Err>
where
  A: Clone + 'static,
  Err: Clone + 'static,
{
  Subject::cold(move |result| fan_in(result, &sources, |idx| Some(idx) == replay_index))
}

fn fan_in<A, Err>(
  result: &Subject<A, Err>, sources: &[Subject<A, Err>], replay: impl Fn(usize) -> bool,
) where
  A: Clone + 'static,
  Err: Clone + 'static,
{
  let live = sources.iter().filter(|s| !s.is_completed()).count();
  let remaining = Rc::new(Cell::new(live));
  if live == 0 {
    result.complete();
    return;
  }
  for (idx, source) in sources.iter().enumerate() {
    if source.is_completed() {
      continue;
    }
    let (on_next, on_error, on_complete) = (result.clone(), result.clone(), result.clone());
    let remaining = remaining.clone();
    let subscriber = Subscriber::default()
      .on_next(move |v| on_next.emit(v))
      .on_error(move |err| on_error.error(err))
      .on_complete(move || {
        let left = remaining.get().saturating_sub(1);
        remaining.set(left);
        if left == 0 {
          on_complete.complete();
        }
      });
    source.subscribe_with(subscriber, replay(idx));
  }
}
