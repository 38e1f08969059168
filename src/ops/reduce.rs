use std::{cell::RefCell, rc::Rc};

use super::relay;
use crate::subject::Subject;

/// Folds the source with `f`, starting from `seed`, and emits the running
/// accumulator after every value.
///
/// Errors pass through without touching the accumulator.
///
/// ```rust
/// use std::{cell::RefCell, rc::Rc};
///
/// use rxsignal::prelude::*;
///
/// let sums = Rc::new(RefCell::new(vec![]));
/// let s = sums.clone();
/// of![1, 2, 3].reduce(|acc, v| acc + v, 10).subscribe(move |v| s.borrow_mut().push(v));
/// assert_eq!(*sums.borrow(), vec![11, 13, 16]);
/// ```
pub fn reduce<A, Acc, Err>(
  f: impl Fn(Acc, A) -> Acc + 'static, seed: Acc,
) -> impl Fn(Subject<A, Err>) -> Subject<Acc, Err>
where
  A: Clone + 'static,
  Acc: Clone + 'static,
  Err: Clone + 'static,
{
  let f = Rc::new(f);
  move |source| {
    let f = f.clone();
    let seed = seed.clone();
    Subject::cold(move |result| {
      let target = result.clone();
      let acc = RefCell::new(Some(seed));
      source.subscribe_all(relay(result, move |v| {
        let Some(current) = acc.borrow_mut().take() else {
          return;
        };
        let next = f(current, v);
        *acc.borrow_mut() = Some(next.clone());
        target.emit(next);
      }));
    })
  }
}
