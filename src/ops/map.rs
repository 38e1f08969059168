use std::rc::Rc;

use super::relay;
use crate::subject::Subject;

/// Transforms every value with `f`.
///
/// ```rust
/// use std::{cell::RefCell, rc::Rc};
///
/// use rxsignal::prelude::*;
///
/// let seen = Rc::new(RefCell::new(vec![]));
/// let s = seen.clone();
/// ops::map(|v: i32| v * 2)(of![1, 2, 3]).subscribe(move |v| s.borrow_mut().push(v));
/// assert_eq!(*seen.borrow(), vec![2, 4, 6]);
/// ```
pub fn map<A, B, Err>(f: impl Fn(A) -> B + 'static) -> impl Fn(Subject<A, Err>) -> Subject<B, Err>
where
  A: Clone + 'static,
  B: Clone + 'static,
  Err: Clone + 'static,
{
  let f = Rc::new(f);
  move |source| {
    let f = f.clone();
    Subject::cold(move |result| {
      let target = result.clone();
      source.subscribe_all(relay(result, move |v| target.emit(f(v))));
    })
  }
}
