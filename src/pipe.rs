//! Operator composition.
//!
//! An operator is any function from one subject to another. Operators are
//! applied with [`pipe`] (or `pipe!` for several in a row) and glued into new
//! operators with [`compose`] (or `compose!`).
//!
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//!
//! use rxsignal::{compose, pipe, prelude::*};
//!
//! let evens_doubled = compose!(ops::filter(|v: &i32, _| v % 2 == 0), ops::map(|v: i32| v * 2));
//!
//! let seen = Rc::new(RefCell::new(vec![]));
//! let s = seen.clone();
//! pipe!(of![1, 2, 3, 4], evens_doubled, ops::map(|v: i32| v + 1))
//!   .subscribe(move |v| s.borrow_mut().push(v));
//! assert_eq!(*seen.borrow(), vec![5, 9]);
//! ```

use crate::{error::StreamError, subject::Subject};

/// A transformation from one stream into another.
///
/// Implemented by every matching closure; the operator functions in
/// [`crate::ops`] all return one.
pub trait Operator<A, B, Err = StreamError>: Fn(Subject<A, Err>) -> Subject<B, Err> {}

impl<A, B, Err, F> Operator<A, B, Err> for F where F: Fn(Subject<A, Err>) -> Subject<B, Err> {}

/// Apply `op` to `source`.
#[inline]
pub fn pipe<A, B, Err>(
  source: Subject<A, Err>, op: impl FnOnce(Subject<A, Err>) -> Subject<B, Err>,
) -> Subject<B, Err> {
  op(source)
}

/// An operator running `first`, then `second`.
pub fn compose<A, B, C, Err>(
  first: impl Operator<A, B, Err>, second: impl Operator<B, C, Err>,
) -> impl Operator<A, C, Err> {
  move |source: Subject<A, Err>| -> Subject<C, Err> { second(first(source)) }
}

/// Apply a sequence of operators to a stream, left to right.
#[macro_export]
macro_rules! pipe {
  ($source:expr $(, $op:expr)* $(,)?) => {{
    let stream = $source;
    $(let stream = ($op)(stream);)*
    stream
  }};
}

/// Compose a sequence of operators into one, applied left to right.
#[macro_export]
macro_rules! compose {
  ($op:expr $(,)?) => {
    $op
  };
  ($op:expr, $($rest:expr),+ $(,)?) => {
    $crate::pipe::compose($op, $crate::compose!($($rest),+))
  };
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use super::*;
  use crate::{ops, prelude::*};

  #[test]
  fn pipe_applies_in_order() {
    let source = Subject::<i32>::with_value(3);
    let out = pipe(source.clone(), ops::map(|v: i32| v.to_string()));
    assert_eq!(out.value(), None);

    let seen = Rc::new(RefCell::new(vec![]));
    let s = seen.clone();
    out.subscribe(move |v| s.borrow_mut().push(v));
    source.emit(4);
    assert_eq!(*seen.borrow(), vec!["3", "4"]);
  }

  #[test]
  fn composed_operator_is_reusable() {
    let plus_one_times_ten = compose(ops::map(|v: i32| v + 1), ops::map(|v: i32| v * 10));

    let a = plus_one_times_ten(crate::of![1]);
    let b = plus_one_times_ten(crate::of![2]);
    let seen = Rc::new(RefCell::new(vec![]));
    let (s1, s2) = (seen.clone(), seen.clone());
    a.subscribe(move |v| s1.borrow_mut().push(v));
    b.subscribe(move |v| s2.borrow_mut().push(v));
    assert_eq!(*seen.borrow(), vec![20, 30]);
  }

  #[test]
  fn macros_accept_any_number_of_operators() {
    let identity = crate::pipe!(Subject::<i32>::with_value(1));
    assert_eq!(identity.value(), Some(1));

    let op = crate::compose!(
      ops::map(|v: i32| v + 1),
      ops::filter(|v: &i32, _| *v > 2),
      ops::map(|v: i32| v * 100),
    );
    let seen = Rc::new(RefCell::new(vec![]));
    let s = seen.clone();
    crate::pipe!(crate::of![1, 2, 3], op).subscribe(move |v| s.borrow_mut().push(v));
    assert_eq!(*seen.borrow(), vec![300, 400]);
  }
}
