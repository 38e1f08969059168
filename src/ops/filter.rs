use std::{cell::Cell, rc::Rc};

use super::relay;
use crate::subject::Subject;

/// Keeps the values `predicate` accepts.
///
/// The predicate also receives the index of the value in the source, counted
/// per result stream.
pub fn filter<A, Err>(
  predicate: impl Fn(&A, usize) -> bool + 'static,
) -> impl Fn(Subject<A, Err>) -> Subject<A, Err>
where
  A: Clone + 'static,
  Err: Clone + 'static,
{
  let predicate = Rc::new(predicate);
  move |source| {
    let predicate = predicate.clone();
    Subject::cold(move |result| {
      let target = result.clone();
      let index = Cell::new(0);
      source.subscribe_all(relay(result, move |v| {
        let idx = index.replace(index.get() + 1);
        if predicate(&v, idx) {
          target.emit(v);
        }
      }));
    })
  }
}
