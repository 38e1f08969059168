use std::rc::Rc;

use super::relay;
use crate::subject::Subject;

/// Runs a side effect on every value and passes the value on unchanged.
pub fn tap<A, Err>(f: impl Fn(&A) + 'static) -> impl Fn(Subject<A, Err>) -> Subject<A, Err>
where
  A: Clone + 'static,
  Err: Clone + 'static,
{
  let f = Rc::new(f);
  move |source| {
    let f = f.clone();
    Subject::cold(move |result| {
      let target = result.clone();
      source.subscribe_all(relay(result, move |v| {
        f(&v);
        target.emit(v);
      }));
    })
  }
}
