use num_traits::{CheckedAdd, One};

use super::Start;
use crate::{error::StreamError, subject::Subject};

/// Creates a stream that emits every value of an iterator, then completes.
///
/// The iterator is drained synchronously, when the stream gets its first
/// subscriber.
///
/// ```
/// use rxsignal::prelude::*;
///
/// observable::from_iter(vec![0, 1, 2, 3]).subscribe(|v| println!("{v},"));
/// ```
pub fn from_iter<Iter>(iter: Iter) -> Subject<Iter::Item>
where
  Iter: IntoIterator + 'static,
  Iter::Item: Clone + 'static,
{
  from_iter_with(iter, Start::OnSubscribe)
}

/// Like [`from_iter`], with the start mode chosen by the caller.
///
/// With [`Start::Now`] the iterator is drained immediately: the stream is
/// already completed when it is returned and only its cached last value
/// remains readable.
pub fn from_iter_with<Iter>(iter: Iter, start: Start) -> Subject<Iter::Item>
where
  Iter: IntoIterator + 'static,
  Iter::Item: Clone + 'static,
{
  start.build(move |subject| {
    for v in iter {
      subject.emit(v);
    }
    subject.complete();
  })
}

/// Emits `count` consecutive numbers beginning with `start`, then completes.
///
/// If `T` cannot hold the whole run, the numbers that fit are emitted, an
/// error reports the overflow, and the stream completes.
pub fn range<T>(start: T, count: usize) -> Subject<T>
where
  T: Clone + CheckedAdd + One + 'static,
{
  Start::OnSubscribe.build(move |subject| {
    let mut next = Some(start);
    for emitted in 0..count {
      let Some(value) = next else {
        tracing::debug!(emitted, count, "range overflowed");
        subject.error(StreamError::msg(format!(
          "range overflowed after {emitted} of {count} values"
        )));
        break;
      };
      next = value.checked_add(&T::one());
      subject.emit(value);
    }
    subject.complete();
  })
}

/// Creates a stream emitting the given values, then completing.
///
/// ```
/// use rxsignal::prelude::*;
///
/// of![1, 2, 3].subscribe(|v| println!("{v},"));
/// ```
#[macro_export]
macro_rules! of {
  ($($item:expr),* $(,)?) => {
    $crate::observable::from_iter([$($item),*])
  };
}
