use std::future::Future;

use crate::{scheduler::Scheduler, subject::Subject};

/// Converts a `Future` resolving to a `Result` into a stream.
///
/// The future is spawned on `scheduler` when the stream gets its first
/// subscriber. `Ok` is emitted as a value and `Err` is forwarded as an error;
/// either way the stream completes afterwards.
///
/// ```rust
/// use std::{cell::RefCell, rc::Rc};
///
/// use rxsignal::prelude::*;
///
/// TestScheduler::init();
/// let seen = Rc::new(RefCell::new(None));
/// let s = seen.clone();
/// observable::from_future(async { Ok::<_, StreamError>(42) }, TestScheduler)
///   .subscribe(move |v| *s.borrow_mut() = Some(v));
///
/// TestScheduler::flush();
/// assert_eq!(*seen.borrow(), Some(42));
/// ```
pub fn from_future<F, Item, Err, S>(future: F, scheduler: S) -> Subject<Item, Err>
where
  F: Future<Output = Result<Item, Err>> + 'static,
  Item: Clone + 'static,
  Err: Clone + 'static,
  S: Scheduler,
{
  Subject::cold(move |subject| {
    let target = subject.clone();
    scheduler.spawn(Box::pin(async move {
      match future.await {
        Ok(value) => target.emit(value),
        Err(err) => target.error(err),
      }
      target.complete();
    }));
  })
}
