use futures::{Stream, StreamExt};

use super::Start;
use crate::{scheduler::Scheduler, subject::Subject};

/// Returns a stream that emits every item of an asynchronous `Stream`, then
/// completes once it is exhausted.
///
/// Each item is awaited in turn on `scheduler`, so delivery interleaves with
/// the scheduler's timers. Draining stops early if the subject is completed
/// from outside.
///
/// ```rust
/// use std::{cell::RefCell, rc::Rc};
///
/// use rxsignal::prelude::*;
///
/// TestScheduler::init();
/// let seen = Rc::new(RefCell::new(vec![]));
/// let s = seen.clone();
/// let items = futures::stream::iter(vec![1, 2, 3]);
/// observable::from_stream(items, Start::OnSubscribe, TestScheduler)
///   .subscribe(move |v| s.borrow_mut().push(v));
///
/// TestScheduler::flush();
/// assert_eq!(*seen.borrow(), vec![1, 2, 3]);
/// ```
pub fn from_stream<St, S>(stream: St, start: Start, scheduler: S) -> Subject<St::Item>
where
  St: Stream + 'static,
  St::Item: Clone + 'static,
  S: Scheduler,
{
  start.build(move |subject| {
    let target = subject.clone();
    scheduler.spawn(Box::pin(async move {
      let mut stream = Box::pin(stream);
      while let Some(item) = stream.next().await {
        if target.is_completed() {
          return;
        }
        target.emit(item);
      }
      target.complete();
    }));
  })
}
