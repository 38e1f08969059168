//! The observable contract and the ways to create streams.
//!
//! Every stream in this crate is a [`Subject`]; [`Observable`] is the
//! capability shared by subjects and signals, and [`ObservableExt`] adds the
//! operators in method form.

use crate::{
  error::StreamError,
  ops,
  scheduler::{Duration, Scheduler},
  subject::Subject,
  subscriber::Subscriber,
  subscription::Subscription,
};

mod from_future;
mod from_iter;
mod from_stream;
mod interval;
mod timer;

pub use from_future::from_future;
pub use from_iter::{from_iter, from_iter_with, range};
pub use from_stream::from_stream;
pub use interval::interval;
pub use timer::from_timer;

/// When a creation operator starts producing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Start {
  /// On the first subscription.
  #[default]
  OnSubscribe,
  /// Right away. Values produced before anyone subscribes are lost, except
  /// the one left in the cache.
  Now,
}

impl Start {
  pub(crate) fn build<Item, Err>(
    self, producer: impl FnOnce(&Subject<Item, Err>) + 'static,
  ) -> Subject<Item, Err> {
    match self {
      Start::OnSubscribe => Subject::cold(producer),
      Start::Now => {
        let subject = Subject::new();
        producer(&subject);
        subject
      }
    }
  }
}

/// Something values can be pushed through and subscribed to.
pub trait Observable<Item, Err = StreamError>
where
  Item: Clone + 'static,
  Err: Clone + 'static,
{
  /// The subject backing this observable.
  fn stream(&self) -> Subject<Item, Err>;

  fn subscribe(&self, next: impl Fn(Item) + 'static) -> Subscription {
    self.stream().subscribe(next)
  }

  fn subscribe_all(&self, subscriber: Subscriber<Item, Err>) -> Subscription {
    self.stream().subscribe_all(subscriber)
  }

  fn subscribe_with(
    &self, subscriber: Subscriber<Item, Err>, replay_current: bool,
  ) -> Subscription {
    self.stream().subscribe_with(subscriber, replay_current)
  }

  fn emit(&self, value: Item) { self.stream().emit(value) }

  fn complete(&self) { self.stream().complete() }

  fn error(&self, err: Err) { self.stream().error(err) }

  fn value(&self) -> Option<Item> { self.stream().value() }

  fn is_completed(&self) -> bool { self.stream().is_completed() }
}

impl<Item, Err> Observable<Item, Err> for Subject<Item, Err>
where
  Item: Clone + 'static,
  Err: Clone + 'static,
{
  #[inline]
  fn stream(&self) -> Subject<Item, Err> { self.clone() }
}

/// Operators in method form. Each call builds a new stream and leaves the
/// receiver untouched.
pub trait ObservableExt<Item, Err = StreamError>: Observable<Item, Err>
where
  Item: Clone + 'static,
  Err: Clone + 'static,
{
  fn map<Out: Clone + 'static>(&self, f: impl Fn(Item) -> Out + 'static) -> Subject<Out, Err> {
    ops::map(f)(self.stream())
  }

  fn filter(&self, predicate: impl Fn(&Item, usize) -> bool + 'static) -> Subject<Item, Err> {
    ops::filter(predicate)(self.stream())
  }

  fn tap(&self, f: impl Fn(&Item) + 'static) -> Subject<Item, Err> { ops::tap(f)(self.stream()) }

  fn reduce<Acc: Clone + 'static>(
    &self, f: impl Fn(Acc, Item) -> Acc + 'static, seed: Acc,
  ) -> Subject<Acc, Err> {
    ops::reduce(f, seed)(self.stream())
  }

  fn debounce<S: Scheduler>(&self, period: Duration, scheduler: S) -> Subject<Item, Err> {
    ops::debounce(period, scheduler)(self.stream())
  }

  fn throttle<S: Scheduler>(&self, period: Duration, scheduler: S) -> Subject<Item, Err> {
    ops::throttle(period, scheduler)(self.stream())
  }

  fn delay<S: Scheduler>(&self, period: Duration, scheduler: S) -> Subject<Item, Err> {
    ops::delay(period, scheduler)(self.stream())
  }

  fn merge(&self, other: &impl Observable<Item, Err>) -> Subject<Item, Err> {
    ops::merge(other.stream())(self.stream())
  }

  /// Values of `self`, then the values `second` produced meanwhile or later.
  fn concat(&self, second: &impl Observable<Item, Err>) -> Subject<Item, Err> {
    ops::concat(second.stream())(self.stream())
  }

  fn flat_map<Out: Clone + 'static>(
    &self, f: impl Fn(Item) -> Subject<Out, Err> + 'static,
  ) -> Subject<Out, Err> {
    ops::flat_map(f)(self.stream())
  }

  fn switch_map<Out: Clone + 'static>(
    &self, f: impl Fn(Item) -> Subject<Out, Err> + 'static,
  ) -> Subject<Out, Err> {
    ops::switch_map(f)(self.stream())
  }

  fn concat_map<Out: Clone + 'static>(
    &self, f: impl Fn(Item) -> Subject<Out, Err> + 'static,
  ) -> Subject<Out, Err> {
    ops::concat_map(f)(self.stream())
  }

  fn pipe<Out>(
    &self, op: impl FnOnce(Subject<Item, Err>) -> Subject<Out, Err>,
  ) -> Subject<Out, Err> {
    op(self.stream())
  }
}

impl<Item, Err, T> ObservableExt<Item, Err> for T
where
  T: Observable<Item, Err>,
  Item: Clone + 'static,
  Err: Clone + 'static,
{
}
