use smallvec::SmallVec;

use super::ErrorDelivery;
use crate::subscriber::Subscriber;

/// The subscribers of one subject, in subscription order.
///
/// Every entry is keyed by an id that is never reused, so a subscription
/// handle can remove exactly its own entry even after others came and went.
pub(crate) struct Subscribers<Item, Err> {
  entries: Vec<(usize, Subscriber<Item, Err>)>,
  next_id: usize,
}

/// A copy of the subscriber list taken right before a broadcast.
///
/// Callbacks run against the snapshot with no borrow of the subject held, so
/// they are free to subscribe, unsubscribe or emit again.
pub(crate) type Snapshot<Item, Err> = SmallVec<[Subscriber<Item, Err>; 2]>;

impl<Item, Err> Default for Subscribers<Item, Err> {
  fn default() -> Self { Self { entries: Vec::new(), next_id: 0 } }
}

impl<Item, Err> Subscribers<Item, Err> {
  /// Add a subscriber and return its id.
  pub fn add(&mut self, subscriber: Subscriber<Item, Err>) -> usize {
    let id = self.next_id;
    self.next_id += 1;
    self.entries.push((id, subscriber));
    id
  }

  /// Id of an entry that is the same subscriber as `subscriber`.
  pub fn find(&self, subscriber: &Subscriber<Item, Err>) -> Option<usize> {
    self
      .entries
      .iter()
      .find(|(_, s)| s.same_as(subscriber))
      .map(|(id, _)| *id)
  }

  pub fn remove(&mut self, id: usize) -> Option<Subscriber<Item, Err>> {
    let idx = self.entries.iter().position(|(i, _)| *i == id)?;
    Some(self.entries.remove(idx).1)
  }

  #[inline]
  pub fn contains(&self, id: usize) -> bool { self.entries.iter().any(|(i, _)| *i == id) }

  #[inline]
  pub fn len(&self) -> usize { self.entries.len() }

  #[inline]
  pub fn is_empty(&self) -> bool { self.entries.is_empty() }

  pub fn snapshot(&self) -> Snapshot<Item, Err> {
    self.entries.iter().map(|(_, s)| s.clone()).collect()
  }

  /// Detach every subscriber. Ids keep counting from where they were.
  pub fn take(&mut self) -> Snapshot<Item, Err> {
    self.entries.drain(..).map(|(_, s)| s).collect()
  }
}

/// Broadcast a value, cloning it for all subscribers except the last one,
/// which receives the moved value.
pub(crate) fn broadcast_value<Item: Clone, Err>(subscribers: Snapshot<Item, Err>, value: Item) {
  let mut iter = subscribers.iter().peekable();
  while let Some(subscriber) = iter.next() {
    if iter.peek().is_some() {
      subscriber.next(value.clone());
    } else {
      subscriber.next(value);
      break;
    }
  }
}

pub(crate) fn broadcast_error<Item, Err: Clone>(
  subscribers: Snapshot<Item, Err>, err: Err, delivery: ErrorDelivery,
) {
  let handlers: SmallVec<[&Subscriber<Item, Err>; 2]> = match delivery {
    ErrorDelivery::Reverse => subscribers.iter().rev().filter(|s| s.handles_error()).collect(),
    ErrorDelivery::Forward => subscribers.iter().filter(|s| s.handles_error()).collect(),
  };
  let mut iter = handlers.into_iter().peekable();
  while let Some(subscriber) = iter.next() {
    if iter.peek().is_some() {
      subscriber.error(err.clone());
    } else {
      subscriber.error(err);
      break;
    }
  }
}

pub(crate) fn broadcast_complete<Item, Err>(subscribers: Snapshot<Item, Err>) {
  for subscriber in subscribers.iter() {
    subscriber.complete();
  }
}
