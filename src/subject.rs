//! The multicast stream primitive.
//!
//! A [`Subject`] is a cloneable handle to one shared stream: every clone
//! emits into, and subscribes to, the same subscriber list. It caches the last
//! value (replayed to new subscribers) and the last error, and may carry a
//! producer that runs exactly once, on the first subscription.
//!
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//!
//! use rxsignal::prelude::*;
//!
//! let seen = Rc::new(RefCell::new(vec![]));
//! let subject = Subject::<i32>::with_value(1);
//!
//! let s = seen.clone();
//! subject.subscribe(move |v| s.borrow_mut().push(v));
//! subject.emit(2);
//! subject.complete();
//! subject.emit(3);
//!
//! assert_eq!(*seen.borrow(), vec![1, 2]);
//! assert!(subject.is_completed());
//! ```

use std::fmt::{Debug, Formatter};

use crate::{
  error::StreamError,
  rc::{MutRc, RcDeref, RcDerefMut},
  subscriber::Subscriber,
  subscription::Subscription,
};

mod subject_core;
mod subject_subscription;
mod subscribers;

use subject_core::{Lifecycle, SubjectCore};
use subject_subscription::SubjectSubscription;
use subscribers::{broadcast_complete, broadcast_error, broadcast_value};

/// Order in which `error` callbacks are invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorDelivery {
  /// Most recent subscriber first.
  #[default]
  Reverse,
  /// Subscription order, like `next` and `complete`.
  Forward,
}

/// A multicast stream with a replay-one cache.
pub struct Subject<Item, Err = StreamError> {
  core: MutRc<SubjectCore<Item, Err>>,
}

impl<Item, Err> Clone for Subject<Item, Err> {
  #[inline]
  fn clone(&self) -> Self { Self { core: self.core.clone() } }
}

impl<Item, Err> Default for Subject<Item, Err> {
  fn default() -> Self { Self::from_core(SubjectCore::new(None, Lifecycle::Started)) }
}

impl<Item, Err> Debug for Subject<Item, Err> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let core = self.core.rc_deref();
    f.debug_struct("Subject")
      .field("id", &self.id())
      .field("subscribers", &core.subscribers.len())
      .field("has_value", &core.last_value.is_some())
      .field("completed", &core.completed)
      .finish()
  }
}

impl<Item, Err> Subject<Item, Err> {
  fn from_core(core: SubjectCore<Item, Err>) -> Self { Self { core: MutRc::own(core) } }

  /// A hot subject with no cached value.
  pub fn new() -> Self { Self::default() }

  /// A hot subject whose cached value is `value`.
  pub fn with_value(value: Item) -> Self {
    Self::from_core(SubjectCore::new(Some(value), Lifecycle::Started))
  }

  /// A cold subject: `producer` runs once, when the first subscriber arrives,
  /// and feeds the subject it is handed.
  pub fn cold(producer: impl FnOnce(&Subject<Item, Err>) + 'static) -> Self {
    Self::from_core(SubjectCore::new(None, Lifecycle::Idle { producer: Box::new(producer) }))
  }

  /// Install a producer to run on the next subscription, replacing any
  /// producer that has not run yet. Ignored once the subject completed.
  pub fn on_subscribe(&self, producer: impl FnOnce(&Subject<Item, Err>) + 'static) {
    let _replaced = {
      let mut core = self.core.rc_deref_mut();
      if core.is_closing() {
        return;
      }
      std::mem::replace(&mut core.lifecycle, Lifecycle::Idle { producer: Box::new(producer) })
    };
  }

  pub fn set_error_delivery(&self, delivery: ErrorDelivery) {
    self.core.rc_deref_mut().error_delivery = delivery;
  }

  pub fn error_delivery(&self) -> ErrorDelivery { self.core.rc_deref().error_delivery }

  #[inline]
  pub fn is_completed(&self) -> bool { self.core.rc_deref().completed }

  /// Whether a producer is still waiting for the first subscriber.
  pub fn is_cold(&self) -> bool { self.core.rc_deref().lifecycle.is_idle() }

  pub fn subscriber_count(&self) -> usize { self.core.rc_deref().subscribers.len() }

  /// Identity of the underlying stream, shared by every clone.
  #[inline]
  pub fn id(&self) -> usize { self.core.addr() }

  /// Apply an operator to this subject.
  pub fn pipe<Out, Op>(&self, op: Op) -> Subject<Out, Err>
  where
    Op: FnOnce(Subject<Item, Err>) -> Subject<Out, Err>,
  {
    op(self.clone())
  }

  /// Complete the stream: every subscriber's `complete` runs in subscription
  /// order, then the list is dropped for good. A producer that never ran is
  /// discarded.
  ///
  /// Values and errors pushed from a `complete` callback are ignored; a
  /// subscriber added from one is completed as well.
  pub fn complete(&self) {
    let _producer = {
      let mut core = self.core.rc_deref_mut();
      if core.is_closing() {
        return;
      }
      core.completing = true;
      core.lifecycle.start()
    };
    loop {
      let subscribers = self.core.rc_deref_mut().subscribers.take();
      if subscribers.is_empty() {
        break;
      }
      broadcast_complete(subscribers);
    }
    let mut core = self.core.rc_deref_mut();
    core.completing = false;
    core.completed = true;
    tracing::trace!(subject = self.core.addr(), "subject completed");
  }
}

impl<Item: Clone + 'static, Err: Clone + 'static> Subject<Item, Err> {
  /// Subscribe a `next` callback. The cached value, if any, is delivered to it
  /// right away.
  pub fn subscribe(&self, next: impl Fn(Item) + 'static) -> Subscription {
    self.subscribe_with(Subscriber::from_next(next), true)
  }

  /// Subscribe a full subscriber, replaying the cached value.
  pub fn subscribe_all(&self, subscriber: Subscriber<Item, Err>) -> Subscription {
    self.subscribe_with(subscriber, true)
  }

  /// Subscribe `subscriber`; `replay_current` selects whether the cached value
  /// is delivered to it immediately.
  ///
  /// A completed subject hands back an inert subscription. Subscribing the
  /// same subscriber twice keeps a single listener, and both handles refer to
  /// it. The first subscription ever made starts the subject's producer.
  pub fn subscribe_with(
    &self, subscriber: Subscriber<Item, Err>, replay_current: bool,
  ) -> Subscription {
    let (id, replay, cached_error, producer) = {
      let mut core = self.core.rc_deref_mut();
      if core.completed {
        return Subscription::inert();
      }
      if let Some(id) = core.subscribers.find(&subscriber) {
        return Subscription::new(SubjectSubscription::new(self.core.downgrade(), id));
      }
      let id = core.subscribers.add(subscriber.clone());
      let replay = if replay_current { core.last_value.clone() } else { None };
      let cached_error = if subscriber.handles_error() { core.last_error.clone() } else { None };
      (id, replay, cached_error, core.lifecycle.start())
    };

    if let Some(value) = replay {
      subscriber.next(value);
    }
    if let Some(err) = cached_error {
      subscriber.error(err);
    }
    if let Some(producer) = producer {
      tracing::trace!(subject = self.id(), "starting producer");
      producer(self);
    }
    Subscription::new(SubjectSubscription::new(self.core.downgrade(), id))
  }

  /// Cache `value` and deliver it to every current subscriber, in order.
  /// Does nothing once completed.
  pub fn emit(&self, value: Item) {
    let (subscribers, _previous) = {
      let mut core = self.core.rc_deref_mut();
      if core.is_closing() {
        return;
      }
      let previous = core.last_value.replace(value.clone());
      (core.subscribers.snapshot(), previous)
    };
    broadcast_value(subscribers, value);
  }

  /// Cache `err` and deliver it to the subscribers that handle errors, most
  /// recent first unless [`ErrorDelivery::Forward`] was selected. The stream
  /// stays open.
  pub fn error(&self, err: Err) {
    let (subscribers, delivery, _previous) = {
      let mut core = self.core.rc_deref_mut();
      if core.is_closing() {
        return;
      }
      let previous = core.last_error.replace(err.clone());
      (core.subscribers.snapshot(), core.error_delivery, previous)
    };
    if !subscribers.iter().any(Subscriber::handles_error) {
      tracing::debug!(
        subject = self.id(),
        subscribers = subscribers.len(),
        "error dropped, no subscriber handles errors"
      );
    }
    broadcast_error(subscribers, err, delivery);
  }

  /// The cached value: the last emitted one, or the initial one.
  pub fn value(&self) -> Option<Item> { self.core.rc_deref().last_value.clone() }

  /// The last error delivered through this subject.
  pub fn last_error(&self) -> Option<Err> { self.core.rc_deref().last_error.clone() }
}
