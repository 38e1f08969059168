use std::{
  cell::RefCell,
  fmt::{Debug, Formatter},
  rc::Rc,
};

use smallvec::SmallVec;

/// Something that can be cancelled: a subscriber registration, a scheduled
/// task, a group of either.
pub trait SubscriptionLike {
  /// Cancel. `clear_last_value` asks a subject to forget its cached value if
  /// this was its last subscriber; other implementations ignore it.
  fn unsubscribe_with(&self, clear_last_value: bool);

  fn is_closed(&self) -> bool;
}

/// Handle returned by `subscribe`.
///
/// Clones share the same registration, and every call after the first is a
/// no-op.
#[derive(Clone, Default)]
pub struct Subscription(Option<Rc<dyn SubscriptionLike>>);

impl Subscription {
  pub fn new(inner: impl SubscriptionLike + 'static) -> Self { Self(Some(Rc::new(inner))) }

  /// A subscription that is already closed. Handed out by completed streams.
  pub fn inert() -> Self { Self(None) }

  /// Detach the subscriber. If it was the subject's last one, the subject's
  /// cached value is cleared.
  #[inline]
  pub fn unsubscribe(&self) { self.unsubscribe_with(true) }

  /// Detach the subscriber but keep the subject's cached value.
  #[inline]
  pub fn unsubscribe_retaining(&self) { self.unsubscribe_with(false) }

  pub fn unsubscribe_with(&self, clear_last_value: bool) {
    if let Some(inner) = &self.0 {
      inner.unsubscribe_with(clear_last_value)
    }
  }

  pub fn is_closed(&self) -> bool { self.0.as_ref().is_none_or(|inner| inner.is_closed()) }
}

impl SubscriptionLike for Subscription {
  fn unsubscribe_with(&self, clear_last_value: bool) {
    Subscription::unsubscribe_with(self, clear_last_value)
  }

  fn is_closed(&self) -> bool { Subscription::is_closed(self) }
}

impl Debug for Subscription {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Subscription")
      .field("is_closed", &self.is_closed())
      .finish()
  }
}

/// Disposes a group of subscriptions at once, keeping the cached values of
/// the streams they were attached to.
///
/// Returned by effects; dropping it does not dispose anything.
#[derive(Clone, Default)]
pub struct Disposer(Rc<RefCell<SmallVec<[Subscription; 2]>>>);

impl Disposer {
  pub fn new() -> Self { Self::default() }

  pub fn add(&self, subscription: Subscription) { self.0.borrow_mut().push(subscription); }

  pub fn len(&self) -> usize { self.0.borrow().len() }

  pub fn is_empty(&self) -> bool { self.0.borrow().is_empty() }

  pub fn dispose(&self) {
    let subscriptions = std::mem::take(&mut *self.0.borrow_mut());
    for subscription in subscriptions {
      subscription.unsubscribe_retaining();
    }
  }
}

impl From<Subscription> for Disposer {
  fn from(subscription: Subscription) -> Self {
    let disposer = Disposer::new();
    disposer.add(subscription);
    disposer
  }
}
