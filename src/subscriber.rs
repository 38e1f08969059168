//! The consumer side of a stream.
//!
//! A [`Subscriber`] is a record of up to three optional callbacks. A plain
//! `next` closure handed to `subscribe` is wrapped into the record form once,
//! so emission never has to look at the shape again.

use std::rc::Rc;

type NextFn<Item> = Rc<dyn Fn(Item)>;
type ErrorFn<Err> = Rc<dyn Fn(Err)>;
type CompleteFn = Rc<dyn Fn()>;

/// Callbacks receiving the `next`, `error` and `complete` events of a stream.
///
/// Cloning a subscriber shares its callbacks, and a clone counts as the same
/// subscriber: subscribing it twice to one subject keeps a single listener.
///
/// ```rust
/// use std::{cell::RefCell, rc::Rc};
///
/// use rxsignal::prelude::*;
///
/// let log = Rc::new(RefCell::new(vec![]));
/// let (l1, l2) = (log.clone(), log.clone());
/// let subscriber = Subscriber::<i32>::default()
///   .on_next(move |v| l1.borrow_mut().push(v))
///   .on_complete(move || l2.borrow_mut().push(-1));
///
/// of![1, 2].subscribe_all(subscriber);
/// assert_eq!(*log.borrow(), vec![1, 2, -1]);
/// ```
pub struct Subscriber<Item, Err = crate::error::StreamError> {
  next: Option<NextFn<Item>>,
  error: Option<ErrorFn<Err>>,
  complete: Option<CompleteFn>,
}

impl<Item, Err> Default for Subscriber<Item, Err> {
  fn default() -> Self { Self { next: None, error: None, complete: None } }
}

impl<Item, Err> Clone for Subscriber<Item, Err> {
  fn clone(&self) -> Self {
    Self { next: self.next.clone(), error: self.error.clone(), complete: self.complete.clone() }
  }
}

impl<Item, Err> Subscriber<Item, Err> {
  pub fn from_next(next: impl Fn(Item) + 'static) -> Self { Self::default().on_next(next) }

  pub fn on_next(mut self, next: impl Fn(Item) + 'static) -> Self {
    self.next = Some(Rc::new(next));
    self
  }

  pub fn on_error(mut self, error: impl Fn(Err) + 'static) -> Self {
    self.error = Some(Rc::new(error));
    self
  }

  pub fn on_complete(mut self, complete: impl Fn() + 'static) -> Self {
    self.complete = Some(Rc::new(complete));
    self
  }

  #[inline]
  pub fn next(&self, value: Item) {
    if let Some(next) = &self.next {
      next(value)
    }
  }

  #[inline]
  pub fn error(&self, err: Err) {
    if let Some(error) = &self.error {
      error(err)
    }
  }

  #[inline]
  pub fn complete(&self) {
    if let Some(complete) = &self.complete {
      complete()
    }
  }

  pub fn handles_error(&self) -> bool { self.error.is_some() }

  /// Whether `other` is the same subscriber: it shares this subscriber's
  /// `next` callback, or every one of its callbacks.
  pub fn same_as(&self, other: &Self) -> bool {
    if let (Some(a), Some(b)) = (&self.next, &other.next) {
      if Rc::ptr_eq(a, b) {
        return true;
      }
    }
    let any = self.next.is_some() || self.error.is_some() || self.complete.is_some();
    any
      && same_callback(&self.next, &other.next)
      && same_callback(&self.error, &other.error)
      && same_callback(&self.complete, &other.complete)
  }
}

fn same_callback<F: ?Sized>(a: &Option<Rc<F>>, b: &Option<Rc<F>>) -> bool {
  match (a, b) {
    (Some(a), Some(b)) => Rc::ptr_eq(a, b),
    (None, None) => true,
    _ => false,
  }
}

#[cfg(test)]
mod tests {
  use std::cell::Cell;

  use super::*;
  use crate::error::StreamError;

  #[test]
  fn missing_callbacks_are_skipped() {
    let hits = Rc::new(Cell::new(0));
    let h = hits.clone();
    let subscriber = Subscriber::<i32, StreamError>::from_next(move |v| h.set(h.get() + v));
    subscriber.next(2);
    subscriber.error(StreamError::msg("ignored"));
    subscriber.complete();
    assert_eq!(hits.get(), 2);
    assert!(!subscriber.handles_error());
  }

  #[test]
  fn identity_follows_shared_callbacks() {
    let a = Subscriber::<i32, StreamError>::from_next(|_| {});
    let b = a.clone();
    let c = Subscriber::<i32, StreamError>::from_next(|_| {});
    assert!(a.same_as(&b));
    assert!(!a.same_as(&c));

    let only_complete = Subscriber::<i32, StreamError>::default().on_complete(|| {});
    assert!(only_complete.same_as(&only_complete.clone()));
    assert!(!Subscriber::<i32, StreamError>::default().same_as(&Subscriber::default()));
  }
}
