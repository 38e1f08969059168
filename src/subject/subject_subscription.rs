use std::cell::Cell;

use super::subject_core::SubjectCore;
use crate::{
  rc::{RcDeref, RcDerefMut, WeakMutRc},
  subscription::SubscriptionLike,
};

/// Subscription handle for one entry of a subject's subscriber list.
///
/// Only a weak pointer to the subject is kept: the subject exclusively owns its
/// subscribers, and a dangling handle simply has nothing left to remove.
pub(crate) struct SubjectSubscription<Item, Err> {
  core: WeakMutRc<SubjectCore<Item, Err>>,
  id: usize,
  cancelled: Cell<bool>,
}

impl<Item, Err> SubjectSubscription<Item, Err> {
  pub(crate) fn new(core: WeakMutRc<SubjectCore<Item, Err>>, id: usize) -> Self {
    Self { core, id, cancelled: Cell::new(false) }
  }
}

impl<Item, Err> SubscriptionLike for SubjectSubscription<Item, Err> {
  fn unsubscribe_with(&self, clear_last_value: bool) {
    if self.cancelled.replace(true) {
      return;
    }
    let Some(core) = self.core.upgrade() else {
      return;
    };
    // The removed subscriber and the cleared value are dropped only after the
    // borrow is released: either may own handles to this very subject.
    let (_removed, _cleared) = {
      let mut core = core.rc_deref_mut();
      let removed = core.subscribers.remove(self.id);
      let cleared = if clear_last_value && core.subscribers.is_empty() {
        core.last_value.take()
      } else {
        None
      };
      (removed, cleared)
    };
  }

  fn is_closed(&self) -> bool {
    if self.cancelled.get() {
      return true;
    }
    self.core.upgrade().is_none_or(|core| {
      let listed = core.rc_deref().subscribers.contains(self.id);
      !listed
    })
  }
}
