use super::{subscribers::Subscribers, ErrorDelivery, Subject};

/// Deferred production of a cold subject. Receives the subject it feeds.
pub(crate) type Producer<Item, Err> = Box<dyn FnOnce(&Subject<Item, Err>)>;

/// Whether a subject still has a producer waiting for its first subscriber.
///
/// Subjects built without a producer start out `Started`: they are hot and
/// only ever emit what their owner pushes.
pub(crate) enum Lifecycle<Item, Err> {
  Idle { producer: Producer<Item, Err> },
  Started,
}

impl<Item, Err> Lifecycle<Item, Err> {
  /// Move to `Started`, handing back the producer if it had not run yet.
  pub fn start(&mut self) -> Option<Producer<Item, Err>> {
    match std::mem::replace(self, Lifecycle::Started) {
      Lifecycle::Idle { producer } => Some(producer),
      Lifecycle::Started => None,
    }
  }

  pub fn is_idle(&self) -> bool { matches!(self, Lifecycle::Idle { .. }) }
}

/// Everything a subject owns, behind a single `MutRc`.
pub(crate) struct SubjectCore<Item, Err> {
  pub(crate) subscribers: Subscribers<Item, Err>,
  pub(crate) last_value: Option<Item>,
  pub(crate) last_error: Option<Err>,
  pub(crate) completed: bool,
  /// Set while `complete` is broadcasting.
  pub(crate) completing: bool,
  pub(crate) lifecycle: Lifecycle<Item, Err>,
  pub(crate) error_delivery: ErrorDelivery,
}

impl<Item, Err> SubjectCore<Item, Err> {
  /// No more values or errors are accepted.
  pub(crate) fn is_closing(&self) -> bool { self.completed || self.completing }

  pub(crate) fn new(last_value: Option<Item>, lifecycle: Lifecycle<Item, Err>) -> Self {
    Self {
      subscribers: Subscribers::default(),
      last_value,
      last_error: None,
      completed: false,
      completing: false,
      lifecycle,
      error_delivery: ErrorDelivery::default(),
    }
  }
}
