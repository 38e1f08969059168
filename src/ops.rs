//! Stream operators.
//!
//! Every function here returns an operator: a closure turning a source
//! [`Subject`] into a new result subject. The result is cold; it subscribes
//! upstream only once it gets its first subscriber, and its sources are never
//! mutated. The same operator can be applied to any number of sources, each
//! application owning its own state.

use crate::{subject::Subject, subscriber::Subscriber};

mod concat;
mod concat_map;
mod debounce;
mod delay;
mod filter;
mod flat_map;
mod map;
mod merge;
mod reduce;
mod switch_map;
mod tap;
mod throttle;

pub use concat::concat;
pub use concat_map::concat_map;
pub use debounce::debounce;
pub use delay::delay;
pub use filter::filter;
pub use flat_map::flat_map;
pub use map::map;
pub use merge::{merge, merge_array};
pub use reduce::reduce;
pub use switch_map::switch_map;
pub use tap::tap;
pub use throttle::throttle;

/// A subscriber that hands values to `next` and relays errors and completion
/// straight to `result`.
pub(crate) fn relay<A, B, Err>(
  result: &Subject<B, Err>, next: impl Fn(A) + 'static,
) -> Subscriber<A, Err>
where
  B: Clone + 'static,
  Err: Clone + 'static,
{
  let (on_error, on_complete) = (result.clone(), result.clone());
  Subscriber::default()
    .on_next(next)
    .on_error(move |err| on_error.error(err))
    .on_complete(move || on_complete.complete())
}
