//! Parser boundary trait
//!
//! The tree builder only ever sees events pushed through [`EventHandler`];
//! whatever tokenizes the input sits behind this trait, so the builder can be
//! driven by a real parser or by a recorded event list.

use crate::domain::EventHandler;
use crate::infrastructure::error::InfraResult;

/// A producer of parser events.
pub trait EventSource {
    /// Pushes every event of the input into `handler`, in document order.
    ///
    /// Blocks until the input is exhausted. Stops at the first error, whether
    /// it comes from the input itself or from the handler.
    fn run(&mut self, handler: &mut dyn EventHandler) -> InfraResult<()>;
}
