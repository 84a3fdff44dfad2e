//! Infrastructure layer: event producers for the tree builder
//!
//! This layer owns the tokenizer and the input stream; the domain layer only
//! sees the events it produces.

pub mod error;
pub mod reader;
pub mod traits;

pub use error::{InfraError, InfraResult};
pub use reader::{QuickXmlSource, ReplaySource};
pub use traits::EventSource;
