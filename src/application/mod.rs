//! Application layer: the document facade
//!
//! This layer wires an event source to the tree builder and owns the result.

pub mod document;
pub mod error;
pub mod error_ext;

pub use document::Document;
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
