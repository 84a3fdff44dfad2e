//! Domain layer: the document tree and the event-driven builder
//!
//! This layer is independent of external concerns (no I/O, no tokenizer, no config loading).

pub mod arena;
pub mod builder;
pub mod error;
pub mod event;
pub mod node;
pub mod outline;

pub use arena::{Attributes, NodeArena, NodeData, NodeId, NodeKind, TreeNode};
pub use builder::{BuiltTree, TreeBuilder};
pub use error::{DomainError, DomainResult};
pub use event::{EventHandler, XmlEvent};
pub use node::{ElementRef, NodeRef, TextRef};
pub use outline::ToOutline;
