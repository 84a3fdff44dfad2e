//! Minimal XML document tree built from a streaming event parser.
//!
//! The input is tokenized by quick-xml, whose element-start, element-end and
//! text events drive a [`TreeBuilder`](domain::TreeBuilder). The builder checks
//! tag nesting and text placement and grows a [`NodeArena`](domain::NodeArena);
//! [`Document`] wraps the result for read-only traversal.
//!
//! ```
//! use xmldom::Document;
//!
//! let doc = Document::parse_str(r#"<root id="1"><a/>  <b/></root>"#).unwrap();
//! let root = doc.document_element().unwrap();
//! assert_eq!(root.attribute("id").unwrap(), "1");
//! assert_eq!(root.child_count(), 3);
//! assert_eq!(root.child_texts().len(), 1);
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod util;

pub use application::{ApplicationError, ApplicationResult, Document};
pub use config::ParseOptions;
pub use domain::{
    Attributes, DomainError, ElementRef, NodeArena, NodeId, NodeKind, NodeRef, TextRef, ToOutline,
};
