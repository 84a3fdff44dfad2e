//! Document facade: runs a parser to completion and keeps the finished tree.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use termtree::Tree;
use tracing::{debug, instrument};

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::error_ext::IoResultExt;
use crate::config::ParseOptions;
use crate::domain::{DomainResult, ElementRef, NodeArena, NodeId, NodeRef, ToOutline, TreeBuilder};
use crate::infrastructure::{EventSource, QuickXmlSource};

/// A parsed XML document.
///
/// Construction is all-or-nothing: either the whole input was turned into a
/// tree, or an error is returned and everything built so far is released.
/// The finished tree is read-only.
///
/// # Examples
///
/// ```
/// use xmldom::Document;
///
/// let doc = Document::parse_str("<root><a/>text<b/></root>").unwrap();
/// let root = doc.document_element().unwrap();
/// assert_eq!(root.name(), "root");
/// assert_eq!(root.child_elements().len(), 2);
/// ```
#[derive(Debug)]
pub struct Document {
    arena: NodeArena,
    document_element: Option<NodeId>,
}

impl Document {
    /// Parses a readable stream with default options.
    ///
    /// The stream is only borrowed for reading; closing it stays with the caller.
    pub fn from_reader<R: Read>(input: R) -> ApplicationResult<Self> {
        Self::from_reader_with_options(input, &ParseOptions::default())
    }

    pub fn from_reader_with_options<R: Read>(input: R, options: &ParseOptions) -> ApplicationResult<Self> {
        let mut source = QuickXmlSource::new(BufReader::new(input), options);
        Self::from_source(&mut source, options)
    }

    /// Parses an in-memory XML string with default options.
    pub fn parse_str(input: &str) -> ApplicationResult<Self> {
        Self::parse_str_with_options(input, &ParseOptions::default())
    }

    pub fn parse_str_with_options(input: &str, options: &ParseOptions) -> ApplicationResult<Self> {
        let mut source = QuickXmlSource::new(input.as_bytes(), options);
        Self::from_source(&mut source, options)
    }

    /// Parses the file at `path` with default options.
    pub fn from_path(path: &Path) -> ApplicationResult<Self> {
        Self::from_path_with_options(path, &ParseOptions::default())
    }

    #[instrument(level = "debug", skip(options))]
    pub fn from_path_with_options(path: &Path, options: &ParseOptions) -> ApplicationResult<Self> {
        let file = File::open(path).with_path_context("open", path)?;
        Self::from_reader_with_options(file, options)
    }

    /// Builds a document from any event producer.
    #[instrument(level = "debug", skip_all)]
    pub fn from_source(source: &mut dyn EventSource, options: &ParseOptions) -> ApplicationResult<Self> {
        let mut builder = TreeBuilder::new();
        source.run(&mut builder)?;
        let tree = builder.finish(options.require_closed_root)?;
        debug!(
            nodes = tree.arena.node_count(),
            has_document_element = tree.document_element.is_some(),
            "document parsed"
        );
        Ok(Self {
            arena: tree.arena,
            document_element: tree.document_element,
        })
    }

    /// The single top-level element; None only when the input had no elements.
    pub fn document_element(&self) -> Option<ElementRef<'_>> {
        self.document_element
            .and_then(|idx| self.arena.node(idx).ok())
            .and_then(|node| node.as_element().ok())
    }

    /// The document node itself.
    pub fn root(&self) -> Option<NodeRef<'_>> {
        self.arena.node(self.arena.root()).ok()
    }

    pub fn node(&self, idx: NodeId) -> DomainResult<NodeRef<'_>> {
        self.arena.node(idx)
    }

    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    /// Gives up the facade and hands the tree to the caller.
    pub fn into_arena(self) -> NodeArena {
        self.arena
    }

    pub fn node_count(&self) -> usize {
        self.arena.node_count()
    }

    pub fn depth(&self) -> usize {
        self.arena.depth()
    }

    pub fn outline(&self) -> Tree<String> {
        self.arena.to_outline()
    }
}

impl FromStr for Document {
    type Err = ApplicationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}
