//! Typed read-only views over arena nodes.
//!
//! A view pairs a [`NodeId`] with the arena it lives in, so traversal code
//! never has to thread the arena through by hand. Kind-specific accessors
//! live on [`ElementRef`] and [`TextRef`]; getting one from a [`NodeRef`]
//! checks the node kind first.

use std::fmt;

use tracing::instrument;

use crate::domain::arena::{Attributes, NodeArena, NodeData, NodeId, NodeKind, TreeNode};
use crate::domain::error::{DomainError, DomainResult};

impl NodeArena {
    /// Resolves a handle into a view.
    pub fn node(&self, id: NodeId) -> DomainResult<NodeRef<'_>> {
        let node = self.get(id).ok_or(DomainError::NodeNotFound)?;
        Ok(NodeRef {
            arena: self,
            id,
            node,
        })
    }
}

/// Any node: document, element or text.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    arena: &'a NodeArena,
    id: NodeId,
    node: &'a TreeNode,
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("data", self.node.data())
            .finish()
    }
}

impl<'a> NodeRef<'a> {
    fn wrap(arena: &'a NodeArena, id: NodeId) -> Option<Self> {
        arena.get(id).map(|node| NodeRef { arena, id, node })
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.node.kind()
    }

    pub fn data(&self) -> &'a NodeData {
        self.node.data()
    }

    pub fn arena(&self) -> &'a NodeArena {
        self.arena
    }

    /// None for the document root.
    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.node.parent().and_then(|parent| Self::wrap(self.arena, parent))
    }

    pub fn child_ids(&self) -> &'a [NodeId] {
        self.node.children()
    }

    pub fn child_count(&self) -> usize {
        self.node.children().len()
    }

    /// Children in document order.
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let arena = self.arena;
        self.node
            .children()
            .iter()
            .filter_map(move |&child| Self::wrap(arena, child))
    }

    /// Child at `index`, checked against the current child count.
    pub fn child(&self, index: usize) -> DomainResult<NodeRef<'a>> {
        let children = self.node.children();
        let id = *children.get(index).ok_or(DomainError::IndexOutOfRange {
            index,
            len: children.len(),
        })?;
        Self::wrap(self.arena, id).ok_or(DomainError::NodeNotFound)
    }

    /// Element children only, in document order, collected in a single pass.
    #[instrument(level = "trace", skip(self), fields(node = ?self.id))]
    pub fn child_elements(&self) -> Vec<ElementRef<'a>> {
        self.children().filter_map(|child| child.as_element().ok()).collect()
    }

    /// Text children only, in document order, collected in a single pass.
    #[instrument(level = "trace", skip(self), fields(node = ?self.id))]
    pub fn child_texts(&self) -> Vec<TextRef<'a>> {
        self.children().filter_map(|child| child.as_text().ok()).collect()
    }

    pub fn is_element(&self) -> bool {
        self.kind() == NodeKind::Element
    }

    pub fn is_text(&self) -> bool {
        self.kind() == NodeKind::Text
    }

    pub fn as_element(&self) -> DomainResult<ElementRef<'a>> {
        match self.node.data() {
            NodeData::Element { name, attributes } => Ok(ElementRef {
                node: *self,
                name,
                attributes,
            }),
            _ => Err(DomainError::KindMismatch {
                expected: NodeKind::Element,
                found: self.kind(),
            }),
        }
    }

    pub fn as_text(&self) -> DomainResult<TextRef<'a>> {
        match self.node.data() {
            NodeData::Text(text) => Ok(TextRef { node: *self, text }),
            _ => Err(DomainError::KindMismatch {
                expected: NodeKind::Text,
                found: self.kind(),
            }),
        }
    }
}

/// An element node with its name and attributes.
#[derive(Debug, Clone, Copy)]
pub struct ElementRef<'a> {
    node: NodeRef<'a>,
    name: &'a str,
    attributes: &'a Attributes,
}

impl<'a> ElementRef<'a> {
    pub fn node(&self) -> NodeRef<'a> {
        self.node
    }

    pub fn id(&self) -> NodeId {
        self.node.id
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn attributes(&self) -> &'a Attributes {
        self.attributes
    }

    /// Value of attribute `name`.
    ///
    /// Fails with [`DomainError::MissingAttribute`] when absent; use
    /// [`has_attribute`](Self::has_attribute) first unless presence is
    /// guaranteed.
    pub fn attribute(&self, name: &str) -> DomainResult<&'a str> {
        self.attributes
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| DomainError::MissingAttribute(name.to_string()))
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.node.parent()
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        self.node.children()
    }

    pub fn child_count(&self) -> usize {
        self.node.child_count()
    }

    pub fn child(&self, index: usize) -> DomainResult<NodeRef<'a>> {
        self.node.child(index)
    }

    pub fn child_elements(&self) -> Vec<ElementRef<'a>> {
        self.node.child_elements()
    }

    pub fn child_texts(&self) -> Vec<TextRef<'a>> {
        self.node.child_texts()
    }
}

/// A text node.
#[derive(Debug, Clone, Copy)]
pub struct TextRef<'a> {
    node: NodeRef<'a>,
    text: &'a str,
}

impl<'a> TextRef<'a> {
    pub fn node(&self) -> NodeRef<'a> {
        self.node
    }

    pub fn id(&self) -> NodeId {
        self.node.id
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.node.parent()
    }
}
