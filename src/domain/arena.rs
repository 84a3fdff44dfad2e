use std::collections::BTreeMap;
use std::fmt;

use generational_arena::{Arena, Index};
use itertools::Itertools;
use tracing::{instrument, trace};

use crate::domain::error::{DomainError, DomainResult};

/// Attribute name to value, one entry per name.
pub type Attributes = BTreeMap<String, String>;

/// Discriminator of the three node variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Document,
    Element,
    Text,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Document => write!(f, "document"),
            NodeKind::Element => write!(f, "element"),
            NodeKind::Text => write!(f, "text"),
        }
    }
}

/// Kind-specific payload of a tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Document,
    Element { name: String, attributes: Attributes },
    Text(String),
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Document => NodeKind::Document,
            NodeData::Element { .. } => NodeKind::Element,
            NodeData::Text(_) => NodeKind::Text,
        }
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeData::Document => write!(f, "#document"),
            NodeData::Element { name, attributes } if attributes.is_empty() => {
                write!(f, "<{}>", name)
            }
            NodeData::Element { name, attributes } => write!(
                f,
                "<{} {}>",
                name,
                attributes
                    .iter()
                    .map(|(key, value)| format!("{}={:?}", key, value))
                    .join(" ")
            ),
            NodeData::Text(text) => write!(f, "{:?}", text),
        }
    }
}

/// Handle of a node inside a [`NodeArena`].
///
/// Backed by a generational index: once the node is removed the handle
/// stops resolving, even if its slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Index);

/// Tree node in the arena-based document structure.
#[derive(Debug)]
pub struct TreeNode {
    data: NodeData,
    /// Parent handle, None only for the document root
    parent: Option<NodeId>,
    /// Owned children in document order
    children: Vec<NodeId>,
}

impl TreeNode {
    pub fn data(&self) -> &NodeData {
        &self.data
    }

    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Arena-based tree holding one XML document.
///
/// The document root is created together with the arena and lives as long
/// as the arena does. Every other node is created already attached to its
/// parent and is only ever released together with its whole subtree.
#[derive(Debug)]
pub struct NodeArena {
    arena: Arena<TreeNode>,
    root: NodeId,
}

impl Default for NodeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeArena {
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = NodeId(arena.insert(TreeNode {
            data: NodeData::Document,
            parent: None,
            children: Vec::new(),
        }));
        Self { arena, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Creates an element as the last child of `parent`.
    ///
    /// The document root accepts a single element; text nodes accept none.
    #[instrument(level = "trace", skip(self, name, attributes))]
    pub fn insert_element(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        attributes: Attributes,
    ) -> DomainResult<NodeId> {
        let name = name.into();
        if name.is_empty() {
            return Err(DomainError::EmptyName);
        }
        self.insert_node(NodeData::Element { name, attributes }, parent)
    }

    /// Creates a text node as the last child of `parent`.
    #[instrument(level = "trace", skip(self, payload))]
    pub fn insert_text(&mut self, parent: NodeId, payload: impl Into<String>) -> DomainResult<NodeId> {
        self.insert_node(NodeData::Text(payload.into()), parent)
    }

    fn insert_node(&mut self, data: NodeData, parent: NodeId) -> DomainResult<NodeId> {
        self.check_parent(parent, &data)?;
        let node_idx = NodeId(self.arena.insert(TreeNode {
            data,
            parent: Some(parent),
            children: Vec::new(),
        }));

        if let Some(parent) = self.arena.get_mut(parent.0) {
            parent.children.push(node_idx);
        }
        trace!(?node_idx, ?parent, "node attached");

        Ok(node_idx)
    }

    fn check_parent(&self, parent: NodeId, data: &NodeData) -> DomainResult<()> {
        let node = self.get(parent).ok_or(DomainError::NodeNotFound)?;
        match (node.kind(), data) {
            (NodeKind::Text, _) => Err(DomainError::InvalidParent(NodeKind::Text)),
            (NodeKind::Document, NodeData::Text(payload)) => {
                Err(DomainError::MisplacedText(payload.clone()))
            }
            (NodeKind::Document, NodeData::Element { name, .. }) if !node.children.is_empty() => {
                Err(DomainError::MultipleRoots(name.clone()))
            }
            (_, NodeData::Document) => Err(DomainError::InvalidParent(node.kind())),
            _ => Ok(()),
        }
    }

    pub fn get(&self, idx: NodeId) -> Option<&TreeNode> {
        self.arena.get(idx.0)
    }

    pub fn contains(&self, idx: NodeId) -> bool {
        self.arena.contains(idx.0)
    }

    /// Number of live nodes, the document root included.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Releases `idx` and everything below it.
    ///
    /// The node is detached from its parent before any descendant is
    /// released, so no parent ever lists a removed child. Returns the
    /// number of released nodes.
    ///
    /// # Panics
    ///
    /// Panics if the parent does not list the node exactly once; that
    /// means the tree was corrupted and no further traversal is safe.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_subtree(&mut self, idx: NodeId) -> DomainResult<usize> {
        let node = self.get(idx).ok_or(DomainError::NodeNotFound)?;
        let parent = node.parent.ok_or(DomainError::RootNotRemovable)?;
        self.unlink(parent, idx);

        let mut removed = 0;
        let mut stack = vec![idx];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.arena.remove(current.0) {
                removed += 1;
                stack.extend(node.children);
            }
        }
        trace!(removed, "subtree released");

        Ok(removed)
    }

    fn unlink(&mut self, parent: NodeId, child: NodeId) {
        let Some(parent_node) = self.arena.get_mut(parent.0) else {
            panic!("node {:?} refers to missing parent {:?}", child, parent);
        };
        let positions: Vec<usize> = parent_node.children.iter().positions(|&c| c == child).collect();
        assert_eq!(
            positions.len(),
            1,
            "node {:?} must be listed exactly once by its parent {:?}",
            child,
            parent
        );
        parent_node.children.remove(positions[0]);
    }

    /// Checks the parent/child bidirectional link invariant over the whole arena.
    pub fn is_consistent(&self) -> bool {
        self.arena.iter().all(|(idx, node)| {
            let id = NodeId(idx);
            let listed_by_parent = match node.parent {
                Some(parent) => self
                    .get(parent)
                    .is_some_and(|p| p.children.iter().filter(|&&c| c == id).count() == 1),
                None => id == self.root,
            };
            listed_by_parent
                && node
                    .children
                    .iter()
                    .all(|&c| self.get(c).is_some_and(|child| child.parent == Some(id)))
        })
    }

    /// Pre-order (document order) traversal from the root.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self, self.root)
    }

    /// Pre-order traversal of `idx` and its descendants.
    pub fn descendants(&self, idx: NodeId) -> TreeIterator<'_> {
        TreeIterator::new(self, idx)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self, self.root)
    }

    /// Height of the tree, the document root counting as level 1.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(self.root, 1)];
        while let Some((idx, level)) = stack.pop() {
            if let Some(node) = self.get(idx) {
                max_depth = max_depth.max(level);
                stack.extend(node.children.iter().map(|&child| (child, level + 1)));
            }
        }
        max_depth
    }
}

pub struct TreeIterator<'a> {
    arena: &'a NodeArena,
    stack: Vec<NodeId>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a NodeArena, start: NodeId) -> Self {
        let mut stack = Vec::new();
        if arena.contains(start) {
            stack.push(start);
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (NodeId, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get(current_idx) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children.iter().rev());
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    arena: &'a NodeArena,
    stack: Vec<(NodeId, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a NodeArena, start: NodeId) -> Self {
        let mut stack = Vec::new();
        if arena.contains(start) {
            stack.push((start, false));
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (NodeId, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (NodeArena, NodeId, NodeId, NodeId) {
        let mut arena = NodeArena::new();
        let root = arena.insert_element(arena.root(), "root", Attributes::new()).unwrap();
        let a = arena.insert_element(root, "a", Attributes::new()).unwrap();
        let text = arena.insert_text(a, "1").unwrap();
        (arena, root, a, text)
    }

    #[test]
    fn given_new_arena_when_created_then_holds_only_document_root() {
        let arena = NodeArena::new();
        assert_eq!(arena.node_count(), 1);
        let root = arena.get(arena.root()).unwrap();
        assert_eq!(root.kind(), NodeKind::Document);
        assert!(root.parent().is_none());
        assert_eq!(arena.depth(), 1);
    }

    #[test]
    fn given_insert_when_constructed_then_attached_to_parent() {
        let (arena, root, a, text) = sample();
        assert_eq!(arena.get(arena.root()).unwrap().children(), &[root]);
        assert_eq!(arena.get(a).unwrap().parent(), Some(root));
        assert_eq!(arena.get(a).unwrap().children(), &[text]);
        assert!(arena.is_consistent());
    }

    #[test]
    fn given_text_parent_when_inserting_then_rejects() {
        let (mut arena, _, _, text) = sample();
        let result = arena.insert_element(text, "b", Attributes::new());
        assert_eq!(result, Err(DomainError::InvalidParent(NodeKind::Text)));
    }

    #[test]
    fn given_document_root_when_inserting_second_element_then_rejects() {
        let (mut arena, _, _, _) = sample();
        let result = arena.insert_element(arena.root(), "other", Attributes::new());
        assert_eq!(result, Err(DomainError::MultipleRoots("other".into())));
    }

    #[test]
    fn given_document_root_when_inserting_text_then_rejects() {
        let mut arena = NodeArena::new();
        let result = arena.insert_text(arena.root(), "x");
        assert_eq!(result, Err(DomainError::MisplacedText("x".into())));
    }

    #[test]
    fn given_empty_name_when_inserting_then_rejects() {
        let mut arena = NodeArena::new();
        let result = arena.insert_element(arena.root(), "", Attributes::new());
        assert_eq!(result, Err(DomainError::EmptyName));
        assert_eq!(arena.node_count(), 1);
    }

    #[test]
    fn given_subtree_when_removed_then_parent_and_arena_forget_it() {
        let (mut arena, root, a, text) = sample();
        let removed = arena.remove_subtree(a).unwrap();
        assert_eq!(removed, 2);
        assert!(arena.get(root).unwrap().children().is_empty());
        assert!(!arena.contains(a));
        assert!(!arena.contains(text));
        assert!(arena.is_consistent());
    }

    #[test]
    fn given_stale_handle_when_removing_then_node_not_found() {
        let (mut arena, _, a, _) = sample();
        arena.remove_subtree(a).unwrap();
        assert_eq!(arena.remove_subtree(a), Err(DomainError::NodeNotFound));
    }

    #[test]
    fn given_root_when_removing_then_refuses() {
        let (mut arena, _, _, _) = sample();
        assert_eq!(arena.remove_subtree(arena.root()), Err(DomainError::RootNotRemovable));
    }

    #[test]
    fn given_tree_when_iterating_then_preorder_and_postorder_agree_on_nodes() {
        let (arena, root, a, text) = sample();
        let pre: Vec<NodeId> = arena.iter().map(|(idx, _)| idx).collect();
        let post: Vec<NodeId> = arena.iter_postorder().map(|(idx, _)| idx).collect();
        assert_eq!(pre, vec![arena.root(), root, a, text]);
        assert_eq!(post, vec![text, a, root, arena.root()]);
        assert_eq!(arena.depth(), 4);
    }

    #[test]
    fn given_element_with_attributes_when_displayed_then_renders_tag() {
        let mut attributes = Attributes::new();
        attributes.insert("id".into(), "7".into());
        let data = NodeData::Element {
            name: "item".into(),
            attributes,
        };
        assert_eq!(data.to_string(), r#"<item id="7">"#);
        assert_eq!(NodeData::Text("a b".into()).to_string(), r#""a b""#);
    }
}
