/*
Outline rendering of a document tree via termtree.

Meant for logs and debugging: element tags with their attributes and
quoted text payloads, one node per line. Not an XML serializer.
 */
use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::{NodeArena, NodeId};
use crate::domain::node::NodeRef;

pub trait ToOutline {
    fn to_outline(&self) -> Tree<String>;
}

impl ToOutline for NodeRef<'_> {
    #[instrument(level = "trace", skip(self))]
    fn to_outline(&self) -> Tree<String> {
        fn build_tree(arena: &NodeArena, node_idx: NodeId, parent_tree: &mut Tree<String>) {
            if let Some(node) = arena.get(node_idx) {
                for &child_idx in node.children() {
                    if let Some(child) = arena.get(child_idx) {
                        let mut child_tree = Tree::new(child.data().to_string());
                        build_tree(arena, child_idx, &mut child_tree);
                        parent_tree.push(child_tree);
                    }
                }
            }
        }

        let mut tree = Tree::new(self.data().to_string());
        build_tree(self.arena(), self.id(), &mut tree);
        tree
    }
}

impl ToOutline for NodeArena {
    fn to_outline(&self) -> Tree<String> {
        match self.node(self.root()) {
            Ok(root) => root.to_outline(),
            Err(_) => Tree::new("Empty tree".to_string()),
        }
    }
}
