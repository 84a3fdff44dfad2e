//! Tree builder turning parser events into a document tree.

use tracing::{debug, instrument, trace, warn};

use crate::domain::arena::{Attributes, NodeArena, NodeId};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::event::EventHandler;

/// A finished tree: the arena plus the handle of its document element.
#[derive(Debug)]
pub struct BuiltTree {
    pub arena: NodeArena,
    pub document_element: Option<NodeId>,
}

/// Constructs a document tree from element-start, element-end and text events.
///
/// Keeps a stack of open elements; the innermost open element is the parent
/// of whatever the next event creates.
#[derive(Debug)]
pub struct TreeBuilder {
    arena: NodeArena,
    open_elements: Vec<NodeId>,
    document_element: Option<NodeId>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            arena: NodeArena::new(),
            open_elements: Vec::new(),
            document_element: None,
        }
    }

    /// The tree as built so far.
    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    pub fn document_element(&self) -> Option<NodeId> {
        self.document_element
    }

    /// Number of elements opened but not yet closed.
    pub fn open_count(&self) -> usize {
        self.open_elements.len()
    }

    fn element_name(&self, idx: NodeId) -> DomainResult<&str> {
        Ok(self.arena.node(idx)?.as_element()?.name())
    }

    fn open_names(&self) -> Vec<String> {
        self.open_elements
            .iter()
            .filter_map(|&idx| self.element_name(idx).ok().map(str::to_string))
            .collect()
    }

    /// Ends the event stream.
    ///
    /// With `require_closed`, elements still open at this point fail the
    /// build; otherwise the tree is accepted as it stands.
    #[instrument(level = "debug", skip(self))]
    pub fn finish(self, require_closed: bool) -> DomainResult<BuiltTree> {
        if require_closed && !self.open_elements.is_empty() {
            let open = self.open_names();
            warn!("Input ended with {} unclosed element(s): {:?}", open.len(), open);
            return Err(DomainError::UnclosedElements { open });
        }
        debug!(nodes = self.arena.node_count(), "tree complete");
        Ok(BuiltTree {
            arena: self.arena,
            document_element: self.document_element,
        })
    }
}

impl EventHandler for TreeBuilder {
    fn element_start(&mut self, name: &str, attributes: Attributes) -> DomainResult<()> {
        trace!(name, "element start");
        let parent = match (self.open_elements.last(), self.document_element) {
            (Some(&top), _) => top,
            (None, None) => self.arena.root(),
            (None, Some(_)) => {
                warn!("Got '<{}>' after the root element was closed.", name);
                return Err(DomainError::MultipleRoots(name.to_string()));
            }
        };

        let element = self.arena.insert_element(parent, name, attributes)?;
        if self.document_element.is_none() {
            self.document_element = Some(element);
        }
        self.open_elements.push(element);
        Ok(())
    }

    fn element_end(&mut self, name: &str) -> DomainResult<()> {
        trace!(name, "element end");
        let Some(&top) = self.open_elements.last() else {
            warn!("Got '/{}' but stack is empty.", name);
            return Err(DomainError::UnmatchedEnd(name.to_string()));
        };

        let expected = self.element_name(top)?;
        if expected != name {
            warn!("Got '/{}' but expected '/{}'.", name, expected);
            return Err(DomainError::MismatchedEnd {
                expected: expected.to_string(),
                found: name.to_string(),
            });
        }

        // The element stays owned by its parent; only the stack forgets it.
        self.open_elements.pop();
        Ok(())
    }

    fn text(&mut self, payload: &str) -> DomainResult<()> {
        trace!(len = payload.len(), "text");
        let Some(&top) = self.open_elements.last() else {
            warn!("Misformed XML: got text {:?} outside of root element.", payload);
            return Err(DomainError::MisplacedText(payload.to_string()));
        };

        self.arena.insert_text(top, payload)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::XmlEvent;

    fn feed(events: Vec<XmlEvent>) -> DomainResult<TreeBuilder> {
        let mut builder = TreeBuilder::new();
        for event in events {
            event.dispatch(&mut builder)?;
        }
        Ok(builder)
    }

    #[test]
    fn given_first_start_when_fed_then_becomes_document_element() {
        let builder = feed(vec![XmlEvent::start("root")]).unwrap();
        let root = builder.document_element().unwrap();
        let document = builder.arena().node(builder.arena().root()).unwrap();
        assert_eq!(document.child_ids(), &[root]);
        assert_eq!(builder.open_count(), 1);
    }

    #[test]
    fn given_nested_events_when_fed_then_children_attach_to_stack_top() {
        let builder = feed(vec![
            XmlEvent::start("root"),
            XmlEvent::start("a"),
            XmlEvent::text("1"),
            XmlEvent::end("a"),
            XmlEvent::text("2"),
            XmlEvent::end("root"),
        ])
        .unwrap();

        let root = builder.arena().node(builder.document_element().unwrap()).unwrap();
        assert_eq!(root.child_count(), 2);
        let a = root.child(0).unwrap().as_element().unwrap();
        assert_eq!(a.child_texts()[0].text(), "1");
        assert_eq!(root.child(1).unwrap().as_text().unwrap().text(), "2");
        assert_eq!(builder.open_count(), 0);
    }

    #[test]
    fn given_end_with_empty_stack_when_fed_then_unmatched_end() {
        let err = feed(vec![XmlEvent::end("root")]).unwrap_err();
        assert_eq!(err, DomainError::UnmatchedEnd("root".into()));
    }

    #[test]
    fn given_wrong_end_name_when_fed_then_mismatched_end() {
        let err = feed(vec![XmlEvent::start("root"), XmlEvent::start("a"), XmlEvent::end("b")]).unwrap_err();
        assert_eq!(
            err,
            DomainError::MismatchedEnd {
                expected: "a".into(),
                found: "b".into()
            }
        );
    }

    #[test]
    fn given_text_before_root_when_fed_then_misplaced_text() {
        let err = feed(vec![XmlEvent::text("x")]).unwrap_err();
        assert_eq!(err, DomainError::MisplacedText("x".into()));
    }

    #[test]
    fn given_text_after_root_closed_when_fed_then_misplaced_text() {
        let err = feed(vec![XmlEvent::start("root"), XmlEvent::end("root"), XmlEvent::text("x")]).unwrap_err();
        assert_eq!(err, DomainError::MisplacedText("x".into()));
    }

    #[test]
    fn given_second_top_level_element_when_fed_then_multiple_roots() {
        let err = feed(vec![XmlEvent::start("one"), XmlEvent::end("one"), XmlEvent::start("two")]).unwrap_err();
        assert_eq!(err, DomainError::MultipleRoots("two".into()));
    }

    #[test]
    fn given_unclosed_elements_when_finishing_strictly_then_lists_them() {
        let builder = feed(vec![XmlEvent::start("root"), XmlEvent::start("a")]).unwrap();
        let err = builder.finish(true).unwrap_err();
        assert_eq!(
            err,
            DomainError::UnclosedElements {
                open: vec!["root".into(), "a".into()]
            }
        );
    }

    #[test]
    fn given_unclosed_elements_when_finishing_leniently_then_keeps_partial_tree() {
        let builder = feed(vec![XmlEvent::start("root"), XmlEvent::start("a")]).unwrap();
        let tree = builder.finish(false).unwrap();
        assert_eq!(tree.arena.node_count(), 3);
        assert!(tree.document_element.is_some());
    }

    #[test]
    fn given_no_events_when_finishing_then_no_document_element() {
        let tree = TreeBuilder::new().finish(true).unwrap();
        assert!(tree.document_element.is_none());
        assert_eq!(tree.arena.node_count(), 1);
    }
}
