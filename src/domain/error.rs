//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::arena::NodeKind;

/// Domain errors cover structural violations found while building a tree
/// and caller mistakes made while querying one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("got '/{found}' but expected '/{expected}'")]
    MismatchedEnd { expected: String, found: String },

    #[error("got '/{0}' but no element is open")]
    UnmatchedEnd(String),

    #[error("text outside of root element: {0:?}")]
    MisplacedText(String),

    #[error("second top-level element: <{0}>")]
    MultipleRoots(String),

    #[error("input ended with unclosed elements: {}", open.join(" > "))]
    UnclosedElements { open: Vec<String> },

    #[error("missing attribute: {0}")]
    MissingAttribute(String),

    #[error("child index {index} out of range (node has {len} children)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("expected {expected} node, found {found}")]
    KindMismatch { expected: NodeKind, found: NodeKind },

    #[error("node not found (stale or foreign handle)")]
    NodeNotFound,

    #[error("document root is released with its arena, not removed")]
    RootNotRemovable,

    #[error("element name must not be empty")]
    EmptyName,

    #[error("{0} node cannot have children")]
    InvalidParent(NodeKind),
}

impl DomainError {
    /// True for errors raised while consuming parser events.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            DomainError::MismatchedEnd { .. }
                | DomainError::UnmatchedEnd(_)
                | DomainError::MisplacedText(_)
                | DomainError::MultipleRoots(_)
                | DomainError::UnclosedElements { .. }
        )
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_mismatched_end_when_displayed_then_names_both_tags() {
        let err = DomainError::MismatchedEnd {
            expected: "a".into(),
            found: "b".into(),
        };
        assert_eq!(err.to_string(), "got '/b' but expected '/a'");
    }

    #[test]
    fn given_unclosed_elements_when_displayed_then_joins_path() {
        let err = DomainError::UnclosedElements {
            open: vec!["root".into(), "a".into()],
        };
        assert_eq!(err.to_string(), "input ended with unclosed elements: root > a");
    }

    #[test]
    fn given_query_errors_when_classified_then_not_structural() {
        assert!(!DomainError::MissingAttribute("id".into()).is_structural());
        assert!(!DomainError::IndexOutOfRange { index: 3, len: 1 }.is_structural());
        assert!(DomainError::UnmatchedEnd("a".into()).is_structural());
        assert!(DomainError::MisplacedText("x".into()).is_structural());
    }
}
