//! Parser events consumed by the tree builder.

use crate::domain::arena::Attributes;
use crate::domain::error::DomainResult;

/// One event of the streaming parser, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlEvent {
    ElementStart { name: String, attributes: Attributes },
    ElementEnd { name: String },
    Text(String),
}

impl XmlEvent {
    pub fn start(name: impl Into<String>) -> Self {
        XmlEvent::ElementStart {
            name: name.into(),
            attributes: Attributes::new(),
        }
    }

    pub fn start_with<K, V>(name: impl Into<String>, attributes: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        XmlEvent::ElementStart {
            name: name.into(),
            attributes: attributes
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    pub fn end(name: impl Into<String>) -> Self {
        XmlEvent::ElementEnd { name: name.into() }
    }

    pub fn text(payload: impl Into<String>) -> Self {
        XmlEvent::Text(payload.into())
    }

    /// Pushes this event into `handler`.
    pub fn dispatch(self, handler: &mut dyn EventHandler) -> DomainResult<()> {
        match self {
            XmlEvent::ElementStart { name, attributes } => handler.element_start(&name, attributes),
            XmlEvent::ElementEnd { name } => handler.element_end(&name),
            XmlEvent::Text(payload) => handler.text(&payload),
        }
    }
}

/// Push interface the parser drives.
///
/// Returning an error aborts the parse; the producer must not deliver any
/// further events afterwards.
pub trait EventHandler {
    fn element_start(&mut self, name: &str, attributes: Attributes) -> DomainResult<()>;

    fn element_end(&mut self, name: &str) -> DomainResult<()>;

    fn text(&mut self, payload: &str) -> DomainResult<()>;
}
