//! Event producers: quick-xml over a byte stream, or a recorded event list.

use std::borrow::Cow;
use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, instrument, trace};

use crate::config::ParseOptions;
use crate::domain::{Attributes, EventHandler, XmlEvent};
use crate::infrastructure::error::{InfraError, InfraResult};
use crate::infrastructure::traits::EventSource;

/// Drives a quick-xml reader and forwards element and text events.
///
/// Tag nesting is left unchecked by the tokenizer; matching
/// start and end tags is the tree builder's job. Self-closing tags are
/// reported as a start followed by an end. Comments, processing
/// instructions, declarations and DOCTYPE are dropped; CDATA arrives as
/// plain text.
pub struct QuickXmlSource<R: BufRead> {
    reader: Reader<R>,
    skip_outer_whitespace: bool,
    unescape_text: bool,
    depth: usize,
}

impl<R: BufRead> QuickXmlSource<R> {
    pub fn new(input: R, options: &ParseOptions) -> Self {
        let mut reader = Reader::from_reader(input);
        reader.expand_empty_elements(true);
        reader.check_end_names(false);
        reader.trim_text(options.trim_text);
        Self {
            reader,
            skip_outer_whitespace: options.skip_outer_whitespace,
            unescape_text: options.unescape_text,
            depth: 0,
        }
    }

    fn xml_err(&self, source: quick_xml::Error) -> InfraError {
        InfraError::Xml {
            position: self.reader.buffer_position(),
            source,
        }
    }

    fn decode<'b>(&self, bytes: &'b [u8]) -> InfraResult<Cow<'b, str>> {
        self.reader.decoder().decode(bytes).map_err(|e| self.xml_err(e))
    }

    fn attributes(&self, start: &BytesStart<'_>) -> InfraResult<Attributes> {
        let mut attributes = Attributes::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| self.xml_err(e.into()))?;
            let key = self.decode(attr.key.as_ref())?.into_owned();
            let value = attr.unescape_value().map_err(|e| self.xml_err(e))?.into_owned();
            attributes.insert(key, value);
        }
        Ok(attributes)
    }

    fn forward_text(&self, text: &str, handler: &mut dyn EventHandler) -> InfraResult<()> {
        if self.depth == 0 && self.skip_outer_whitespace && text.trim().is_empty() {
            trace!("skipping whitespace outside root element");
            return Ok(());
        }
        handler.text(text)?;
        Ok(())
    }
}

impl<R: BufRead> EventSource for QuickXmlSource<R> {
    #[instrument(level = "debug", skip_all)]
    fn run(&mut self, handler: &mut dyn EventHandler) -> InfraResult<()> {
        let mut buf = Vec::new();
        loop {
            let event = self.reader.read_event_into(&mut buf).map_err(|e| self.xml_err(e))?;
            match event {
                Event::Start(ref start) => {
                    let name = self.decode(start.name().as_ref())?.into_owned();
                    let attributes = self.attributes(start)?;
                    self.depth += 1;
                    handler.element_start(&name, attributes)?;
                }
                Event::End(ref end) => {
                    let name = self.decode(end.name().as_ref())?.into_owned();
                    self.depth = self.depth.saturating_sub(1);
                    handler.element_end(&name)?;
                }
                Event::Text(ref text) => {
                    let payload = if self.unescape_text {
                        text.unescape().map_err(|e| self.xml_err(e))?.into_owned()
                    } else {
                        self.decode(text)?.into_owned()
                    };
                    self.forward_text(&payload, handler)?;
                }
                Event::CData(ref cdata) => {
                    let payload = self.decode(cdata)?.into_owned();
                    self.forward_text(&payload, handler)?;
                }
                Event::Eof => break,
                // Empty never shows up with expand_empty_elements; the rest carries no tree content.
                _ => {}
            }
            buf.clear();
        }
        debug!(position = self.reader.buffer_position(), "input exhausted");
        Ok(())
    }
}

/// Replays a fixed list of events, e.g. sequences no tokenizer would emit.
#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    events: Vec<XmlEvent>,
}

impl ReplaySource {
    pub fn new(events: Vec<XmlEvent>) -> Self {
        Self { events }
    }
}

impl EventSource for ReplaySource {
    #[instrument(level = "debug", skip_all, fields(events = self.events.len()))]
    fn run(&mut self, handler: &mut dyn EventHandler) -> InfraResult<()> {
        for event in self.events.drain(..) {
            event.dispatch(handler)?;
        }
        Ok(())
    }
}
