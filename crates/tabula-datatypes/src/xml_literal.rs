//! rdf:XMLLiteral の正規化

use crate::DatatypeError;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Element wrapped around a literal so that mixed content parses as a document.
const WRAPPER_ELEMENT: &str = "arbitraryTag";

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// An XML literal held in canonical form.
///
/// Two literals are equal exactly when their canonical strings are equal,
/// regardless of the lexical text they were parsed from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct XmlLiteral {
    xml: String,
}

impl XmlLiteral {
    /// Canonicalize a lexical form.
    pub fn parse(lexical_form: &str) -> Result<Self, DatatypeError> {
        let parse_error = |message: String| DatatypeError::Parse {
            lexical_form: lexical_form.to_string(),
            message,
        };

        let enclosed = format!("<{WRAPPER_ELEMENT}>{lexical_form}</{WRAPPER_ELEMENT}>");
        let canonical = Canonicalizer::default().run(&enclosed).map_err(parse_error)?;

        let open = format!("<{WRAPPER_ELEMENT}>");
        let close = format!("</{WRAPPER_ELEMENT}>");
        let inner = canonical
            .strip_prefix(open.as_str())
            .and_then(|rest| rest.strip_suffix(close.as_str()))
            .ok_or_else(|| parse_error("canonical form lost its wrapper element".to_string()))?;

        tracing::trace!(lexical_form, canonical = inner, "canonicalized XML literal");
        Ok(Self { xml: inner.to_string() })
    }

    pub fn as_xml(&self) -> &str {
        &self.xml
    }

    pub fn into_xml(self) -> String {
        self.xml
    }
}

impl fmt::Display for XmlLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.xml)
    }
}

/// Exclusive XML canonicalization (with comments) over a single-rooted document.
#[derive(Default)]
struct Canonicalizer {
    out: String,
    /// In-scope namespace bindings per open element; "" is the default namespace.
    scopes: Vec<BTreeMap<String, String>>,
    /// Namespace declarations rendered by output ancestors, per open element.
    rendered: Vec<BTreeMap<String, String>>,
    root_closed: bool,
}

impl Canonicalizer {
    fn run(mut self, document: &str) -> Result<String, String> {
        // XML processors normalize line endings before parsing
        let document = document.replace("\r\n", "\n").replace('\r', "\n");
        let mut reader = Reader::from_str(&document);
        reader.config_mut().expand_empty_elements = true;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| format!("malformed XML at position {}: {e}", reader.buffer_position()))?;
            if self.root_closed && !matches!(event, Event::Eof) {
                return Err("content found outside of the literal".to_string());
            }
            match event {
                Event::Start(start) => self.start_element(&start)?,
                Event::Empty(start) => {
                    self.start_element(&start)?;
                    let name = utf8(start.name().as_ref())?.to_string();
                    self.end_element(&name);
                }
                Event::End(end) => {
                    let name = utf8(end.name().as_ref())?.to_string();
                    self.end_element(&name);
                }
                Event::Text(text) => {
                    let raw = utf8(&text)?;
                    let value = unescape(raw).map_err(|e| format!("invalid character data: {e}"))?;
                    escape_text(&value, &mut self.out);
                }
                Event::CData(data) => escape_text(utf8(&data)?, &mut self.out),
                Event::Comment(comment) => {
                    self.out.push_str("<!--");
                    self.out.push_str(utf8(&comment)?);
                    self.out.push_str("-->");
                }
                Event::PI(instruction) => {
                    let raw: &[u8] = &instruction;
                    let raw = utf8(raw)?;
                    let (target, data) = match raw.split_once(|c: char| c.is_whitespace()) {
                        Some((target, data)) => (target, data.trim_start()),
                        None => (raw, ""),
                    };
                    self.out.push_str("<?");
                    self.out.push_str(target);
                    if !data.is_empty() {
                        self.out.push(' ');
                        self.out.push_str(data);
                    }
                    self.out.push_str("?>");
                }
                Event::Decl(_) => return Err("XML declarations are not allowed in a literal".to_string()),
                Event::DocType(_) => return Err("document type declarations are not allowed in a literal".to_string()),
                Event::Eof => break,
            }
        }

        if !self.scopes.is_empty() {
            return Err("unexpected end of input inside an element".to_string());
        }
        Ok(self.out)
    }

    fn start_element(&mut self, start: &BytesStart<'_>) -> Result<(), String> {
        let name = utf8(start.name().as_ref())?.to_string();
        let mut scope = self.scopes.last().cloned().unwrap_or_default();
        let mut rendered = self.rendered.last().cloned().unwrap_or_default();

        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(|e| format!("malformed attribute on <{name}>: {e}"))?;
            let key = utf8(attribute.key.as_ref())?.to_string();
            let value = normalize_attribute_value(utf8(&attribute.value)?)?;
            if key == "xmlns" {
                scope.insert(String::new(), value);
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                scope.insert(prefix.to_string(), value);
            } else {
                attributes.push((key, value));
            }
        }

        // Prefixes visibly utilized by the element and its attributes
        let mut utilized = BTreeSet::new();
        let (element_prefix, _) = split_qname(&name);
        utilized.insert(element_prefix.unwrap_or_default().to_string());

        let mut sorted_attributes = Vec::with_capacity(attributes.len());
        for (key, value) in attributes {
            let (prefix, local) = split_qname(&key);
            let namespace = match prefix {
                None => String::new(),
                Some("xml") => XML_NAMESPACE.to_string(),
                Some(prefix) => {
                    utilized.insert(prefix.to_string());
                    scope
                        .get(prefix)
                        .cloned()
                        .ok_or_else(|| format!("unbound namespace prefix '{prefix}'"))?
                }
            };
            sorted_attributes.push((namespace, local.to_string(), key.clone(), value));
        }
        sorted_attributes.sort();

        self.out.push('<');
        self.out.push_str(&name);

        for prefix in &utilized {
            if prefix == "xml" {
                continue;
            }
            let value = match scope.get(prefix) {
                Some(value) => value.clone(),
                None if prefix.is_empty() => String::new(),
                None => return Err(format!("unbound namespace prefix '{prefix}'")),
            };
            let previously = rendered.get(prefix).map(String::as_str).unwrap_or("");
            let needs_declaration = if prefix.is_empty() {
                value != previously
            } else {
                rendered.get(prefix) != Some(&value)
            };
            if needs_declaration {
                if prefix.is_empty() {
                    self.out.push_str(" xmlns=\"");
                } else {
                    self.out.push_str(" xmlns:");
                    self.out.push_str(prefix);
                    self.out.push_str("=\"");
                }
                escape_attribute(&value, &mut self.out);
                self.out.push('"');
                rendered.insert(prefix.clone(), value);
            }
        }

        for (_, _, key, value) in &sorted_attributes {
            self.out.push(' ');
            self.out.push_str(key);
            self.out.push_str("=\"");
            escape_attribute(value, &mut self.out);
            self.out.push('"');
        }
        self.out.push('>');

        self.scopes.push(scope);
        self.rendered.push(rendered);
        Ok(())
    }

    fn end_element(&mut self, name: &str) {
        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push('>');
        self.scopes.pop();
        self.rendered.pop();
        if self.scopes.is_empty() {
            self.root_closed = true;
        }
    }
}

fn utf8(bytes: &[u8]) -> Result<&str, String> {
    std::str::from_utf8(bytes).map_err(|e| format!("invalid UTF-8: {e}"))
}

fn split_qname(name: &str) -> (Option<&str>, &str) {
    match name.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, name),
    }
}

/// Attribute-value normalization: literal whitespace becomes a space, then
/// references are expanded.
fn normalize_attribute_value(raw: &str) -> Result<String, String> {
    let spaced: String = raw
        .chars()
        .map(|c| if matches!(c, '\t' | '\n' | '\r') { ' ' } else { c })
        .collect();
    unescape(&spaced)
        .map(|value| value.into_owned())
        .map_err(|e| format!("invalid attribute value: {e}"))
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' => out.push_str("&#xD;"),
            c => out.push(c),
        }
    }
}

fn escape_attribute(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            '\t' => out.push_str("&#x9;"),
            '\n' => out.push_str("&#xA;"),
            '\r' => out.push_str("&#xD;"),
            c => out.push(c),
        }
    }
}
