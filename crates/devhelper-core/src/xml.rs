//! XML ⇄ intermediate value mapping.
//!
//! XML has no native notion of numbers, arrays or maps, so the mapping is a
//! convention:
//!
//! - the root element's name is dropped on decode and supplied on encode
//! - a childless, attribute-less element is its trimmed text, always a string
//! - attributes are `"@name"` keys, text next to children/attributes is `"#text"`
//! - repeated sibling elements collapse into an array, in document order
//! - text split around child elements is joined with single spaces
//!
//! On encode an array repeats its key once per member, so an empty array
//! writes nothing. Arrays directly inside arrays, names that are not XML
//! names and C0 control characters other than tab, CR and LF are rejected.
//!
//! ```
//! use devhelper_core::xml;
//!
//! let value = xml::decode(b"<person><name>John</name><age>30</age></person>").unwrap();
//! assert_eq!(value, serde_json::json!({"name": "John", "age": "30"}));
//! ```

use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde_json::{Map, Value};
use thiserror::Error;

/// Prefix marking attribute keys.
pub const ATTRIBUTE_PREFIX: char = '@';
/// Key holding text content of an element that also has children or attributes.
pub const TEXT_KEY: &str = "#text";
/// Element name used for members of a top-level array.
pub const ARRAY_ITEM: &str = "item";

#[derive(Error, Debug)]
pub enum XmlError {
    #[error("{0}")]
    Syntax(#[from] quick_xml::Error),

    #[error("invalid attribute: {0}")]
    Attribute(#[from] AttrError),

    #[error("{0}")]
    Malformed(String),

    #[error("'{0}' is not a valid XML name")]
    InvalidName(String),

    #[error("{0}")]
    Unrepresentable(String),
}

/// Parse an XML document into the intermediate value.
pub fn decode(data: &[u8]) -> Result<Value, XmlError> {
    let mut reader = Reader::from_reader(data);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(tag) => {
                if stack.is_empty() && root.is_some() {
                    return Err(multiple_roots());
                }
                stack.push(Element::open(&tag)?);
            }
            Event::Empty(tag) => {
                let element = Element::open(&tag)?;
                attach(element, &mut stack, &mut root)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| XmlError::Malformed("unexpected closing tag".to_string()))?;
                attach(element, &mut stack, &mut root)?;
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                push_text(&mut stack, &text)?;
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                push_text(&mut stack, &text)?;
            }
            Event::Eof => break,
            // Declaration, comments, processing instructions, doctype.
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(XmlError::Malformed(format!(
            "unexpected end of document: <{}> is not closed",
            open.name
        )));
    }
    root.map(Element::into_value)
        .ok_or_else(|| XmlError::Malformed("document has no root element".to_string()))
}

/// Serialize the intermediate value as an XML document wrapped in `<root>`.
///
/// `indent == 0` writes the document on a single line.
pub fn encode(value: &Value, root: &str, indent: usize) -> Result<Vec<u8>, XmlError> {
    check_name(root)?;
    let mut writer = if indent == 0 {
        Writer::new(Vec::new())
    } else {
        Writer::new_with_indent(Vec::new(), b' ', indent)
    };
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    match value {
        Value::Array(items) => {
            writer.write_event(Event::Start(BytesStart::new(root)))?;
            for item in items {
                if item.is_array() {
                    return Err(XmlError::Unrepresentable(
                        "nested arrays at the top level have no XML form".to_string(),
                    ));
                }
                write_element(&mut writer, ARRAY_ITEM, item)?;
            }
            writer.write_event(Event::End(BytesEnd::new(root)))?;
        }
        _ => write_element(&mut writer, root, value)?,
    }

    let mut out = writer.into_inner();
    out.push(b'\n');
    Ok(out)
}

#[derive(Debug)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn open(tag: &BytesStart<'_>) -> Result<Self, XmlError> {
        let name = String::from_utf8_lossy(tag.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in tag.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            attributes.push((key, value));
        }
        Ok(Self {
            name,
            attributes,
            text: String::new(),
            children: Vec::new(),
        })
    }

    fn into_value(self) -> Value {
        let Element {
            attributes,
            text,
            children,
            ..
        } = self;
        let text = text.trim();

        if attributes.is_empty() && children.is_empty() {
            return Value::String(text.to_string());
        }

        let mut map = Map::new();
        for (key, value) in attributes {
            map.insert(format!("{ATTRIBUTE_PREFIX}{key}"), Value::String(value));
        }
        for child in children {
            let name = child.name.clone();
            let value = child.into_value();
            match map.get_mut(&name) {
                None => {
                    map.insert(name, value);
                }
                Some(Value::Array(items)) => items.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
            }
        }
        if !text.is_empty() {
            map.insert(TEXT_KEY.to_string(), Value::String(text.to_string()));
        }
        Value::Object(map)
    }
}

fn attach(
    element: Element,
    stack: &mut [Element],
    root: &mut Option<Element>,
) -> Result<(), XmlError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_some() => return Err(multiple_roots()),
        None => *root = Some(element),
    }
    Ok(())
}

fn push_text(stack: &mut [Element], text: &str) -> Result<(), XmlError> {
    match stack.last_mut() {
        Some(current) => {
            let text = text.trim();
            if !text.is_empty() {
                if !current.text.is_empty() {
                    current.text.push(' ');
                }
                current.text.push_str(text);
            }
        }
        None if text.trim().is_empty() => {}
        None => {
            return Err(XmlError::Malformed(
                "text outside of the root element".to_string(),
            ))
        }
    }
    Ok(())
}

fn multiple_roots() -> XmlError {
    XmlError::Malformed("document has more than one root element".to_string())
}

fn write_element(writer: &mut Writer<Vec<u8>>, name: &str, value: &Value) -> Result<(), XmlError> {
    match value {
        Value::Array(items) => {
            check_name(name)?;
            for item in items {
                if item.is_array() {
                    return Err(XmlError::Unrepresentable(format!(
                        "nested arrays under '{name}' have no XML form"
                    )));
                }
                write_element(writer, name, item)?;
            }
        }
        Value::Object(map) => {
            check_name(name)?;
            let mut start = BytesStart::new(name);
            let mut text = None;
            let mut children = Vec::new();

            for (key, child) in map {
                if let Some(attr) = key.strip_prefix(ATTRIBUTE_PREFIX) {
                    check_name(attr)?;
                    let attr_value = scalar_text(child).ok_or_else(|| {
                        XmlError::Unrepresentable(format!("attribute '{attr}' must be a scalar"))
                    })?;
                    check_text(&attr_value)?;
                    start.push_attribute((attr, attr_value.as_str()));
                } else if key == TEXT_KEY {
                    text = Some(scalar_text(child).ok_or_else(|| {
                        XmlError::Unrepresentable(format!("'{TEXT_KEY}' must be a scalar"))
                    })?);
                } else {
                    children.push((key.as_str(), child));
                }
            }

            if text.is_none() && children.is_empty() {
                writer.write_event(Event::Empty(start))?;
                return Ok(());
            }

            writer.write_event(Event::Start(start))?;
            if let Some(text) = text {
                check_text(&text)?;
                writer.write_event(Event::Text(BytesText::new(&text)))?;
            }
            for (key, child) in children {
                write_element(writer, key, child)?;
            }
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
        Value::Null => {
            check_name(name)?;
            writer.write_event(Event::Empty(BytesStart::new(name)))?;
        }
        scalar => {
            check_name(name)?;
            let text = scalar_text(scalar).unwrap_or_default();
            check_text(&text)?;
            writer.write_event(Event::Start(BytesStart::new(name)))?;
            writer.write_event(Event::Text(BytesText::new(&text)))?;
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
    }
    Ok(())
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// XML 1.0 allows no C0 controls besides tab, LF and CR, escaped or not.
fn check_text(text: &str) -> Result<(), XmlError> {
    match text.chars().find(|&c| c < ' ' && !matches!(c, '\t' | '\n' | '\r')) {
        Some(c) => Err(XmlError::Unrepresentable(format!(
            "control character U+{:04X} has no XML form",
            c as u32
        ))),
        None => Ok(()),
    }
}

/// Element and attribute names: a letter or `_`, then letters, digits, `_ - . :`.
fn check_name(name: &str) -> Result<(), XmlError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'))
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(XmlError::InvalidName(name.to_string()))
    }
}
