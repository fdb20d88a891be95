//! Validate and re-indent JSON, YAML and XML documents.
//!
//! Unlike [`crate::convert`], formatting always parses its input: an invalid
//! document is reported as [`Error::Syntax`] instead of being passed through.

use crate::convert::{self, ConvertOptions, Format};
use crate::error::{ConvertError, Error, Result};
use crate::xml;
use quick_xml::events::Event;
use quick_xml::{Reader, Writer};
use serde_json::{Map, Value};

/// Re-indent a JSON document. Key order is kept unless `sort_keys` is set.
pub fn format_json(input: &str, indent: usize, sort_keys: bool) -> Result<String> {
    let value = parse(input, Format::Json)?;
    let value = if sort_keys { sorted(value) } else { value };
    render(&value, Format::Json, indent)
}

/// Re-emit a YAML document in the emitter's canonical layout.
pub fn format_yaml(input: &str) -> Result<String> {
    let value = parse(input, Format::Yaml)?;
    render(&value, Format::Yaml, 2)
}

/// Re-indent an XML document token by token. Declarations, comments and
/// attributes survive; insignificant whitespace between tags does not.
pub fn format_xml(input: &str, indent: usize) -> Result<String> {
    xml::decode(input.as_bytes()).map_err(|err| syntax(Format::Xml, err))?;

    let mut reader = Reader::from_str(input);
    reader.trim_text(true);
    let mut writer = if indent == 0 {
        Writer::new(Vec::new())
    } else {
        Writer::new_with_indent(Vec::new(), b' ', indent)
    };

    loop {
        let event = reader
            .read_event()
            .map_err(|err| syntax(Format::Xml, err))?;
        if let Event::Eof = event {
            break;
        }
        writer
            .write_event(event)
            .map_err(|err| syntax(Format::Xml, err))?;
    }

    let mut out = String::from_utf8(writer.into_inner()).map_err(|err| syntax(Format::Xml, err))?;
    out.push('\n');
    Ok(out)
}

/// Dispatch on a format token's parsed form.
pub fn format_document(input: &str, format: Format, indent: usize, sort_keys: bool) -> Result<String> {
    match format {
        Format::Json => format_json(input, indent, sort_keys),
        Format::Yaml => format_yaml(input),
        Format::Xml => format_xml(input, indent),
    }
}

fn parse(input: &str, format: Format) -> Result<Value> {
    convert::decode(input.as_bytes(), format).map_err(|err| match err {
        ConvertError::Decode { format, source } => syntax(format, source),
        other => Error::Convert(other),
    })
}

fn render(value: &Value, format: Format, indent: usize) -> Result<String> {
    let bytes = convert::encode(value, format, &ConvertOptions::with_indent(indent))?;
    String::from_utf8(bytes).map_err(|err| syntax(format, err))
}

fn syntax(format: Format, err: impl std::fmt::Display) -> Error {
    Error::Syntax {
        format,
        message: err.to_string(),
    }
}

/// Recursively order object keys alphabetically.
fn sorted(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut out = Map::with_capacity(entries.len());
            for (key, value) in entries {
                out.insert(key, sorted(value));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sorted).collect()),
        other => other,
    }
}
