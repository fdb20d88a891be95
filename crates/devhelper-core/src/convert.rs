//! Format converter: JSON ⇄ YAML ⇄ XML through one intermediate value.
//!
//! Every conversion is a single decode → encode round trip over
//! [`serde_json::Value`] (built with `preserve_order`, so object keys keep
//! their source order). Converting a format to itself never parses the input:
//! the bytes are copied verbatim.
//!
//! # Example
//! ```
//! use devhelper_core::convert::{convert_bytes, ConvertOptions, Format};
//!
//! let json = br#"{"name":"John","age":30}"#;
//! let yaml = convert_bytes(json, Format::Json, Format::Yaml, &ConvertOptions::default()).unwrap();
//! assert_eq!(String::from_utf8(yaml).unwrap(), "name: John\nage: 30\n");
//! ```

use crate::error::ConvertError;
use crate::xml;
use log::debug;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::fmt;
use std::io::{self, Read, Write};
use std::str::FromStr;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A supported structured-data notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    Yaml,
    Xml,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Json, Format::Yaml, Format::Xml];

    /// Canonical lowercase token (`yml` is never returned).
    pub fn token(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
            Format::Xml => "xml",
        }
    }

    fn codec(self) -> Codec {
        match self {
            Format::Json => Codec {
                decode: decode_json,
                encode: encode_json,
            },
            Format::Yaml => Codec {
                decode: decode_yaml,
                encode: encode_yaml,
            },
            Format::Xml => Codec {
                decode: decode_xml,
                encode: encode_xml,
            },
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::Json => "JSON",
            Format::Yaml => "YAML",
            Format::Xml => "XML",
        })
    }
}

/// Parses a format token case-insensitively; `yml` is an alias for `yaml`.
impl FromStr for Format {
    type Err = ConvertError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            "xml" => Ok(Format::Xml),
            _ => Err(ConvertError::UnsupportedFormat {
                token: token.to_string(),
            }),
        }
    }
}

/// Output shaping for the encode step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Spaces per nesting level for JSON and XML. `0` emits compact output.
    /// YAML always uses the emitter's own indentation.
    pub indent: usize,
    /// Name of the element wrapping an encoded XML document.
    pub xml_root: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            xml_root: "root".to_string(),
        }
    }
}

impl ConvertOptions {
    pub fn with_indent(indent: usize) -> Self {
        Self {
            indent,
            ..Self::default()
        }
    }
}

/// Decode/encode function pair for one notation.
struct Codec {
    decode: fn(&[u8]) -> Result<Value, BoxError>,
    encode: fn(&Value, &ConvertOptions) -> Result<Vec<u8>, BoxError>,
}

/// Convert everything readable from `input` and write the result to `output`.
///
/// When `from == to` the stream is copied as-is without validation. Otherwise
/// the input is read fully, decoded, encoded into memory and only then written,
/// so a decode or encode failure leaves `output` untouched.
pub fn convert<R: Read, W: Write>(
    mut input: R,
    mut output: W,
    from: Format,
    to: Format,
    options: &ConvertOptions,
) -> Result<(), ConvertError> {
    if from == to {
        debug!("{from} -> {to}: copying input verbatim");
        copy_verbatim(&mut input, &mut output)?;
        return output.flush().map_err(ConvertError::Write);
    }

    let mut data = Vec::new();
    input.read_to_end(&mut data).map_err(ConvertError::Read)?;

    let encoded = transcode(&data, from, to, options)?;
    output.write_all(&encoded).map_err(ConvertError::Write)?;
    output.flush().map_err(ConvertError::Write)
}

/// In-memory variant of [`convert`].
pub fn convert_bytes(
    data: &[u8],
    from: Format,
    to: Format,
    options: &ConvertOptions,
) -> Result<Vec<u8>, ConvertError> {
    if from == to {
        return Ok(data.to_vec());
    }
    transcode(data, from, to, options)
}

/// Decode `data` as `format` into the intermediate value.
pub fn decode(data: &[u8], format: Format) -> Result<Value, ConvertError> {
    (format.codec().decode)(data).map_err(|source| ConvertError::Decode { format, source })
}

/// Encode an intermediate value as `format`.
pub fn encode(
    value: &Value,
    format: Format,
    options: &ConvertOptions,
) -> Result<Vec<u8>, ConvertError> {
    (format.codec().encode)(value, options).map_err(|err| ConvertError::Encode {
        format,
        message: err.to_string(),
    })
}

fn transcode(
    data: &[u8],
    from: Format,
    to: Format,
    options: &ConvertOptions,
) -> Result<Vec<u8>, ConvertError> {
    debug!(
        "{from} -> {to}: decoding {} bytes, indent {}",
        data.len(),
        options.indent
    );
    let value = decode(data, from)?;
    encode(&value, to, options)
}

fn copy_verbatim<R: Read, W: Write>(input: &mut R, output: &mut W) -> Result<(), ConvertError> {
    let mut buf = [0u8; 8192];
    loop {
        let n = match input.read(&mut buf) {
            Ok(0) => return Ok(()),
            Ok(n) => n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(ConvertError::Read(err)),
        };
        output.write_all(&buf[..n]).map_err(ConvertError::Write)?;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// JSON
// ─────────────────────────────────────────────────────────────────────────────

fn decode_json(data: &[u8]) -> Result<Value, BoxError> {
    Ok(serde_json::from_slice(data)?)
}

fn encode_json(value: &Value, options: &ConvertOptions) -> Result<Vec<u8>, BoxError> {
    let mut out = Vec::new();
    if options.indent == 0 {
        serde_json::to_writer(&mut out, value)?;
    } else {
        let indent = " ".repeat(options.indent);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
        let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
        value.serialize(&mut ser)?;
    }
    out.push(b'\n');
    Ok(out)
}

// ─────────────────────────────────────────────────────────────────────────────
// YAML
// ─────────────────────────────────────────────────────────────────────────────

fn decode_yaml(data: &[u8]) -> Result<Value, BoxError> {
    let doc: serde_yaml::Value = serde_yaml::from_slice(data)?;
    yaml_to_value(doc)
}

fn encode_yaml(value: &Value, _options: &ConvertOptions) -> Result<Vec<u8>, BoxError> {
    let mut text = serde_yaml::to_string(value)?;
    if !text.ends_with('\n') {
        text.push('\n');
    }
    Ok(text.into_bytes())
}

/// Lower a YAML node into the intermediate value. Tags are dropped, scalar
/// keys are stringified (two keys with the same string form are an error)
/// and non-finite floats become null.
pub(crate) fn yaml_to_value(node: serde_yaml::Value) -> Result<Value, BoxError> {
    Ok(match node {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => yaml_number(&n),
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(yaml_to_value)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                let key = yaml_key(key)?;
                if map.contains_key(&key) {
                    return Err(format!("duplicate mapping key '{key}'").into());
                }
                map.insert(key, yaml_to_value(value)?);
            }
            Value::Object(map)
        }
        serde_yaml::Value::Tagged(tagged) => {
            let tagged = *tagged;
            yaml_to_value(tagged.value)?
        }
    })
}

fn yaml_number(n: &serde_yaml::Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Number(Number::from(i))
    } else if let Some(u) = n.as_u64() {
        Value::Number(Number::from(u))
    } else {
        n.as_f64()
            .and_then(Number::from_f64)
            .map_or(Value::Null, Value::Number)
    }
}

fn yaml_key(key: serde_yaml::Value) -> Result<String, BoxError> {
    match key {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Null => Ok("null".to_string()),
        serde_yaml::Value::Tagged(tagged) => {
            let tagged = *tagged;
            yaml_key(tagged.value)
        }
        serde_yaml::Value::Sequence(_) | serde_yaml::Value::Mapping(_) => {
            Err("mapping keys must be scalars".into())
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// XML
// ─────────────────────────────────────────────────────────────────────────────

fn decode_xml(data: &[u8]) -> Result<Value, BoxError> {
    Ok(xml::decode(data)?)
}

fn encode_xml(value: &Value, options: &ConvertOptions) -> Result<Vec<u8>, BoxError> {
    Ok(xml::encode(value, &options.xml_root, options.indent)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_tokens_are_case_insensitive() {
        assert_eq!("JSON".parse::<Format>().unwrap(), Format::Json);
        assert_eq!("Yml".parse::<Format>().unwrap(), Format::Yaml);
        assert_eq!(" xml ".parse::<Format>().unwrap(), Format::Xml);
    }

    #[test]
    fn unknown_token_names_the_offender() {
        let err = "toml".parse::<Format>().unwrap_err();
        assert!(err.to_string().contains("'toml'"));
    }

    #[test]
    fn yaml_tags_are_dropped() {
        let node: serde_yaml::Value = serde_yaml::from_str("!custom {a: 1}").unwrap();
        let value = yaml_to_value(node).unwrap();
        assert_eq!(value, serde_json::json!({"a": 1}));
    }

    #[test]
    fn yaml_scalar_keys_are_stringified() {
        let node: serde_yaml::Value = serde_yaml::from_str("1: one\ntrue: yes").unwrap();
        let value = yaml_to_value(node).unwrap();
        assert_eq!(value, serde_json::json!({"1": "one", "true": "yes"}));
    }

    #[test]
    fn yaml_complex_keys_are_rejected() {
        let node: serde_yaml::Value = serde_yaml::from_str("? [a, b]\n: value").unwrap();
        assert!(yaml_to_value(node).is_err());
    }
}
