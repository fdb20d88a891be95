/// Format Converter Tests
///
/// Exercises the public `convert` contract end to end: format token parsing,
/// verbatim same-format copies, the JSON/YAML/XML mappings and every error
/// kind, including the guarantee that nothing reaches the sink on failure.
use devhelper_core::convert::{decode, encode};
use devhelper_core::{convert, convert_bytes, ConvertError, ConvertOptions, Format};
use serde_json::{json, Value};
use std::io::{self, Cursor, Read, Write};

fn run(input: &str, from: &str, to: &str) -> Result<String, ConvertError> {
    let from: Format = from.parse()?;
    let to: Format = to.parse()?;
    let mut out = Vec::new();
    convert(input.as_bytes(), &mut out, from, to, &ConvertOptions::default())?;
    Ok(String::from_utf8(out).expect("converter output is UTF-8"))
}

/// A reader that records whether anyone tried to read from it.
struct Untouched {
    reads: usize,
}

impl Read for Untouched {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        self.reads += 1;
        Ok(0)
    }
}

struct FailingReader;

impl Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "disk on fire"))
    }
}

struct FailingWriter;

impl Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ============================================================================
// Format tokens
// ============================================================================

#[test]
fn yml_is_an_alias_for_yaml() {
    assert_eq!("yml".parse::<Format>().unwrap(), Format::Yaml);
    assert_eq!("yaml".parse::<Format>().unwrap(), Format::Yaml);
}

#[test]
fn toml_is_rejected_before_any_read() {
    let mut input = Untouched { reads: 0 };
    let result = "toml".parse::<Format>().and_then(|from| {
        let mut out = Vec::new();
        convert(&mut input, &mut out, from, Format::Json, &ConvertOptions::default())
    });
    match result {
        Err(ConvertError::UnsupportedFormat { token }) => assert_eq!(token, "toml"),
        other => panic!("expected UnsupportedFormat, got {other:?}"),
    }
    assert_eq!(input.reads, 0);
}

#[test]
fn unsupported_target_is_reported_by_token() {
    let err = run("{}", "json", "csv").unwrap_err();
    assert!(err.to_string().contains("'csv'"), "{err}");
}

// ============================================================================
// Same-format copies
// ============================================================================

#[test]
fn same_format_copies_bytes_verbatim() {
    let input = "{ \"b\" : 1,\n\n   \"a\":2 }";
    assert_eq!(run(input, "json", "json").unwrap(), input);
}

#[test]
fn same_format_copies_invalid_input_without_validation() {
    let input = "this is {not json";
    assert_eq!(run(input, "json", "json").unwrap(), input);
    assert_eq!(run("<unclosed>", "xml", "xml").unwrap(), "<unclosed>");
}

#[test]
fn yml_to_yaml_counts_as_same_format() {
    let input = "key:   value   # comment kept\n";
    assert_eq!(run(input, "yml", "yaml").unwrap(), input);
}

#[test]
fn convert_bytes_same_format_is_identity() {
    let input = b"\x00\x01 not even text";
    let out = convert_bytes(input, Format::Xml, Format::Xml, &ConvertOptions::default()).unwrap();
    assert_eq!(out, input);
}

// ============================================================================
// JSON <-> YAML
// ============================================================================

#[test]
fn json_to_yaml_keeps_key_order() {
    let yaml = run(r#"{"name":"John","age":30,"city":"New York"}"#, "json", "yaml").unwrap();
    assert_eq!(yaml, "name: John\nage: 30\ncity: New York\n");
}

#[test]
fn yaml_to_json_uses_requested_indent() {
    let yaml = "name: John\ntags:\n  - a\n  - b\n";
    let mut out = Vec::new();
    convert(
        yaml.as_bytes(),
        &mut out,
        Format::Yaml,
        Format::Json,
        &ConvertOptions::with_indent(4),
    )
    .unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(
        text,
        "{\n    \"name\": \"John\",\n    \"tags\": [\n        \"a\",\n        \"b\"\n    ]\n}\n"
    );
}

#[test]
fn indent_zero_gives_compact_json() {
    let out = convert_bytes(
        b"a: 1\nb: [true, null]\n",
        Format::Yaml,
        Format::Json,
        &ConvertOptions::with_indent(0),
    )
    .unwrap();
    assert_eq!(out, b"{\"a\":1,\"b\":[true,null]}\n");
}

#[test]
fn yaml_scalars_keep_their_types() {
    let value = decode(b"i: 7\nf: 1.5\nb: false\nn: ~\ns: '7'\n", Format::Yaml).unwrap();
    assert_eq!(value, json!({"i": 7, "f": 1.5, "b": false, "n": null, "s": "7"}));
}

#[test]
fn yaml_non_string_keys_become_strings() {
    let value = decode(b"1: one\ntrue: yes\n", Format::Yaml).unwrap();
    assert_eq!(value, json!({"1": "one", "true": "yes"}));
}

#[test]
fn yaml_keys_colliding_after_stringification_are_a_decode_error() {
    let err = decode(b"1: a\n'1': b\n", Format::Yaml).unwrap_err();
    assert!(err.to_string().contains("duplicate mapping key '1'"), "{err}");
}

#[test]
fn empty_collections_survive_json_to_yaml() {
    let yaml = run(r#"{"list":[],"map":{}}"#, "json", "yaml").unwrap();
    let back: Value = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(back, json!({"list": [], "map": {}}));
}

// ============================================================================
// XML
// ============================================================================

#[test]
fn xml_to_json_decodes_leaf_text_as_strings() {
    let json_text = run("<person><name>John</name><age>30</age></person>", "xml", "json").unwrap();
    let value: Value = serde_json::from_str(&json_text).unwrap();
    assert_eq!(value, json!({"name": "John", "age": "30"}));
}

#[test]
fn json_to_xml_wraps_in_root_element() {
    let xml = run(r#"{"name":"John","age":30}"#, "json", "xml").unwrap();
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"), "{xml}");
    assert!(xml.contains("<root>"), "{xml}");
    assert!(xml.contains("<name>John</name>"), "{xml}");
    assert!(xml.contains("<age>30</age>"), "{xml}");
    assert!(xml.ends_with("</root>\n"), "{xml}");
}

#[test]
fn custom_xml_root_name() {
    let options = ConvertOptions {
        indent: 0,
        xml_root: "config".to_string(),
    };
    let out = encode(&json!({"debug": true}), Format::Xml, &options).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><config><debug>true</debug></config>\n"
    );
}

#[test]
fn yaml_to_xml_to_yaml_keeps_structure_as_strings() {
    let yaml = "server:\n  host: localhost\n  port: 8080\n";
    let xml = run(yaml, "yaml", "xml").unwrap();
    let back = run(&xml, "xml", "yaml").unwrap();
    assert_eq!(back, "server:\n  host: localhost\n  port: '8080'\n");
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn truncated_json_is_a_decode_error_and_writes_nothing() {
    let mut out = Vec::new();
    let err = convert(
        &b"{\"a\":1"[..],
        &mut out,
        Format::Json,
        Format::Yaml,
        &ConvertOptions::default(),
    )
    .unwrap_err();
    assert!(
        matches!(err, ConvertError::Decode { format: Format::Json, .. }),
        "{err:?}"
    );
    assert!(out.is_empty());
}

#[test]
fn malformed_xml_is_a_decode_error() {
    for input in ["<a><b></a>", "<a>", "", "<a/><b/>", "just text"] {
        let err = run(input, "xml", "json").unwrap_err();
        assert!(
            matches!(err, ConvertError::Decode { format: Format::Xml, .. }),
            "{input:?}: {err:?}"
        );
    }
}

#[test]
fn invalid_yaml_is_a_decode_error() {
    let err = run("key: [unclosed", "yaml", "json").unwrap_err();
    assert!(err.to_string().starts_with("failed to parse YAML input"), "{err}");
}

#[test]
fn nested_arrays_cannot_be_encoded_as_xml() {
    let mut out = Vec::new();
    let err = convert(
        &br#"{"matrix":[[1,2],[3,4]]}"#[..],
        &mut out,
        Format::Json,
        Format::Xml,
        &ConvertOptions::default(),
    )
    .unwrap_err();
    assert!(
        matches!(err, ConvertError::Encode { format: Format::Xml, .. }),
        "{err:?}"
    );
    assert!(out.is_empty());
}

#[test]
fn top_level_nested_arrays_cannot_be_encoded_as_xml() {
    let mut out = Vec::new();
    let err = convert(
        &b"[[1,2],[3]]"[..],
        &mut out,
        Format::Json,
        Format::Xml,
        &ConvertOptions::with_indent(0),
    )
    .unwrap_err();
    assert!(
        matches!(err, ConvertError::Encode { format: Format::Xml, .. }),
        "{err:?}"
    );
    assert!(out.is_empty());
}

#[test]
fn empty_array_under_an_invalid_key_fails_to_encode() {
    let err = encode(&json!({"a": [], "1 bad": []}), Format::Xml, &ConvertOptions::default())
        .unwrap_err();
    assert!(
        matches!(err, ConvertError::Encode { format: Format::Xml, .. }),
        "{err:?}"
    );
    assert!(err.to_string().contains("1 bad"), "{err}");
}

#[test]
fn keys_that_are_not_xml_names_fail_to_encode() {
    let err = encode(&json!({"first name": "x"}), Format::Xml, &ConvertOptions::default())
        .unwrap_err();
    assert!(err.to_string().contains("first name"), "{err}");
}

#[test]
fn read_failure_is_reported_as_read_error() {
    let mut out = Vec::new();
    let err = convert(
        FailingReader,
        &mut out,
        Format::Json,
        Format::Yaml,
        &ConvertOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ConvertError::Read(_)), "{err:?}");
}

#[test]
fn sink_failure_is_reported_as_write_error() {
    let err = convert(
        Cursor::new(b"{\"a\":1}".to_vec()),
        FailingWriter,
        Format::Json,
        Format::Yaml,
        &ConvertOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ConvertError::Write(_)), "{err:?}");
}

#[test]
fn sink_failure_during_verbatim_copy_is_a_write_error() {
    let err = convert(
        Cursor::new(b"anything".to_vec()),
        FailingWriter,
        Format::Yaml,
        Format::Yaml,
        &ConvertOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ConvertError::Write(_)), "{err:?}");
}
