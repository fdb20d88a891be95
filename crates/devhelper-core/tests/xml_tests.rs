//! XML mapping tests: attributes, text, repeated siblings and encoding rules.

use devhelper_core::xml::{decode, encode, XmlError};
use serde_json::json;

// ============================================================================
// Decoding
// ============================================================================

#[test]
fn root_name_is_dropped() {
    assert_eq!(decode(b"<anything><a>1</a></anything>").unwrap(), json!({"a": "1"}));
}

#[test]
fn leaf_root_decodes_to_its_text() {
    assert_eq!(decode(b"<greeting>  hello  </greeting>").unwrap(), json!("hello"));
    assert_eq!(decode(b"<empty/>").unwrap(), json!(""));
}

#[test]
fn attributes_become_at_keys() {
    let value = decode(br#"<user id="7" role="admin"><name>Ann</name></user>"#).unwrap();
    assert_eq!(value, json!({"@id": "7", "@role": "admin", "name": "Ann"}));
}

#[test]
fn text_next_to_attributes_goes_under_text_key() {
    let value = decode(br#"<root><price currency="EUR">9.99</price></root>"#).unwrap();
    assert_eq!(value, json!({"price": {"@currency": "EUR", "#text": "9.99"}}));
}

#[test]
fn repeated_siblings_collapse_into_array_in_order() {
    let value = decode(b"<list><item>a</item><other>x</other><item>b</item><item>c</item></list>")
        .unwrap();
    assert_eq!(value, json!({"item": ["a", "b", "c"], "other": "x"}));
}

#[test]
fn mixed_text_segments_are_joined_with_spaces() {
    let value = decode(b"<a>hello <b>x</b> world</a>").unwrap();
    assert_eq!(value, json!({"b": "x", "#text": "hello world"}));
}

#[test]
fn entities_and_cdata_are_unescaped() {
    let value = decode(b"<r><a>fish &amp; chips</a><b><![CDATA[<raw>]]></b></r>").unwrap();
    assert_eq!(value, json!({"a": "fish & chips", "b": "<raw>"}));
}

#[test]
fn declaration_and_comments_are_ignored() {
    let doc = b"<?xml version=\"1.0\"?>\n<!-- header -->\n<r><a>1</a><!-- inline --></r>\n";
    assert_eq!(decode(doc).unwrap(), json!({"a": "1"}));
}

#[test]
fn unclosed_element_is_malformed() {
    let err = decode(b"<a><b>text</b>").unwrap_err();
    assert!(matches!(err, XmlError::Malformed(_)), "{err:?}");
    assert!(err.to_string().contains("<a>"), "{err}");
}

#[test]
fn second_root_is_malformed() {
    let err = decode(b"<a/><b/>").unwrap_err();
    assert!(err.to_string().contains("more than one root"), "{err}");
}

#[test]
fn mismatched_end_tag_is_a_syntax_error() {
    assert!(matches!(decode(b"<a></b>").unwrap_err(), XmlError::Syntax(_)));
}

// ============================================================================
// Encoding
// ============================================================================

fn encode_str(value: serde_json::Value, indent: usize) -> String {
    String::from_utf8(encode(&value, "root", indent).unwrap()).unwrap()
}

#[test]
fn indented_document_layout() {
    let xml = encode_str(json!({"name": "John", "tags": ["a", "b"]}), 2);
    assert_eq!(
        xml,
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<root>\n  <name>John</name>\n  <tags>a</tags>\n  <tags>b</tags>\n</root>\n"
    );
}

#[test]
fn top_level_array_uses_item_elements() {
    let xml = encode_str(json!([1, 2]), 0);
    assert!(xml.ends_with("<root><item>1</item><item>2</item></root>\n"), "{xml}");
}

#[test]
fn null_and_empty_objects_become_empty_elements() {
    let xml = encode_str(json!({"a": null, "b": {}}), 0);
    assert!(xml.contains("<a/><b/>"), "{xml}");
}

#[test]
fn at_keys_become_attributes_and_text_key_becomes_content() {
    let xml = encode_str(json!({"price": {"@currency": "EUR", "#text": 9.99}}), 0);
    assert!(xml.contains(r#"<price currency="EUR">9.99</price>"#), "{xml}");
}

#[test]
fn special_characters_are_escaped() {
    let xml = encode_str(json!({"q": "a < b & c"}), 0);
    assert!(xml.contains("<q>a &lt; b &amp; c</q>"), "{xml}");
}

#[test]
fn empty_array_writes_nothing() {
    let xml = encode_str(json!({"a": [], "b": 1}), 0);
    assert!(xml.ends_with("<root><b>1</b></root>\n"), "{xml}");
}

#[test]
fn control_characters_cannot_be_encoded() {
    let values = [
        json!({"t": "x\u{1}y"}),
        json!({"t": {"@v": "\u{1b}"}}),
        json!({"t": {"#text": "\u{0}"}}),
    ];
    for value in values {
        let err = encode(&value, "root", 0).unwrap_err();
        assert!(matches!(err, XmlError::Unrepresentable(_)), "{err:?}");
    }
    let xml = encode_str(json!({"t": "a\tb"}), 0);
    assert!(xml.contains("<t>a\tb</t>"), "{xml}");
}

#[test]
fn attribute_values_must_be_scalars() {
    let err = encode(&json!({"x": {"@bad": [1]}}), "root", 0).unwrap_err();
    assert!(matches!(err, XmlError::Unrepresentable(_)), "{err:?}");
}

#[test]
fn invalid_root_name_is_rejected() {
    let err = encode(&json!({}), "1root", 0).unwrap_err();
    assert!(matches!(err, XmlError::InvalidName(_)), "{err:?}");
}

#[test]
fn encoded_document_decodes_back_to_strings() {
    let original = json!({"user": {"@id": 3, "name": "Ann", "langs": ["en", "de"]}});
    let xml = encode(&original, "root", 2).unwrap();
    assert_eq!(
        decode(&xml).unwrap(),
        json!({"user": {"@id": "3", "name": "Ann", "langs": ["en", "de"]}})
    );
}
