/// Property-Based Roundtrip Tests
///
/// Uses `proptest` to generate random JSON documents and checks that
/// JSON -> YAML -> JSON yields a structurally equal value, and that a
/// same-format conversion never changes a single byte.
///
/// Strategies generate:
/// - strings that look like other YAML scalars (`true`, `null`, `42`, `-1`)
/// - integers across the i64/u64 range and floats with few decimals
/// - objects and arrays nested up to four levels
use devhelper_core::{convert_bytes, ConvertOptions, Format};
use proptest::prelude::*;
use serde_json::{Map, Number, Value};

// ============================================================================
// Strategies
// ============================================================================

fn arb_key() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z_][a-zA-Z0-9_]{0,12}",
        Just("true".to_string()),
        Just("null".to_string()),
        Just("with space".to_string()),
    ]
}

fn arb_string() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,24}",
        prop::string::string_regex("[a-zA-Z0-9:,#&*!|>'\"%@`\\[\\]{}\\-\\. ]{0,16}").unwrap(),
        Just(String::new()),
        Just("true".to_string()),
        Just("no".to_string()),
        Just("null".to_string()),
        Just("~".to_string()),
        Just("42".to_string()),
        Just("-1".to_string()),
        Just("3.14".to_string()),
        Just("0x1F".to_string()),
        Just("  padded  ".to_string()),
        Just("- not a list".to_string()),
        Just("line1\nline2".to_string()),
        Just("caf\u{00e9} \u{4f60}\u{597d}".to_string()),
    ]
}

fn arb_number() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(|n| Value::Number(Number::from(n))),
        any::<u64>().prop_map(|n| Value::Number(Number::from(n))),
        (-100_000i32..100_000i32).prop_map(|n| {
            let f = f64::from(n) / 100.0;
            Number::from_f64(f).map_or(Value::Null, Value::Number)
        }),
    ]
}

fn arb_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        arb_number(),
        arb_string().prop_map(Value::String),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    arb_leaf().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec((arb_key(), inner), 0..6).prop_map(|entries| {
                let mut map = Map::new();
                for (key, value) in entries {
                    map.insert(key, value);
                }
                Value::Object(map)
            }),
        ]
    })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn json_yaml_json_is_structurally_equal(value in arb_value()) {
        let json = serde_json::to_vec(&value).unwrap();
        let options = ConvertOptions::default();

        let yaml = convert_bytes(&json, Format::Json, Format::Yaml, &options).unwrap();
        let back = convert_bytes(&yaml, Format::Yaml, Format::Json, &options).unwrap();
        let decoded: Value = serde_json::from_slice(&back).unwrap();

        prop_assert_eq!(
            &decoded,
            &value,
            "YAML was:\n{}",
            String::from_utf8_lossy(&yaml)
        );
    }

    #[test]
    fn same_format_is_byte_identical(data in prop::collection::vec(any::<u8>(), 0..512)) {
        for format in Format::ALL {
            let out = convert_bytes(&data, format, format, &ConvertOptions::default()).unwrap();
            prop_assert_eq!(&out, &data);
        }
    }

    #[test]
    fn compact_and_indented_json_decode_alike(value in arb_value(), indent in 0usize..8) {
        let json = serde_json::to_vec(&value).unwrap();
        let out = convert_bytes(&json, Format::Json, Format::Yaml, &ConvertOptions::with_indent(indent))
            .and_then(|yaml| convert_bytes(&yaml, Format::Yaml, Format::Json, &ConvertOptions::with_indent(indent)))
            .unwrap();
        prop_assert!(out.ends_with(b"\n"));
        let decoded: Value = serde_json::from_slice(&out).unwrap();
        prop_assert_eq!(decoded, value);
    }
}
