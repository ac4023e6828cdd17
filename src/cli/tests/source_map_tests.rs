use super::source_map::{LineMappings, SourceMap, relocate_sources, vlq};

fn encode(value: i64) -> String {
    let mut out = String::new();
    vlq::encode(value, &mut out);
    out
}

/// Decode one value from the front of `input`, returning it and the number
/// of bytes consumed.
fn decode(input: &str) -> Option<(i64, usize)> {
    let mut result = 0i64;
    let mut shift = 0;
    for (consumed, byte) in input.bytes().enumerate() {
        let digit = vlq::BASE64.iter().position(|&b| b == byte)? as i64;
        result |= (digit & 0b1_1111) << shift;
        shift += 5;
        if digit & 0b10_0000 == 0 {
            let magnitude = result >> 1;
            return Some((if result & 1 == 1 { -magnitude } else { magnitude }, consumed + 1));
        }
    }
    None
}

#[test]
fn vlq_encodes_known_values() {
    assert_eq!(encode(0), "A");
    assert_eq!(encode(1), "C");
    assert_eq!(encode(-1), "D");
    assert_eq!(encode(16), "gB");
    assert_eq!(encode(123), "2H");
}

#[test]
fn vlq_encoding_decodes_back() {
    for value in [0, 1, -1, 15, -16, 123, 1024, -70_000] {
        assert_eq!(decode(&encode(value)), Some((value, encode(value).len())));
    }
    assert_eq!(decode("2HAAA"), Some((123, 2)));
    // A continuation digit with nothing after it.
    assert_eq!(decode("g"), None);
    assert_eq!(decode("!"), None);
}

#[test]
fn line_mappings_are_delta_encoded() {
    let mut mappings = LineMappings::default();
    mappings.push_line(0, 0);
    mappings.push_line(0, 1);
    mappings.push_line(1, 0);
    mappings.push_line(1, 1);

    assert_eq!(mappings.finish(), "AAAA;AACA;ACDA;AACA");
}

#[test]
fn source_map_serializes_in_v3_field_order() {
    let map = SourceMap::new("x.js".to_string(), vec!["x.ts".to_string()], "AAAA".to_string());
    assert_eq!(
        map.to_json().unwrap(),
        r#"{"version":3,"file":"x.js","sourceRoot":"","sources":["x.ts"],"names":[],"mappings":"AAAA"}"#
    );
}

#[test]
fn relocation_uses_the_base_name_of_the_first_source() {
    let relocated =
        relocate_sources(r#"{"sources":["../lib/x.ts","y.ts"],"mappings":""}"#, "../../src").unwrap();
    assert_eq!(relocated, r#"{"sources":["../../src/x.ts"],"mappings":""}"#);
}

#[test]
fn relocation_rejects_non_string_sources() {
    assert!(relocate_sources(r#"{"sources":[42]}"#, "..").is_err());
    assert!(relocate_sources("not json", "..").is_err());
}
