//! Envelope decoder for the vendor's nested reply format.
//!
//! # Design
//! The vendor wraps three encodings inside one another: the body is JSON, its
//! `ContextData` member is an ordered `{Key,Value}` array rather than an
//! object, the array's `TEResponse` value is a flat XML document, and that
//! document's `TrustevDetailedDecision` element is a JSON-encoded string.
//! `decode_envelope` reverses all three layers and returns the normalized
//! value with real nested objects in place of the encoded strings.
//!
//! The decoder also owns the opt-in Windows-1252 repair pre-pass. The vendor
//! historically emitted Windows-1252 bytes; replies from the fixed vendor are
//! plain UTF-8, and running the repair on them corrupts any multi-byte
//! sequence, so it stays behind a flag (`Config::repair_legacy_encoding`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CaseError;
use crate::xml;

/// One entry of the vendor's ordered key/value sequence.
///
/// Used on both sides of the wire: the outbound `Fields` member is a sequence
/// of these (order is part of the contract), and the inbound `ContextData`
/// member is decoded from them into a map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyValuePair {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Value")]
    pub value: Value,
}

impl KeyValuePair {
    pub fn new(key: &str, value: impl Into<Value>) -> Self {
        Self {
            key: key.to_string(),
            value: value.into(),
        }
    }
}

/// Convert a key/value sequence to a map. Last write wins for a repeated key;
/// the vendor never repeats keys in practice.
pub fn pairs_to_map(pairs: Vec<KeyValuePair>) -> Map<String, Value> {
    let mut map = Map::new();
    for pair in pairs {
        map.insert(pair.key, pair.value);
    }
    map
}

/// Decode a raw response body into the normalized envelope.
///
/// Stages, each depending on the previous:
/// 1. parse the body as JSON;
/// 2. convert `ContextData` from a `{Key,Value}` array to a map;
/// 3. parse the map's `TEResponse` string as flat XML into string fields;
/// 4. if `TrustevDetailedDecision` is present, parse its value as JSON and
///    replace the string in place;
/// 5. write the transformed maps back and return the whole value.
pub fn decode_envelope(raw: &str) -> Result<Value, CaseError> {
    let mut result: Value = serde_json::from_str(raw)
        .map_err(|e| malformed(format!("response body is not JSON: {e}")))?;

    let context_value = result
        .get_mut("ContextData")
        .ok_or_else(|| malformed("ContextData missing".to_string()))?
        .take();
    let pairs: Vec<KeyValuePair> = serde_json::from_value(context_value)
        .map_err(|e| malformed(format!("ContextData is not a Key/Value array: {e}")))?;
    let mut context = pairs_to_map(pairs);

    let te_xml = match context.get("TEResponse") {
        Some(Value::String(s)) => s.clone(),
        Some(_) => return Err(malformed("TEResponse is not a string".to_string())),
        None => return Err(malformed("TEResponse missing from ContextData".to_string())),
    };
    let mut te = Map::new();
    for (tag, text) in
        xml::parse_flat(&te_xml).map_err(|e| malformed(format!("TEResponse XML: {e}")))?
    {
        te.insert(tag, Value::String(text));
    }

    if let Some(Value::String(detail)) = te.get("TrustevDetailedDecision") {
        let parsed: Value = serde_json::from_str(detail)
            .map_err(|e| malformed(format!("TrustevDetailedDecision is not JSON: {e}")))?;
        te.insert("TrustevDetailedDecision".to_string(), parsed);
    }

    context.insert("TEResponse".to_string(), Value::Object(te));
    result["ContextData"] = Value::Object(context);
    Ok(result)
}

/// Decode a raw response body from bytes, optionally applying the
/// Windows-1252 repair pre-pass first. Without the repair, the bytes must be
/// valid UTF-8.
pub fn decode_envelope_bytes(raw: &[u8], repair: bool) -> Result<Value, CaseError> {
    if repair {
        return decode_envelope(&repair_windows_1252(raw));
    }
    let text = std::str::from_utf8(raw)
        .map_err(|e| malformed(format!("response body is not valid UTF-8: {e}")))?;
    decode_envelope(text)
}

/// Reinterpret a byte string as Windows-1252 text.
///
/// Total: every byte maps to a character, so this never fails — which is
/// exactly why it must stay opt-in. Applied to valid UTF-8 it turns each byte
/// of a multi-byte sequence into a separate character.
pub fn repair_windows_1252(raw: &[u8]) -> String {
    raw.iter()
        .map(|&b| match b {
            0x80..=0x9F => CP1252_C1[(b - 0x80) as usize],
            _ => b as char,
        })
        .collect()
}

/// Windows-1252 mappings for the 0x80–0x9F range (the rest of the code page
/// coincides with Latin-1). The five undefined bytes map to the corresponding
/// C1 controls.
const CP1252_C1: [char; 32] = [
    '\u{20AC}', '\u{0081}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{008D}', '\u{017D}', '\u{008F}',
    '\u{0090}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{009D}', '\u{017E}', '\u{0178}',
];

fn malformed(msg: String) -> CaseError {
    CaseError::MalformedEnvelope(msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pairs_to_map_empty() {
        assert!(pairs_to_map(Vec::new()).is_empty());
    }

    #[test]
    fn pairs_to_map_keeps_values() {
        let pairs = vec![
            KeyValuePair::new("x", "y"),
            KeyValuePair::new("a", 5),
            KeyValuePair::new("b", true),
        ];
        let map = pairs_to_map(pairs);
        assert_eq!(map["x"], json!("y"));
        assert_eq!(map["a"], json!(5));
        assert_eq!(map["b"], json!(true));
    }

    #[test]
    fn pairs_to_map_last_write_wins() {
        let pairs = vec![KeyValuePair::new("k", "first"), KeyValuePair::new("k", "second")];
        assert_eq!(pairs_to_map(pairs)["k"], json!("second"));
    }

    #[test]
    fn pair_serializes_with_wire_names() {
        let pair = KeyValuePair::new("SessionID", "abc");
        assert_eq!(serde_json::to_value(&pair).unwrap(), json!({"Key": "SessionID", "Value": "abc"}));
    }

    #[test]
    fn decode_without_detailed_decision() {
        let body = json!({
            "a": "b",
            "x": 42,
            "ContextData": [
                {"Key": "TEResponse", "Value": "<root><child>value</child></root>"}
            ]
        })
        .to_string();

        let decoded = decode_envelope(&body).unwrap();
        assert_eq!(
            decoded,
            json!({
                "a": "b",
                "x": 42,
                "ContextData": {"TEResponse": {"child": "value"}}
            })
        );
    }

    #[test]
    fn decode_replaces_detailed_decision_string_with_object() {
        let detail = json!({"y": true}).to_string();
        let body = json!({
            "ContextData": [
                {
                    "Key": "TEResponse",
                    "Value": format!("<root><TrustevDetailedDecision>{detail}</TrustevDetailedDecision></root>")
                }
            ]
        })
        .to_string();

        let decoded = decode_envelope(&body).unwrap();
        assert_eq!(
            decoded["ContextData"]["TEResponse"]["TrustevDetailedDecision"],
            json!({"y": true})
        );
    }

    #[test]
    fn decode_keeps_xml_values_as_strings() {
        let body = json!({
            "ContextData": [
                {"Key": "TEResponse", "Value": "<root><child1>x</child1><child2>42</child2></root>"}
            ]
        })
        .to_string();

        let te = &decode_envelope(&body).unwrap()["ContextData"]["TEResponse"];
        assert_eq!(te["child1"], json!("x"));
        assert_eq!(te["child2"], json!("42"));
    }

    #[test]
    fn decode_preserves_unrelated_context_keys() {
        let body = json!({
            "ContextData": [
                {"Key": "CaseNumber", "Value": "123"},
                {"Key": "TEResponse", "Value": "<root></root>"}
            ]
        })
        .to_string();

        let decoded = decode_envelope(&body).unwrap();
        assert_eq!(decoded["ContextData"]["CaseNumber"], json!("123"));
    }

    #[test]
    fn decode_rejects_non_json_body() {
        let err = decode_envelope("not json").unwrap_err();
        assert!(matches!(err, CaseError::MalformedEnvelope(_)));
    }

    #[test]
    fn decode_rejects_missing_context_data() {
        let err = decode_envelope(r#"{"a":"b"}"#).unwrap_err();
        assert!(err.to_string().contains("ContextData"));
    }

    #[test]
    fn decode_rejects_missing_te_response() {
        let body = json!({"ContextData": [{"Key": "Other", "Value": "x"}]}).to_string();
        let err = decode_envelope(&body).unwrap_err();
        assert!(err.to_string().contains("TEResponse"));
    }

    #[test]
    fn decode_rejects_bad_xml() {
        let body = json!({
            "ContextData": [{"Key": "TEResponse", "Value": "<root><broken></root>"}]
        })
        .to_string();
        assert!(matches!(decode_envelope(&body), Err(CaseError::MalformedEnvelope(_))));
    }

    #[test]
    fn decode_rejects_bad_detailed_decision_json() {
        let body = json!({
            "ContextData": [
                {"Key": "TEResponse", "Value": "<r><TrustevDetailedDecision>{oops</TrustevDetailedDecision></r>"}
            ]
        })
        .to_string();
        assert!(matches!(decode_envelope(&body), Err(CaseError::MalformedEnvelope(_))));
    }

    #[test]
    fn repair_maps_cp1252_punctuation() {
        assert_eq!(
            repair_windows_1252(b"I am non\x96unicode response"),
            "I am non\u{2013}unicode response"
        );
    }

    #[test]
    fn repair_passes_ascii_through() {
        assert_eq!(repair_windows_1252(b"plain ascii"), "plain ascii");
    }

    #[test]
    fn repair_corrupts_valid_utf8() {
        // En dash is 0xE2 0x80 0x93 in UTF-8; byte-wise CP1252 yields "â€“".
        assert_eq!(repair_windows_1252("\u{2013}".as_bytes()), "\u{E2}\u{20AC}\u{201C}");
    }

    #[test]
    fn decode_bytes_with_repair_handles_legacy_body() {
        let body = json!({
            "ContextData": [
                {"Key": "TEResponse", "Value": "<root><ErrorText>non_unicode</ErrorText></root>"}
            ]
        })
        .to_string();
        let mut bytes = body.into_bytes();
        // Plant a raw CP1252 en dash where the underscore was.
        let pos = bytes.iter().position(|&b| b == b'_').unwrap();
        bytes[pos] = 0x96;

        let decoded = decode_envelope_bytes(&bytes, true).unwrap();
        assert_eq!(
            decoded["ContextData"]["TEResponse"]["ErrorText"],
            json!("non\u{2013}unicode")
        );
    }

    #[test]
    fn decode_bytes_without_repair_rejects_invalid_utf8() {
        let err = decode_envelope_bytes(b"{\"a\":\"\x96\"}", false).unwrap_err();
        assert!(err.to_string().contains("UTF-8"));
    }
}
