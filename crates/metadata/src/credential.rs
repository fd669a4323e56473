//! Label extraction from a stored bearer token.
//!
//! The token's middle segment is decoded and read as JSON. No signature is
//! checked: the result is a display label, never proof of identity.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use serde_json::Value;

use crate::error::CredentialError;
use crate::traits::first_label;

/// Storage key the host keeps its session token under.
pub const CREDENTIAL_STORAGE_KEY: &str = "qnotes_token";

const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decode the payload segment of `token` into a JSON object.
pub fn decode_payload(token: &str) -> Result<serde_json::Map<String, Value>, CredentialError> {
    let segment = token
        .split('.')
        .nth(1)
        .ok_or(CredentialError::MissingPayload)?;
    // Tokens minted with the standard alphabet still decode.
    let normalized: String = segment
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();
    let bytes = PAYLOAD_ENGINE.decode(normalized.as_bytes())?;
    let text = String::from_utf8(bytes)?;
    match serde_json::from_str::<Value>(&text)? {
        Value::Object(map) => Ok(map),
        _ => Err(CredentialError::NotAnObject),
    }
}

/// Display name from the token payload, falling back to its username.
pub fn decode_credential_label(token: &str) -> Result<Option<String>, CredentialError> {
    let payload = decode_payload(token)?;
    let text = |key: &str| payload.get(key).and_then(Value::as_str);
    Ok(first_label(&[text("full_name"), text("username")]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::{STANDARD, URL_SAFE, URL_SAFE_NO_PAD};
    use serde_json::json;

    fn token_with(payload: &Value) -> String {
        let body = URL_SAFE_NO_PAD.encode(payload.to_string());
        format!("eyJhbGciOiJIUzI1NiJ9.{body}.c2lnbmF0dXJl")
    }

    #[test]
    fn reads_full_name() {
        let token = token_with(&json!({"full_name": "Alice Liddell", "username": "alice"}));
        assert_eq!(decode_credential_label(&token).unwrap().as_deref(), Some("Alice Liddell"));
    }

    #[test]
    fn falls_back_to_username() {
        let token = token_with(&json!({"full_name": "", "username": " alice "}));
        assert_eq!(decode_credential_label(&token).unwrap().as_deref(), Some("alice"));
    }

    #[test]
    fn no_label_fields_is_none() {
        let token = token_with(&json!({"sub": 42}));
        assert_eq!(decode_credential_label(&token).unwrap(), None);
    }

    #[test]
    fn padded_payload_decodes() {
        let body = URL_SAFE.encode(json!({"username": "bob"}).to_string());
        let token = format!("h.{body}.s");
        assert_eq!(decode_credential_label(&token).unwrap().as_deref(), Some("bob"));
    }

    #[test]
    fn standard_alphabet_payload_decodes() {
        let body = STANDARD.encode(json!({"username": "??>"}).to_string());
        let token = format!("h.{body}");
        assert_eq!(decode_credential_label(&token).unwrap().as_deref(), Some("??>"));
    }

    #[test]
    fn non_ascii_names_survive() {
        let token = token_with(&json!({"full_name": "张三"}));
        assert_eq!(decode_credential_label(&token).unwrap().as_deref(), Some("张三"));
    }

    #[test]
    fn single_segment_is_missing_payload() {
        assert!(matches!(decode_payload("opaque"), Err(CredentialError::MissingPayload)));
    }

    #[test]
    fn bad_base64_is_error() {
        assert!(matches!(decode_payload("h.!!!.s"), Err(CredentialError::Base64(_))));
    }

    #[test]
    fn non_json_payload_is_error() {
        let body = URL_SAFE_NO_PAD.encode("not json");
        assert!(matches!(decode_payload(&format!("h.{body}.s")), Err(CredentialError::Json(_))));
    }

    #[test]
    fn json_array_payload_is_not_an_object() {
        let body = URL_SAFE_NO_PAD.encode("[1,2]");
        assert!(matches!(decode_payload(&format!("h.{body}.s")), Err(CredentialError::NotAnObject)));
    }

    #[test]
    fn invalid_utf8_is_error() {
        let body = URL_SAFE_NO_PAD.encode([0xff, 0xfe, 0xfd]);
        assert!(matches!(decode_payload(&format!("h.{body}.s")), Err(CredentialError::Utf8(_))));
    }
}
