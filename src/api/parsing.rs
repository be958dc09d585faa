use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde_json::Value;

use crate::core::json_path::{v_bool, v_str};
use crate::errors::RelayError;

pub fn get_header_value<'a>(headers: &'a Value, name: &str) -> Option<&'a str> {
    if let Some(v) = headers.get(name).and_then(|s| s.as_str()) {
        return Some(v);
    }
    headers.as_object().and_then(|map| {
        map.iter().find_map(|(k, v)| {
            if k.eq_ignore_ascii_case(name) {
                v.as_str()
            } else {
                None
            }
        })
    })
}

/// Recovers the exact bytes LINE signed from a proxy event.
///
/// API Gateway and function URLs hand binary or non-UTF-8 bodies over
/// base64-encoded; those are decoded back before hashing.
pub fn raw_body_bytes(payload: &Value) -> Result<Vec<u8>, RelayError> {
    let body = match payload.get("body") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::String(s)) => s,
        Some(_) => {
            return Err(RelayError::InvalidPayload(
                "request body is not a string".to_string(),
            ));
        }
    };

    if v_bool(payload, &["isBase64Encoded"]).unwrap_or(false) {
        BASE64
            .decode(body.as_bytes())
            .map_err(|e| RelayError::InvalidPayload(format!("body is not valid base64: {e}")))
    } else {
        Ok(body.as_bytes().to_vec())
    }
}

/// Path of a proxy event, HTTP API (`rawPath`) or REST API (`path`) shape.
pub fn request_path(payload: &Value) -> Option<&str> {
    v_str(payload, &["rawPath"]).or_else(|| v_str(payload, &["path"]))
}

pub fn request_method(payload: &Value) -> Option<&str> {
    v_str(payload, &["requestContext", "http", "method"])
        .or_else(|| v_str(payload, &["httpMethod"]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let headers = json!({"x-line-signature": "abc", "Content-Type": "application/json"});
        assert_eq!(get_header_value(&headers, "X-Line-Signature"), Some("abc"));
        assert_eq!(get_header_value(&headers, "content-type"), Some("application/json"));
        assert_eq!(get_header_value(&headers, "X-Missing"), None);
    }

    #[test]
    fn test_raw_body_plain() {
        let payload = json!({"body": "{\"events\":[]}", "isBase64Encoded": false});
        assert_eq!(raw_body_bytes(&payload).unwrap(), b"{\"events\":[]}".to_vec());
    }

    #[test]
    fn test_raw_body_base64() {
        let encoded = BASE64.encode("{\"events\": []}");
        let payload = json!({"body": encoded, "isBase64Encoded": true});
        assert_eq!(raw_body_bytes(&payload).unwrap(), b"{\"events\": []}".to_vec());
    }

    #[test]
    fn test_raw_body_bad_base64() {
        let payload = json!({"body": "not base64!!", "isBase64Encoded": true});
        assert!(matches!(
            raw_body_bytes(&payload),
            Err(RelayError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_missing_body_is_empty() {
        assert!(raw_body_bytes(&json!({})).unwrap().is_empty());
    }

    #[test]
    fn test_path_and_method_shapes() {
        let http_api = json!({"rawPath": "/webhook", "requestContext": {"http": {"method": "POST"}}});
        let rest_api = json!({"path": "/webhook", "httpMethod": "GET"});
        assert_eq!(request_path(&http_api), Some("/webhook"));
        assert_eq!(request_method(&http_api), Some("POST"));
        assert_eq!(request_path(&rest_api), Some("/webhook"));
        assert_eq!(request_method(&rest_api), Some("GET"));
    }
}
