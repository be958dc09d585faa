//! Response builders shared by the webhook handler and the Lambda adapter.

use serde_json::{Value, json};

/// Body acknowledging a verified webhook.
#[must_use]
pub fn ok_body() -> Value {
    json!({ "status": "ok" })
}

#[must_use]
pub fn error_body(message: &str) -> Value {
    json!({ "error": message })
}

/// Returns an error response with the given status code and message.
#[must_use]
pub fn err_response(status_code: u16, message: &str) -> Value {
    proxy_response(status_code, &error_body(message))
}

/// Wraps a JSON body in the proxy-integration response shape.
#[must_use]
pub fn proxy_response(status_code: u16, body: &Value) -> Value {
    json!({
        "statusCode": status_code,
        "headers": { "content-type": "application/json" },
        "body": body.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_body_wrapped() {
        let v = proxy_response(200, &ok_body());
        assert_eq!(v["statusCode"], 200);
        assert_eq!(v["body"], r#"{"status":"ok"}"#);
        assert_eq!(v["headers"]["content-type"], "application/json");
    }

    #[test]
    fn test_err_response_shape() {
        let v = err_response(401, "Invalid signature");
        assert_eq!(v["statusCode"], 401);
        assert_eq!(v["body"], r#"{"error":"Invalid signature"}"#);
    }
}
