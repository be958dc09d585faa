use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::{error, warn};

type HmacSha256 = Hmac<Sha256>;

/// Checks `X-Line-Signature` against the raw request body.
///
/// `body` must be the untouched bytes LINE sent; re-serialising parsed JSON
/// does not reproduce them. The claimed value is base64-decoded and compared
/// with [`Mac::verify_slice`], which runs in constant time.
pub fn verify_line_signature(body: &[u8], signature: &str, channel_secret: &str) -> bool {
    let Ok(claimed) = BASE64.decode(signature.trim().as_bytes()) else {
        warn!("X-Line-Signature is not valid base64");
        return false;
    };

    let mut mac = match HmacSha256::new_from_slice(channel_secret.as_bytes()) {
        Ok(mac) => mac,
        Err(e) => {
            error!("Failed to create HMAC: {}", e);
            return false;
        }
    };
    mac.update(body);

    if mac.verify_slice(&claimed).is_ok() {
        true
    } else {
        warn!(body_len = body.len(), "LINE signature mismatch");
        false
    }
}

/// Base64 HMAC-SHA256 of `body` keyed by the channel secret.
pub fn compute_signature(body: &[u8], channel_secret: &str) -> String {
    let mut mac = match HmacSha256::new_from_slice(channel_secret.as_bytes()) {
        Ok(mac) => mac,
        Err(e) => {
            error!("Failed to create HMAC: {}", e);
            return String::new();
        }
    };
    mac.update(body);
    BASE64.encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "channel-secret";
    const BODY: &[u8] = br#"{"destination":"U1","events":[]}"#;

    #[test]
    fn test_signature_is_deterministic() {
        assert_eq!(compute_signature(BODY, SECRET), compute_signature(BODY, SECRET));
        assert_ne!(compute_signature(BODY, SECRET), compute_signature(BODY, "other"));
    }

    #[test]
    fn test_known_vector() {
        // RFC 4231 test case 2, base64 encoded.
        let sig = compute_signature(b"what do ya want for nothing?", "Jefe");
        assert_eq!(sig, "W9zBRr9gdU5qBCQmCJV1x1oAPwidJzmDnexYuWTsOEM=");
    }

    #[test]
    fn test_valid_signature_accepted() {
        let sig = compute_signature(BODY, SECRET);
        assert!(verify_line_signature(BODY, &sig, SECRET));
    }

    #[test]
    fn test_single_character_change_rejected() {
        let sig = compute_signature(BODY, SECRET);
        let mut chars: Vec<char> = sig.chars().collect();
        chars[0] = if chars[0] == 'A' { 'B' } else { 'A' };
        let tampered: String = chars.into_iter().collect();
        assert!(!verify_line_signature(BODY, &tampered, SECRET));
    }

    #[test]
    fn test_reformatted_body_rejected() {
        let sig = compute_signature(BODY, SECRET);
        let reformatted = br#"{"destination": "U1", "events": []}"#;
        assert!(!verify_line_signature(reformatted, &sig, SECRET));
    }

    #[test]
    fn test_wrong_key_rejected() {
        let sig = compute_signature(BODY, "access-token");
        assert!(!verify_line_signature(BODY, &sig, SECRET));
    }

    #[test]
    fn test_garbage_and_empty_signatures_rejected() {
        assert!(!verify_line_signature(BODY, "", SECRET));
        assert!(!verify_line_signature(BODY, "%%%not-base64%%%", SECRET));
        assert!(!verify_line_signature(BODY, "c2hvcnQ=", SECRET));
    }
}
