//! Twilio webhook signature validation.
//!
//! Twilio signs each webhook with `base64(HMAC-SHA1(auth_token, url + params))`
//! where `params` is every POST field, sorted by name, written as `name` then
//! `value` with no separators.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

pub const SIGNATURE_HEADER: &str = "x-twilio-signature";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("missing X-Twilio-Signature header")]
    MissingSignature,
    #[error("webhook signature does not match")]
    InvalidSignature,
    #[error("webhook body is not valid form data")]
    MalformedBody,
}

/// The string Twilio signs for a request.
pub fn signing_payload(url: &str, params: &[(String, String)]) -> String {
    let mut sorted: Vec<&(String, String)> = params.iter().collect();
    sorted.sort();

    let mut payload = String::from(url);
    for (name, value) in sorted {
        payload.push_str(name);
        payload.push_str(value);
    }
    payload
}

/// Compute the base64 signature for `url` and `params`.
pub fn compute_signature(auth_token: &str, url: &str, params: &[(String, String)]) -> String {
    let mut mac = mac_for(auth_token);
    mac.update(signing_payload(url, params).as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

/// Check `signature` against `url` and `params`. The comparison is constant
/// time.
pub fn validate_signature(
    auth_token: &str,
    url: &str,
    params: &[(String, String)],
    signature: &str,
) -> Result<(), AuthError> {
    let expected = STANDARD
        .decode(signature.trim())
        .map_err(|_| AuthError::InvalidSignature)?;

    let mut mac = mac_for(auth_token);
    mac.update(signing_payload(url, params).as_bytes());
    mac.verify_slice(&expected)
        .map_err(|_| AuthError::InvalidSignature)
}

fn mac_for(auth_token: &str) -> HmacSha1 {
    HmacSha1::new_from_slice(auth_token.as_bytes()).expect("HMAC accepts keys of any length")
}
