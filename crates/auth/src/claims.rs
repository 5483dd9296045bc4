//! Identity token claim extraction
//!
//! Pulls the `uid` claim out of a JWT payload without validating the token's
//! signature or issuer. The token is treated as an opaque dot-segmented
//! container: segment two is base64url-decoded (tolerating stripped padding)
//! and parsed as a JSON object. Callers decide what a failure means; the
//! session treats it as non-fatal and stores the credential without a user id.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;

/// Extract the `uid` claim from an identity token's payload segment
///
/// The token must have at least two dot-separated segments (header and
/// payload); a trailing signature segment is not required and is never
/// inspected. Stripped base64url padding is tolerated by right-padding with
/// `=` to a multiple of 4 before decoding.
///
/// # Arguments
/// * `id_token` - The compact-serialized identity token
///
/// # Errors
/// Returns a description of the first decode step that failed: too few
/// segments, payload not base64url, payload not UTF-8 JSON, or no string
/// `uid` claim.
pub fn extract_uid(id_token: &str) -> Result<String, String> {
    let segments: Vec<&str> = id_token.split('.').collect();
    if segments.len() < 2 {
        return Err(format!("invalid identity token format: {} segment(s)", segments.len()));
    }

    let payload_bytes = URL_SAFE
        .decode(pad_segment(segments[1]))
        .map_err(|err| format!("failed to decode identity token payload: {err}"))?;
    let payload_str = String::from_utf8(payload_bytes)
        .map_err(|err| format!("invalid UTF-8 in identity token payload: {err}"))?;

    let payload: serde_json::Value = serde_json::from_str(&payload_str)
        .map_err(|err| format!("failed to parse identity token payload: {err}"))?;

    payload
        .get("uid")
        .and_then(|value| value.as_str())
        .map(str::to_string)
        .ok_or_else(|| "uid claim missing from identity token".to_string())
}

/// Right-pad a base64url segment with `=` to a multiple of 4 characters.
fn pad_segment(segment: &str) -> String {
    match segment.len() % 4 {
        0 => segment.to_string(),
        remainder => format!("{}{}", segment, "=".repeat(4 - remainder)),
    }
}
