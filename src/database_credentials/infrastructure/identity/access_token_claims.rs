use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde_json::Value;

/// Reads a string claim from the payload segment of a JWT access token.
/// Returns `None` for anything that does not decode.
pub fn extract_username_from_token(token: &str, claim: &str) -> Option<String> {
    let payload = token.split('.').nth(1)?;
    let decoded = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    let claims: Value = serde_json::from_slice(&decoded).ok()?;

    claims.get(claim)?.as_str().map(str::to_string)
}
