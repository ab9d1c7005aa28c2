use serde_json::json;
use workspace_datasource_api::database_credentials::infrastructure::identity::access_token_claims::extract_username_from_token;

use crate::support::jwt_with_claims;

#[test]
fn reads_the_requested_claim() {
    let token = jwt_with_claims(json!({ "upn": "svc@contoso.com", "oid": "6f1d2c" }));

    assert_eq!(
        extract_username_from_token(&token, "upn"),
        Some("svc@contoso.com".to_string())
    );
    assert_eq!(
        extract_username_from_token(&token, "oid"),
        Some("6f1d2c".to_string())
    );
}

#[test]
fn missing_or_non_string_claim_yields_none() {
    let token = jwt_with_claims(json!({ "oid": 42 }));

    assert_eq!(extract_username_from_token(&token, "upn"), None);
    assert_eq!(extract_username_from_token(&token, "oid"), None);
}

#[test]
fn malformed_tokens_yield_none() {
    assert_eq!(extract_username_from_token("", "upn"), None);
    assert_eq!(extract_username_from_token("not-a-jwt", "upn"), None);
    assert_eq!(extract_username_from_token("a.%%%.c", "upn"), None);
    assert_eq!(extract_username_from_token("a.bm90LWpzb24.c", "upn"), None);
}

#[test]
fn padded_payload_is_accepted() {
    let token = jwt_with_claims(json!({ "upn": "a@b.io" }));
    let mut segments = token.split('.').map(str::to_string).collect::<Vec<_>>();
    segments[1].push_str("==");

    assert_eq!(
        extract_username_from_token(&segments.join("."), "upn"),
        Some("a@b.io".to_string())
    );
}
