//! Group representations used across tests.

use serde_json::{Value, json};

pub const GROUP_SCHEMA: &str = "urn:ietf:params:scim:schemas:core:2.0:Group";
pub const SEARCH_REQUEST_SCHEMA: &str = "urn:ietf:params:scim:api:messages:2.0:SearchRequest";

/// RFC 7643 Section 8.4 style Group with two member references.
pub fn doctors() -> Value {
    json!({
        "schemas": [GROUP_SCHEMA],
        "displayName": "Doctors",
        "members": [
            {
                "value": "e01b5773-c8f3-446d-8958-31c603b65660",
                "$ref": "https://example.com/v2/Users/2819c223-7f76-453a-919d-413861904646",
                "display": "Babs Jensen"
            },
            {
                "value": "902c246b-6245-4190-8e05-00816be7344a",
                "$ref": "https://example.com/v2/Users/902c246b-6245-4190-8e05-00816be7344a",
                "display": "Mandy Pepperidge"
            }
        ]
    })
}

/// Minimal Group with only a display name.
pub fn named(display_name: &str) -> Value {
    json!({
        "schemas": [GROUP_SCHEMA],
        "displayName": display_name
    })
}

/// SearchRequest message with optional paging.
pub fn search(start_index: Option<i64>, count: Option<i64>) -> Value {
    let mut body = json!({ "schemas": [SEARCH_REQUEST_SCHEMA] });
    if let Some(start_index) = start_index {
        body["startIndex"] = json!(start_index);
    }
    if let Some(count) = count {
        body["count"] = json!(count);
    }
    body
}
