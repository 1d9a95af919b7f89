//! Protocol constants.

/// Media type consumed and produced by the endpoint.
pub const SCIM_MEDIA_TYPE: &str = "application/scim+json";

pub const GROUP_SCHEMA: &str = "urn:ietf:params:scim:schemas:core:2.0:Group";
pub const LIST_RESPONSE_SCHEMA: &str = "urn:ietf:params:scim:api:messages:2.0:ListResponse";
pub const SEARCH_REQUEST_SCHEMA: &str = "urn:ietf:params:scim:api:messages:2.0:SearchRequest";
pub const ERROR_SCHEMA: &str = "urn:ietf:params:scim:api:messages:2.0:Error";

// Query parameter names as they appear on the wire
pub const ATTRIBUTES: &str = "attributes";
pub const EXCLUDED_ATTRIBUTES: &str = "excludedAttributes";
pub const FILTER: &str = "filter";
pub const START_INDEX: &str = "startIndex";
pub const COUNT: &str = "count";
pub const SORT_BY: &str = "sortBy";
pub const SORT_ORDER: &str = "sortOrder";
