//! Group resource manager backed by a [`UserManager`] store.
//!
//! Implements the subset of RFC 7644 needed to serve a `/Groups` collection:
//! create, fetch, replace and delete by id, plus paginated listing. Filter
//! evaluation and sorting are not provided; a filter is rejected with
//! `invalidFilter` and sort parameters are accepted but leave the natural
//! (creation) order in place.
//!
//! Every failure is encoded into a SCIM error response, so callers always receive
//! a complete [`ScimResponse`]. `displayName` uniqueness is enforced by the
//! [`UserManager`] store.

use super::{ResourceManager, UserManager};
use crate::error::{ScimError, ScimResult};
use crate::protocol::ScimResponse;
use crate::protocol::constants::{
    GROUP_SCHEMA, LIST_RESPONSE_SCHEMA, SCIM_MEDIA_TYPE, SEARCH_REQUEST_SCHEMA,
};
use crate::request::QueryParams;
use chrono::{SecondsFormat, Utc};
use log::debug;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use uuid::Uuid;

// Always returned regardless of projection
const ALWAYS_RETURNED: [&str; 2] = ["schemas", "id"];

/// Delegate resource manager for SCIM Groups.
#[derive(Debug, Clone)]
pub struct GroupResourceManager {
    resource_type: String,
    location_base: String,
}

/// Body of a `POST /.search` request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest {
    schemas: Vec<String>,
    attributes: Option<Vec<String>>,
    excluded_attributes: Option<Vec<String>>,
    filter: Option<String>,
    sort_by: Option<String>,
    sort_order: Option<String>,
    start_index: Option<i64>,
    count: Option<i64>,
}

impl Default for GroupResourceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupResourceManager {
    pub fn new() -> Self {
        Self {
            resource_type: "Group".to_string(),
            location_base: "/scim/v2/Groups".to_string(),
        }
    }

    /// Set the collection URL used for `meta.location` and the `Location` header.
    pub fn with_location_base(mut self, location_base: impl Into<String>) -> Self {
        self.location_base = location_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    fn location(&self, id: &str) -> String {
        format!("{}/{}", self.location_base, id)
    }

    fn parse_group(&self, body: &str) -> ScimResult<Map<String, Value>> {
        let value: Value = serde_json::from_str(body)?;
        let Value::Object(group) = value else {
            return Err(ScimError::format_not_supported(
                "Group representation must be a JSON object",
            ));
        };

        let has_group_schema = group
            .get("schemas")
            .and_then(Value::as_array)
            .is_some_and(|schemas| schemas.iter().any(|s| s.as_str() == Some(GROUP_SCHEMA)));
        if !has_group_schema {
            return Err(ScimError::invalid_request(format!(
                "'schemas' must contain {}",
                GROUP_SCHEMA
            )));
        }

        match group.get("displayName").and_then(Value::as_str) {
            Some(name) if !name.trim().is_empty() => Ok(group),
            _ => Err(ScimError::invalid_request(
                "Required attribute 'displayName' is missing",
            )),
        }
    }

    fn resource_response(&self, status: u16, group: &Value, projection: Projection) -> ScimResponse {
        let id = group.get("id").and_then(Value::as_str).unwrap_or_default();
        let mut response = ScimResponse::new(status)
            .with_header("Content-Type", SCIM_MEDIA_TYPE)
            .with_header("Location", self.location(id));
        if let Some(version) = group.pointer("/meta/version").and_then(Value::as_str) {
            response = response.with_header("ETag", version);
        }
        response.with_body(projection.apply(group.clone()).to_string())
    }

    async fn do_create<U: UserManager>(
        &self,
        body: &str,
        user_manager: &U,
        projection: Projection,
    ) -> ScimResult<ScimResponse> {
        let mut group = self.parse_group(body)?;
        let name = group
            .get("displayName")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let id = Uuid::new_v4().to_string();
        let now = timestamp();
        group.insert("id".to_string(), Value::String(id.clone()));
        group.insert(
            "meta".to_string(),
            json!({
                "resourceType": self.resource_type,
                "created": now,
                "lastModified": now,
                "location": self.location(&id),
                "version": version_tag(),
            }),
        );

        let stored = user_manager.create_group(Value::Object(group)).await?;
        debug!("Created {} '{}' with id {}", self.resource_type, name, id);
        Ok(self.resource_response(201, &stored, projection))
    }

    async fn do_get<U: UserManager>(
        &self,
        id: &str,
        user_manager: &U,
        projection: Projection,
    ) -> ScimResult<ScimResponse> {
        match user_manager.get_group(id).await? {
            Some(group) => Ok(self.resource_response(200, &group, projection)),
            None => Err(ScimError::resource_not_found(&self.resource_type, id)),
        }
    }

    async fn do_replace<U: UserManager>(
        &self,
        id: &str,
        body: &str,
        user_manager: &U,
        projection: Projection,
    ) -> ScimResult<ScimResponse> {
        let mut group = self.parse_group(body)?;
        let existing = user_manager
            .get_group(id)
            .await?
            .ok_or_else(|| ScimError::resource_not_found(&self.resource_type, id))?;

        let now = timestamp();
        let created = existing
            .pointer("/meta/created")
            .cloned()
            .unwrap_or_else(|| Value::String(now.clone()));
        group.insert("id".to_string(), Value::String(id.to_string()));
        group.insert(
            "meta".to_string(),
            json!({
                "resourceType": self.resource_type,
                "created": created,
                "lastModified": now,
                "location": self.location(id),
                "version": version_tag(),
            }),
        );

        let stored = user_manager
            .update_group(id, Value::Object(group))
            .await?
            .ok_or_else(|| ScimError::resource_not_found(&self.resource_type, id))?;
        Ok(self.resource_response(200, &stored, projection))
    }

    async fn do_delete<U: UserManager>(&self, id: &str, user_manager: &U) -> ScimResult<ScimResponse> {
        if user_manager.delete_group(id).await? {
            Ok(ScimResponse::new(204))
        } else {
            Err(ScimError::resource_not_found(&self.resource_type, id))
        }
    }

    async fn do_list<U: UserManager>(
        &self,
        user_manager: &U,
        page: Page,
        filter: Option<&str>,
        projection: Projection,
    ) -> ScimResult<ScimResponse> {
        if let Some(filter) = filter {
            return Err(ScimError::invalid_filter(format!(
                "Filtering is not supported by this resource manager: {}",
                filter
            )));
        }

        let groups = user_manager.list_groups().await?;
        let total = groups.len();
        let resources: Vec<Value> = groups
            .into_iter()
            .skip(page.offset())
            .take(page.limit())
            .map(|g| projection.apply(g))
            .collect();

        let body = json!({
            "schemas": [LIST_RESPONSE_SCHEMA],
            "totalResults": total,
            "startIndex": page.start_index,
            "itemsPerPage": resources.len(),
            "Resources": resources,
        });
        Ok(ScimResponse::new(200)
            .with_header("Content-Type", SCIM_MEDIA_TYPE)
            .with_body(body.to_string()))
    }

    async fn do_search<U: UserManager>(&self, body: &str, user_manager: &U) -> ScimResult<ScimResponse> {
        let request: SearchRequest = serde_json::from_str(body)?;
        if !request.schemas.iter().any(|s| s == SEARCH_REQUEST_SCHEMA) {
            return Err(ScimError::invalid_request(format!(
                "'schemas' must contain {}",
                SEARCH_REQUEST_SCHEMA
            )));
        }
        debug!(
            "Search on {} ignoring sort {:?}/{:?}",
            self.resource_type, request.sort_by, request.sort_order
        );

        let projection = Projection {
            attributes: request.attributes.unwrap_or_default(),
            excluded: request.excluded_attributes.unwrap_or_default(),
        };
        let page = Page::new(request.start_index, request.count);
        self.do_list(user_manager, page, request.filter.as_deref(), projection)
            .await
    }
}

/// Encode delegate failures as SCIM error responses.
fn encode(result: ScimResult<ScimResponse>) -> ScimResult<ScimResponse> {
    Ok(result.unwrap_or_else(|e| {
        debug!("Encoding resource manager error: {}", e);
        e.to_response()
    }))
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn version_tag() -> String {
    format!("W/\"{}\"", Uuid::new_v4().simple())
}

impl<U> ResourceManager<U> for GroupResourceManager
where
    U: UserManager + Sync,
{
    async fn get(
        &self,
        id: &str,
        user_manager: &U,
        attributes: Option<&str>,
        excluded_attributes: Option<&str>,
    ) -> ScimResult<ScimResponse> {
        let projection = Projection::parse(attributes, excluded_attributes);
        encode(self.do_get(id, user_manager, projection).await)
    }

    async fn create(
        &self,
        body: &str,
        user_manager: &U,
        attributes: Option<&str>,
        excluded_attributes: Option<&str>,
    ) -> ScimResult<ScimResponse> {
        let projection = Projection::parse(attributes, excluded_attributes);
        encode(self.do_create(body, user_manager, projection).await)
    }

    async fn delete(&self, id: &str, user_manager: &U) -> ScimResult<ScimResponse> {
        encode(self.do_delete(id, user_manager).await)
    }

    async fn replace(
        &self,
        id: &str,
        body: &str,
        user_manager: &U,
        attributes: Option<&str>,
        excluded_attributes: Option<&str>,
    ) -> ScimResult<ScimResponse> {
        let projection = Projection::parse(attributes, excluded_attributes);
        encode(self.do_replace(id, body, user_manager, projection).await)
    }

    async fn list_by_filter(
        &self,
        user_manager: &U,
        params: &QueryParams,
    ) -> ScimResult<ScimResponse> {
        let projection = Projection::parse(
            params.attributes.as_deref(),
            params.excluded_attributes.as_deref(),
        );
        let page = Page::new(params.start_index, params.count);
        encode(
            self.do_list(user_manager, page, params.filter.as_deref(), projection)
                .await,
        )
    }

    async fn list_by_search_body(&self, body: &str, user_manager: &U) -> ScimResult<ScimResponse> {
        encode(self.do_search(body, user_manager).await)
    }
}

/// Attribute projection over top-level attributes.
#[derive(Debug, Default)]
struct Projection {
    attributes: Vec<String>,
    excluded: Vec<String>,
}

impl Projection {
    fn parse(attributes: Option<&str>, excluded: Option<&str>) -> Self {
        fn split(list: Option<&str>) -> Vec<String> {
            list.map(|l| {
                l.split(',')
                    .map(str::trim)
                    .filter(|a| !a.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
        }
        Self {
            attributes: split(attributes),
            excluded: split(excluded),
        }
    }

    fn apply(&self, resource: Value) -> Value {
        let Value::Object(map) = resource else {
            return resource;
        };
        fn listed<S: AsRef<str>>(list: &[S], key: &str) -> bool {
            list.iter().any(|a| a.as_ref().eq_ignore_ascii_case(key))
        }

        let projected = map
            .into_iter()
            .filter(|(key, _)| {
                if listed(&ALWAYS_RETURNED, key) {
                    return true;
                }
                if !self.attributes.is_empty() {
                    return listed(&self.attributes, key);
                }
                !listed(&self.excluded, key)
            })
            .collect();
        Value::Object(projected)
    }
}

/// 1-based pagination window.
#[derive(Debug, Clone, Copy)]
struct Page {
    start_index: usize,
    count: Option<usize>,
}

impl Page {
    fn new(start_index: Option<i64>, count: Option<i64>) -> Self {
        Self {
            start_index: start_index.map_or(1, |s| s.max(1) as usize),
            count: count.map(|c| c.max(0) as usize),
        }
    }

    fn offset(&self) -> usize {
        self.start_index - 1
    }

    fn limit(&self) -> usize {
        self.count.unwrap_or(usize::MAX)
    }
}
