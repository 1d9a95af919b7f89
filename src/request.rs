//! Request context and query parameters for SCIM endpoint calls.
//!
//! A [`RequestContext`] is built for every inbound call, handed to the adapter by
//! value and dropped once the response is produced.

use crate::protocol::constants;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-call request context.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestContext {
    /// Unique identifier for this request, used for log correlation
    pub request_id: String,
    /// Resource ID for single-item operations
    pub resource_id: Option<String>,
    /// Recognised query parameters
    pub params: QueryParams,
    /// Raw request body for create, replace and search
    pub body: Option<String>,
}

/// Query parameters recognised by the endpoint.
///
/// Absent parameters stay `None`; nothing here invents defaults. Pagination values
/// are kept signed and unclamped so the resource manager sees exactly what the client
/// sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    /// Comma separated attributes to return
    pub attributes: Option<String>,
    /// Comma separated attributes to omit
    pub excluded_attributes: Option<String>,
    /// Filter expression
    pub filter: Option<String>,
    /// 1-based index of the first result
    pub start_index: Option<i64>,
    /// Maximum number of results per page
    pub count: Option<i64>,
    /// Attribute to sort by
    pub sort_by: Option<String>,
    /// `ascending` or `descending`
    pub sort_order: Option<String>,
}

impl RequestContext {
    /// Create a new context with a generated request ID.
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            ..Default::default()
        }
    }

    /// Create a context targeting a single resource.
    pub fn for_resource(id: impl Into<String>) -> Self {
        Self::new().with_resource_id(id)
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    pub fn with_resource_id(mut self, id: impl Into<String>) -> Self {
        self.resource_id = Some(id.into());
        self
    }

    pub fn with_params(mut self, params: QueryParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

impl QueryParams {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set attribute projection parameters.
    pub fn with_projection(
        mut self,
        attributes: Option<&str>,
        excluded_attributes: Option<&str>,
    ) -> Self {
        self.attributes = attributes.map(str::to_string);
        self.excluded_attributes = excluded_attributes.map(str::to_string);
        self
    }

    /// Set filter expression.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Set pagination parameters.
    pub fn with_pagination(mut self, start_index: i64, count: i64) -> Self {
        self.start_index = Some(start_index);
        self.count = Some(count);
        self
    }

    /// Set sort parameters.
    pub fn with_sort(mut self, sort_by: impl Into<String>, sort_order: impl Into<String>) -> Self {
        self.sort_by = Some(sort_by.into());
        self.sort_order = Some(sort_order.into());
        self
    }

    /// Iterate over the parameters that are present, using their wire names.
    pub fn present(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        let strings = [
            (constants::ATTRIBUTES, &self.attributes),
            (constants::EXCLUDED_ATTRIBUTES, &self.excluded_attributes),
            (constants::FILTER, &self.filter),
            (constants::SORT_BY, &self.sort_by),
            (constants::SORT_ORDER, &self.sort_order),
        ];
        for (name, value) in strings {
            if let Some(value) = value {
                out.push((name, value.clone()));
            }
        }
        if let Some(start_index) = self.start_index {
            out.push((constants::START_INDEX, start_index.to_string()));
        }
        if let Some(count) = self.count {
            out.push((constants::COUNT, count.to_string()));
        }
        out
    }
}
