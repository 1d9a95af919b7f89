//! Endpoint adapter and its operation dispatch.

use crate::error::{ScimError, ScimResult};
use crate::manager::{ManagerLocator, ResourceManager, ResourceManagerFactory};
use crate::protocol::ScimResponse;
use crate::request::RequestContext;
use log::{debug, warn};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Adapter fronting a delegate resource manager for one resource type.
///
/// Holds only the injected collaborators; no per-request state is kept between
/// calls.
pub struct ResourceEndpoint<L, F> {
    resource_type: String,
    locator: L,
    factory: F,
}

/// Operations exposed by [`ResourceEndpoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointOperation {
    /// Fetch a resource by id
    Get,
    /// Create a resource from the request body
    Create,
    /// Delete a resource by id
    Delete,
    /// Replace a resource by id with the request body
    Replace,
    /// List resources using a search request body
    Search,
    /// List resources using query parameters
    List,
}

impl fmt::Display for EndpointOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Get => "get",
            Self::Create => "create",
            Self::Delete => "delete",
            Self::Replace => "replace",
            Self::Search => "search",
            Self::List => "list",
        };
        f.write_str(name)
    }
}

impl<L, F> ResourceEndpoint<L, F>
where
    L: ManagerLocator,
    L::Manager: Send + Sync,
    F: ResourceManagerFactory<L::Manager>,
    F::Delegate: Send,
{
    /// Create an endpoint for `resource_type` from its collaborators.
    pub fn new(resource_type: impl Into<String>, locator: L, factory: F) -> Self {
        Self {
            resource_type: resource_type.into(),
            locator,
            factory,
        }
    }

    /// Fetch a resource by id.
    pub async fn get(&self, context: RequestContext) -> ScimResult<ScimResponse> {
        let op = EndpointOperation::Get;
        let id = self.require_id(op, &context)?;
        let params = &context.params;
        self.call(op, &context, |delegate, manager| async move {
            delegate
                .get(
                    id,
                    &*manager,
                    params.attributes.as_deref(),
                    params.excluded_attributes.as_deref(),
                )
                .await
        })
        .await
    }

    /// Create a resource from the request body.
    pub async fn create(&self, context: RequestContext) -> ScimResult<ScimResponse> {
        let op = EndpointOperation::Create;
        let body = self.require_body(op, &context)?;
        let params = &context.params;
        self.call(op, &context, |delegate, manager| async move {
            delegate
                .create(
                    body,
                    &*manager,
                    params.attributes.as_deref(),
                    params.excluded_attributes.as_deref(),
                )
                .await
        })
        .await
    }

    /// Delete a resource by id.
    pub async fn delete(&self, context: RequestContext) -> ScimResult<ScimResponse> {
        let op = EndpointOperation::Delete;
        let id = self.require_id(op, &context)?;
        self.call(op, &context, |delegate, manager| async move {
            delegate.delete(id, &*manager).await
        })
        .await
    }

    /// Replace a resource by id with the request body.
    pub async fn replace(&self, context: RequestContext) -> ScimResult<ScimResponse> {
        let op = EndpointOperation::Replace;
        let id = self.require_id(op, &context)?;
        let body = self.require_body(op, &context)?;
        let params = &context.params;
        self.call(op, &context, |delegate, manager| async move {
            delegate
                .replace(
                    id,
                    body,
                    &*manager,
                    params.attributes.as_deref(),
                    params.excluded_attributes.as_deref(),
                )
                .await
        })
        .await
    }

    /// List resources using a search request body.
    pub async fn search(&self, context: RequestContext) -> ScimResult<ScimResponse> {
        let op = EndpointOperation::Search;
        let body = self.require_body(op, &context)?;
        self.call(op, &context, |delegate, manager| async move {
            delegate.list_by_search_body(body, &*manager).await
        })
        .await
    }

    /// List resources using query parameters.
    pub async fn list(&self, context: RequestContext) -> ScimResult<ScimResponse> {
        let op = EndpointOperation::List;
        let params = &context.params;
        debug!(
            "{} {} forwarding parameters {:?} (request: '{}')",
            self.resource_type,
            op,
            params.present(),
            context.request_id
        );
        self.call(op, &context, |delegate, manager| async move {
            delegate.list_by_filter(&*manager, params).await
        })
        .await
    }

    /// Dispatch one operation by kind.
    pub async fn handle(
        &self,
        operation: EndpointOperation,
        context: RequestContext,
    ) -> ScimResult<ScimResponse> {
        match operation {
            EndpointOperation::Get => self.get(context).await,
            EndpointOperation::Create => self.create(context).await,
            EndpointOperation::Delete => self.delete(context).await,
            EndpointOperation::Replace => self.replace(context).await,
            EndpointOperation::Search => self.search(context).await,
            EndpointOperation::List => self.list(context).await,
        }
    }

    /// Resolve collaborators, make the single delegate call and log the outcome.
    async fn call<C, Fut>(
        &self,
        op: EndpointOperation,
        context: &RequestContext,
        invoke: C,
    ) -> ScimResult<ScimResponse>
    where
        C: FnOnce(F::Delegate, Arc<L::Manager>) -> Fut,
        Fut: Future<Output = ScimResult<ScimResponse>>,
    {
        debug!(
            "{} {} dispatching to resource manager (request: '{}')",
            self.resource_type, op, context.request_id
        );

        let manager = self.locator.user_manager()?;
        let delegate = self.factory.new_manager();
        let result = invoke(delegate, manager).await;

        match &result {
            Ok(response) => debug!(
                "{} {} completed with status {} (request: '{}')",
                self.resource_type, op, response.status, context.request_id
            ),
            Err(e) => warn!(
                "{} {} failed: {} (request: '{}')",
                self.resource_type, op, e, context.request_id
            ),
        }
        result
    }

    fn require_id<'c>(
        &self,
        op: EndpointOperation,
        context: &'c RequestContext,
    ) -> ScimResult<&'c str> {
        context.resource_id.as_deref().ok_or_else(|| {
            ScimError::invalid_request(format!("Missing resource id for {} operation", op))
        })
    }

    fn require_body<'c>(
        &self,
        op: EndpointOperation,
        context: &'c RequestContext,
    ) -> ScimResult<&'c str> {
        match context.body.as_deref() {
            Some(body) if !body.trim().is_empty() => Ok(body),
            _ => Err(ScimError::format_not_supported(format!(
                "Request body is required for {} operation",
                op
            ))),
        }
    }
}
