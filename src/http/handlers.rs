//! Route handlers: extract path, query and body into a [`RequestContext`] and hand
//! it to the endpoint.

use crate::endpoint::ResourceEndpoint;
use crate::error::{ScimError, ScimResult};
use crate::manager::{ManagerLocator, ResourceManagerFactory};
use crate::protocol::ScimResponse;
use crate::request::{QueryParams, RequestContext};
use axum::extract::rejection::{QueryRejection, StringRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use std::sync::Arc;

type Endpoint<L, F> = State<Arc<ResourceEndpoint<L, F>>>;

/// Query parameters taken by the single-resource routes; other keys are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ProjectionQuery {
    attributes: Option<String>,
    excluded_attributes: Option<String>,
}

fn params(query: Result<Query<QueryParams>, QueryRejection>) -> ScimResult<QueryParams> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| ScimError::format_not_supported(rejection.body_text()))
}

fn projection(query: Result<Query<ProjectionQuery>, QueryRejection>) -> ScimResult<QueryParams> {
    let Query(projection) =
        query.map_err(|rejection| ScimError::format_not_supported(rejection.body_text()))?;
    Ok(QueryParams::new().with_projection(
        projection.attributes.as_deref(),
        projection.excluded_attributes.as_deref(),
    ))
}

// An empty body is forwarded as absent so the endpoint reports it.
fn body(raw: Result<String, StringRejection>) -> ScimResult<Option<String>> {
    match raw {
        Ok(raw) if raw.is_empty() => Ok(None),
        Ok(raw) => Ok(Some(raw)),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            Err(ScimError::protocol(413, rejection.body_text()))
        }
        Err(rejection) => Err(ScimError::format_not_supported(rejection.body_text())),
    }
}

pub(super) async fn get<L, F>(
    State(endpoint): Endpoint<L, F>,
    Path(id): Path<String>,
    query: Result<Query<ProjectionQuery>, QueryRejection>,
) -> ScimResult<ScimResponse>
where
    L: ManagerLocator + Send + Sync + 'static,
    L::Manager: Send + Sync + 'static,
    F: ResourceManagerFactory<L::Manager> + Send + Sync + 'static,
    F::Delegate: Send + 'static,
{
    let projection = projection(query)?;
    let context = RequestContext::for_resource(id).with_params(projection);
    endpoint.get(context).await
}

pub(super) async fn list<L, F>(
    State(endpoint): Endpoint<L, F>,
    query: Result<Query<QueryParams>, QueryRejection>,
) -> ScimResult<ScimResponse>
where
    L: ManagerLocator + Send + Sync + 'static,
    L::Manager: Send + Sync + 'static,
    F: ResourceManagerFactory<L::Manager> + Send + Sync + 'static,
    F::Delegate: Send + 'static,
{
    let context = RequestContext::new().with_params(params(query)?);
    endpoint.list(context).await
}

pub(super) async fn create<L, F>(
    State(endpoint): Endpoint<L, F>,
    query: Result<Query<ProjectionQuery>, QueryRejection>,
    raw: Result<String, StringRejection>,
) -> ScimResult<ScimResponse>
where
    L: ManagerLocator + Send + Sync + 'static,
    L::Manager: Send + Sync + 'static,
    F: ResourceManagerFactory<L::Manager> + Send + Sync + 'static,
    F::Delegate: Send + 'static,
{
    let projection = projection(query)?;
    let body = body(raw)?;
    let mut context = RequestContext::new().with_params(projection);
    context.body = body;
    endpoint.create(context).await
}

pub(super) async fn search<L, F>(
    State(endpoint): Endpoint<L, F>,
    raw: Result<String, StringRejection>,
) -> ScimResult<ScimResponse>
where
    L: ManagerLocator + Send + Sync + 'static,
    L::Manager: Send + Sync + 'static,
    F: ResourceManagerFactory<L::Manager> + Send + Sync + 'static,
    F::Delegate: Send + 'static,
{
    let mut context = RequestContext::new();
    context.body = body(raw)?;
    endpoint.search(context).await
}

pub(super) async fn replace<L, F>(
    State(endpoint): Endpoint<L, F>,
    Path(id): Path<String>,
    query: Result<Query<ProjectionQuery>, QueryRejection>,
    raw: Result<String, StringRejection>,
) -> ScimResult<ScimResponse>
where
    L: ManagerLocator + Send + Sync + 'static,
    L::Manager: Send + Sync + 'static,
    F: ResourceManagerFactory<L::Manager> + Send + Sync + 'static,
    F::Delegate: Send + 'static,
{
    let projection = projection(query)?;
    let body = body(raw)?;
    let mut context = RequestContext::for_resource(id).with_params(projection);
    context.body = body;
    endpoint.replace(context).await
}

pub(super) async fn delete<L, F>(
    State(endpoint): Endpoint<L, F>,
    Path(id): Path<String>,
) -> ScimResult<ScimResponse>
where
    L: ManagerLocator + Send + Sync + 'static,
    L::Manager: Send + Sync + 'static,
    F: ResourceManagerFactory<L::Manager> + Send + Sync + 'static,
    F::Delegate: Send + 'static,
{
    endpoint.delete(RequestContext::for_resource(id)).await
}
