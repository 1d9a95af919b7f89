//! Collaborator contracts consumed by the endpoint adapter.
//!
//! The adapter depends on three capabilities, all injected:
//!
//! - [`ManagerLocator`] - supplies the identity store (user manager) for a call
//! - [`ResourceManagerFactory`] - builds a fresh delegate for every call
//! - [`ResourceManager`] - the delegate that implements the protocol semantics
//!
//! An in-memory store and a Group resource manager are provided for running the
//! endpoint without an external identity backend.

mod group;
mod in_memory;

pub use group::GroupResourceManager;
pub use in_memory::InMemoryUserManager;

use crate::error::ScimResult;
use crate::protocol::ScimResponse;
use crate::request::QueryParams;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

/// Supplies the user manager handed to each delegate call.
pub trait ManagerLocator {
    type Manager;

    fn user_manager(&self) -> ScimResult<Arc<Self::Manager>>;
}

/// Locator over a single shared user manager instance.
#[derive(Debug)]
pub struct SharedManager<U> {
    manager: Arc<U>,
}

impl<U> SharedManager<U> {
    pub fn new(manager: U) -> Self {
        Self {
            manager: Arc::new(manager),
        }
    }
}

impl<U> Clone for SharedManager<U> {
    fn clone(&self) -> Self {
        Self {
            manager: Arc::clone(&self.manager),
        }
    }
}

impl<U> ManagerLocator for SharedManager<U> {
    type Manager = U;

    fn user_manager(&self) -> ScimResult<Arc<U>> {
        Ok(Arc::clone(&self.manager))
    }
}

/// Builds the delegate resource manager used for a single call.
pub trait ResourceManagerFactory<U> {
    type Delegate: ResourceManager<U>;

    fn new_manager(&self) -> Self::Delegate;
}

impl<U, D, F> ResourceManagerFactory<U> for F
where
    F: Fn() -> D,
    D: ResourceManager<U>,
{
    type Delegate = D;

    fn new_manager(&self) -> D {
        self()
    }
}

/// Delegate resource manager implementing the SCIM semantics for one resource type.
///
/// Every operation returns the full response envelope. Implementations usually encode
/// protocol failures (unknown id, bad filter) as error responses; returning `Err`
/// is reserved for failures the delegate cannot express as a response, and the
/// adapter propagates those unchanged.
pub trait ResourceManager<U> {
    /// Fetch a resource by id
    fn get(
        &self,
        id: &str,
        user_manager: &U,
        attributes: Option<&str>,
        excluded_attributes: Option<&str>,
    ) -> impl Future<Output = ScimResult<ScimResponse>> + Send;

    /// Create a resource from its serialized representation
    fn create(
        &self,
        body: &str,
        user_manager: &U,
        attributes: Option<&str>,
        excluded_attributes: Option<&str>,
    ) -> impl Future<Output = ScimResult<ScimResponse>> + Send;

    /// Delete a resource by id
    fn delete(
        &self,
        id: &str,
        user_manager: &U,
    ) -> impl Future<Output = ScimResult<ScimResponse>> + Send;

    /// Replace a resource with a full representation
    fn replace(
        &self,
        id: &str,
        body: &str,
        user_manager: &U,
        attributes: Option<&str>,
        excluded_attributes: Option<&str>,
    ) -> impl Future<Output = ScimResult<ScimResponse>> + Send;

    /// List resources from query parameters
    fn list_by_filter(
        &self,
        user_manager: &U,
        params: &QueryParams,
    ) -> impl Future<Output = ScimResult<ScimResponse>> + Send;

    /// List resources from a serialized search request
    fn list_by_search_body(
        &self,
        body: &str,
        user_manager: &U,
    ) -> impl Future<Output = ScimResult<ScimResponse>> + Send;
}

/// Identity store used by [`GroupResourceManager`].
pub trait UserManager {
    /// Persist a new group; the group already carries its id.
    ///
    /// Fails with a uniqueness error when the id or the `displayName` is already
    /// taken. The check and the insert must be atomic.
    fn create_group(&self, group: Value) -> impl Future<Output = ScimResult<Value>> + Send;

    fn get_group(&self, id: &str) -> impl Future<Output = ScimResult<Option<Value>>> + Send;

    /// Replace a stored group, returning `None` if the id is unknown.
    ///
    /// Fails with a uniqueness error when another group holds the new `displayName`.
    fn update_group(
        &self,
        id: &str,
        group: Value,
    ) -> impl Future<Output = ScimResult<Option<Value>>> + Send;

    /// Remove a group, returning whether it existed
    fn delete_group(&self, id: &str) -> impl Future<Output = ScimResult<bool>> + Send;

    /// All stored groups in creation order
    fn list_groups(&self) -> impl Future<Output = ScimResult<Vec<Value>>> + Send;
}
