//! Common test utilities for endpoint testing.
//!
//! Provides a recording delegate that captures exactly what the endpoint forwards,
//! locators for success and failure paths, RFC 7643 style fixtures, and a helper to
//! serve a router on an ephemeral port.

#![allow(dead_code)]

pub mod fixtures;

use scim_endpoint::manager::{ManagerLocator, ResourceManager};
use scim_endpoint::{QueryParams, ScimError, ScimResponse, ScimResult};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// A delegate call as observed by [`RecordingManager`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Get {
        id: String,
        attributes: Option<String>,
        excluded_attributes: Option<String>,
    },
    Create {
        body: String,
        attributes: Option<String>,
        excluded_attributes: Option<String>,
    },
    Delete {
        id: String,
    },
    Replace {
        id: String,
        body: String,
        attributes: Option<String>,
        excluded_attributes: Option<String>,
    },
    ListByFilter(QueryParams),
    ListBySearchBody(String),
}

/// What the recording delegate does once it has recorded a call.
#[derive(Debug, Clone)]
pub enum Outcome {
    Respond(ScimResponse),
    Fail { status: u16, detail: String },
}

/// Shared recorder for calls and delegate constructions.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<Call>>>,
    constructed: Arc<AtomicUsize>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn constructed(&self) -> usize {
        self.constructed.load(Ordering::SeqCst)
    }

    /// Factory closure producing a fresh [`RecordingManager`] per call.
    pub fn factory(&self, outcome: Outcome) -> impl Fn() -> RecordingManager + Send + Sync + use<> {
        let recorder = self.clone();
        move || {
            recorder.constructed.fetch_add(1, Ordering::SeqCst);
            RecordingManager {
                recorder: recorder.clone(),
                outcome: outcome.clone(),
            }
        }
    }
}

/// Delegate that records every call and answers with a scripted outcome.
pub struct RecordingManager {
    recorder: Recorder,
    outcome: Outcome,
}

impl RecordingManager {
    fn record(&self, call: Call) -> ScimResult<ScimResponse> {
        self.recorder.calls.lock().unwrap().push(call);
        match &self.outcome {
            Outcome::Respond(response) => Ok(response.clone()),
            Outcome::Fail { status, detail } => Err(ScimError::protocol_with_source(
                *status,
                detail.clone(),
                std::io::Error::other("delegate cause"),
            )),
        }
    }
}

impl<U: Sync> ResourceManager<U> for RecordingManager {
    async fn get(
        &self,
        id: &str,
        _user_manager: &U,
        attributes: Option<&str>,
        excluded_attributes: Option<&str>,
    ) -> ScimResult<ScimResponse> {
        self.record(Call::Get {
            id: id.to_string(),
            attributes: attributes.map(str::to_string),
            excluded_attributes: excluded_attributes.map(str::to_string),
        })
    }

    async fn create(
        &self,
        body: &str,
        _user_manager: &U,
        attributes: Option<&str>,
        excluded_attributes: Option<&str>,
    ) -> ScimResult<ScimResponse> {
        self.record(Call::Create {
            body: body.to_string(),
            attributes: attributes.map(str::to_string),
            excluded_attributes: excluded_attributes.map(str::to_string),
        })
    }

    async fn delete(&self, id: &str, _user_manager: &U) -> ScimResult<ScimResponse> {
        self.record(Call::Delete { id: id.to_string() })
    }

    async fn replace(
        &self,
        id: &str,
        body: &str,
        _user_manager: &U,
        attributes: Option<&str>,
        excluded_attributes: Option<&str>,
    ) -> ScimResult<ScimResponse> {
        self.record(Call::Replace {
            id: id.to_string(),
            body: body.to_string(),
            attributes: attributes.map(str::to_string),
            excluded_attributes: excluded_attributes.map(str::to_string),
        })
    }

    async fn list_by_filter(&self, _user_manager: &U, params: &QueryParams) -> ScimResult<ScimResponse> {
        self.record(Call::ListByFilter(params.clone()))
    }

    async fn list_by_search_body(&self, body: &str, _user_manager: &U) -> ScimResult<ScimResponse> {
        self.record(Call::ListBySearchBody(body.to_string()))
    }
}

/// Locator whose user store is unavailable.
pub struct UnavailableLocator;

impl ManagerLocator for UnavailableLocator {
    type Manager = ();

    fn user_manager(&self) -> ScimResult<Arc<()>> {
        Err(ScimError::internal("user store unavailable"))
    }
}

/// Serve `router` on an ephemeral local port. The server lives until the handle is
/// dropped or the test runtime shuts down.
pub async fn spawn(router: axum::Router) -> (SocketAddr, tokio::task::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (addr, handle)
}
