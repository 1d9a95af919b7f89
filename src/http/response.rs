//! Conversion of delegate responses and errors into HTTP responses.

use crate::error::ScimError;
use crate::protocol::ScimResponse;
use crate::protocol::constants::SCIM_MEDIA_TYPE;
use axum::body::Body;
use axum::http::{HeaderName, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use log::{error, warn};

impl IntoResponse for ScimResponse {
    fn into_response(self) -> Response {
        let Ok(status) = StatusCode::from_u16(self.status) else {
            error!("Resource manager returned invalid status {}", self.status);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        };

        let mut response = match self.body {
            Some(body) => Response::new(Body::from(body)),
            None => Response::new(Body::empty()),
        };
        *response.status_mut() = status;

        let headers = response.headers_mut();
        for (name, value) in &self.headers {
            match (
                HeaderName::try_from(name.as_str()),
                HeaderValue::try_from(value.as_str()),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.append(name, value);
                }
                _ => warn!("Dropping invalid response header '{}'", name),
            }
        }
        if !headers.contains_key(header::CONTENT_TYPE) && status != StatusCode::NO_CONTENT {
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static(SCIM_MEDIA_TYPE),
            );
        }
        response
    }
}

impl IntoResponse for ScimError {
    fn into_response(self) -> Response {
        self.to_response().into_response()
    }
}
