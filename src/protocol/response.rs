//! Response envelope returned by resource managers.

/// Protocol-level response produced by a delegate resource manager.
///
/// The adapter treats this as opaque: the status is never remapped, headers are
/// forwarded in the order the delegate added them, and the body is passed through
/// byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScimResponse {
    /// HTTP status code chosen by the delegate
    pub status: u16,
    /// Response headers in delegate order
    pub headers: Vec<(String, String)>,
    /// Serialized body, if any
    pub body: Option<String>,
}

impl ScimResponse {
    /// Create a response with no headers and no body.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Look up a header value, ignoring the case of the name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
