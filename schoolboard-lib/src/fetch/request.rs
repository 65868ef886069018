//! Request description for a fetch lifecycle.

use crate::client::{ApiRequest, Method, RequestOptions};

/// What a fetch lifecycle sends on each trigger.
///
/// `method` falls back to the lifecycle's configured default (`POST`).
#[derive(Debug, Clone, Default)]
pub struct FetchRequest {
    pub method: Option<Method>,
    pub path: String,
    pub payload: Option<serde_json::Value>,
    pub options: RequestOptions,
}

impl FetchRequest {
    /// Creates a request for `path` with the default method.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Sets the HTTP method.
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the JSON payload.
    pub fn payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Sets extra request options.
    pub fn options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolves into a client request.
    ///
    /// Without a payload, methods that carry a body send an empty JSON
    /// object and `GET`/`HEAD` send nothing.
    pub(crate) fn to_api_request(&self, default_method: &Method) -> ApiRequest {
        let method = self.method.clone().unwrap_or_else(|| default_method.clone());
        let body = match &self.payload {
            Some(payload) => Some(payload.clone()),
            None if method == Method::GET || method == Method::HEAD => None,
            None => Some(serde_json::Value::Object(Default::default())),
        };
        ApiRequest {
            method,
            path: self.path.clone(),
            body,
            options: self.options.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_method_and_empty_body() {
        let request = FetchRequest::new("school/1").to_api_request(&Method::POST);
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.body, Some(serde_json::json!({})));
    }

    #[test]
    fn test_explicit_method_wins() {
        let request = FetchRequest::new("school/1")
            .method(Method::GET)
            .payload(serde_json::json!({"id": "1"}))
            .to_api_request(&Method::POST);
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.body, Some(serde_json::json!({"id": "1"})));
    }

    #[test]
    fn test_get_without_payload_has_no_body() {
        let request = FetchRequest::new("school").to_api_request(&Method::GET);
        assert!(request.body.is_none());
    }
}
