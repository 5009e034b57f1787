use crate::bean::{to_json, WireValue};
use crate::ids::CorrelationId;
use serde::{Deserialize, Serialize};

/// API version reported by bridges and quoted in unknown-method responses.
pub const API_VERSION: &str = "v2.2.15";

/// Global object on the web side that owns the `handle*` entry points.
pub const DEFAULT_NAMESPACE: &str = "Adaptive";

/// One call from the web view into a bridge.
///
/// Every parameter is a standalone JSON fragment; its position matches the
/// method signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRequest {
    pub method_name: String,
    #[serde(default)]
    pub parameters: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub async_id: Option<CorrelationId>,
}

impl ApiRequest {
    pub fn new(method_name: impl Into<String>) -> Self {
        ApiRequest {
            method_name: method_name.into(),
            parameters: Vec::new(),
            async_id: None,
        }
    }

    /// Append a parameter that is already JSON encoded.
    pub fn with_param(mut self, fragment: impl Into<String>) -> Self {
        self.parameters.push(fragment.into());
        self
    }

    /// Append a parameter, encoding it first.
    pub fn with_value<T: WireValue>(mut self, value: &T) -> Self {
        self.parameters.push(to_json(value));
        self
    }

    pub fn with_async_id(mut self, id: impl Into<CorrelationId>) -> Self {
        self.async_id = Some(id.into());
        self
    }
}

/// Synchronous answer to an [`ApiRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: i32,
    pub status_message: String,
    /// JSON fragment, or the literal `null`.
    pub response: String,
}

impl ApiResponse {
    pub fn ok(response: impl Into<String>) -> Self {
        ApiResponse {
            status_code: 200,
            status_message: "OK".to_string(),
            response: response.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::error(404, message)
    }

    pub fn error(status_code: i32, message: impl Into<String>) -> Self {
        ApiResponse {
            status_code,
            status_message: message.into(),
            response: "null".to_string(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status_code == 200
    }
}
