use crate::ids::CorrelationId;
use thiserror::Error;

/// Failures that abort processing of a single request.
///
/// Unknown methods and unbound delegates are not errors: the router resolves
/// them into a well-formed [`ApiResponse`](crate::ApiResponse).
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected {expected}, found {found}")]
    InvalidValue {
        expected: &'static str,
        found: &'static str,
    },

    #[error("{0} must be encoded as a JSON object")]
    InvalidBean(&'static str),

    #[error("{bean}.{field}: {source}")]
    InvalidField {
        bean: &'static str,
        field: &'static str,
        #[source]
        source: Box<BridgeError>,
    },

    #[error("{method}: missing parameter #{index} ({name})")]
    MissingParameter {
        method: &'static str,
        index: usize,
        name: &'static str,
    },

    #[error("{method}: parameter #{index}: {source}")]
    InvalidParameter {
        method: &'static str,
        index: usize,
        #[source]
        source: Box<BridgeError>,
    },

    #[error("{method} is asynchronous but the request carries no asyncId")]
    MissingCorrelationId { method: &'static str },

    #[error("{0} is already awaiting delivery")]
    DuplicateCorrelationId(CorrelationId),

    #[error("no bridge registered for '{0}'")]
    UnknownBridge(String),
}

impl BridgeError {
    /// HTTP-style status a transport should report for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            BridgeError::UnknownBridge(_) => 404,
            BridgeError::DuplicateCorrelationId(_) => 409,
            _ => 400,
        }
    }

    pub(crate) fn in_field(self, bean: &'static str, field: &'static str) -> Self {
        BridgeError::InvalidField {
            bean,
            field,
            source: Box::new(self),
        }
    }

    pub(crate) fn in_parameter(self, method: &'static str, index: usize) -> Self {
        BridgeError::InvalidParameter {
            method,
            index,
            source: Box::new(self),
        }
    }
}

pub type Result<T, E = BridgeError> = std::result::Result<T, E>;
