use serde::{Deserialize, Serialize};
use std::fmt;

/// Caller-assigned id of one outstanding asynchronous call or listener.
///
/// The web side allocates these; the native side only echoes them back in the
/// script call that delivers the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(i64);

impl CorrelationId {
    pub fn new(value: i64) -> Self {
        CorrelationId(value)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CorrelationId({})", self.0)
    }
}

impl From<i64> for CorrelationId {
    fn from(value: i64) -> Self {
        CorrelationId::new(value)
    }
}
