// Macros first so every later module can use them
#[macro_use]
mod macros;

pub mod bean;
pub mod callback;
pub mod delegate;
pub mod enums;
pub mod envelope;
pub mod error;
pub mod group;
pub mod ids;
pub mod registry;
pub mod router;
pub mod script;

pub use bean::{Bean, WireValue};
pub use callback::{Callback, CallbackShape, Correlator, Listener, Outcome};
pub use delegate::DelegateSlot;
pub use enums::WireEnum;
pub use envelope::{ApiRequest, ApiResponse, API_VERSION, DEFAULT_NAMESPACE};
pub use error::{BridgeError, Result};
pub use group::ApiGroup;
pub use ids::CorrelationId;
pub use registry::{CorrelationRegistry, EntryKind, PendingEntry, RegistryStats};
pub use router::{
    encode, ApiBridge, Call, CallMode, Capability, MethodDescriptor, Param, Returns, Router,
};
pub use script::{RecordingSink, ScriptValue, WebSink, WebSinkAdapter};

// Used by the expansion of `bean!` and `wire_enum!` in downstream crates.
#[doc(hidden)]
pub use serde_json;
