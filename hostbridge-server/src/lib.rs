//! Serves hostbridge capabilities to a web view.
//!
//! Requests arrive as `ApiRequest` envelopes posted to `/api/{interface}`.
//! Asynchronous results are pushed to the web view as script calls over the
//! `/events` WebSocket.

pub mod bridges;
pub mod config;
pub mod desktop;
pub mod events;
pub mod logging;
pub mod server;
pub mod sink;

pub use bridges::{BridgeInfo, BridgeRegistry};
pub use config::{ConfigError, ServerConfig};
pub use desktop::{DesktopFileSystem, DesktopOs};
pub use logging::{init_console_logging, init_logging, init_test_logging};
pub use server::{Server, StandardBridges};
pub use sink::BroadcastSink;
