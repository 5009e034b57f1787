//! Capability bridges served to the web view.
//!
//! Each module declares the beans and enums of one capability, the delegate
//! trait a platform implements, and the method table its router dispatches
//! on.

pub mod contact;
pub mod database;
pub mod filesystem;
pub mod lifecycle;
pub mod os;
pub mod security;

pub use contact::{ContactBridge, ContactDelegate};
pub use database::{DatabaseBridge, DatabaseDelegate};
pub use filesystem::{FileSystemBridge, FileSystemDelegate};
pub use lifecycle::{LifecycleBridge, LifecycleDelegate};
pub use os::{OsBridge, OsDelegate};
pub use security::{SecurityBridge, SecurityDelegate};
