//! Caller-facing method surface for VaultGate.
//!
//! The host bridge (the layer the wallet UI talks to) dispatches plugin
//! calls by method name with JSON parameters. This crate maps those calls
//! onto the gate, the dispatcher, and the preference store, validating
//! required parameters before any storage or auth interaction happens.

pub mod bridge;
pub mod error;
pub mod handlers;
pub mod methods;

pub use bridge::SecurityBridge;
pub use error::{GatewayError, Result};
pub use handlers::HandlerContext;
pub use methods::{MethodHandler, MethodRegistry};
