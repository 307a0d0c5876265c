//! Core systems for mirror-view.
//!
//! This crate provides the pieces the tree view is built on:
//!
//! - **Signal/Slot System**: Type-safe notification from models to views,
//!   with direct and queued connections
//! - **Callback Guard**: Failure isolation for host-supplied controller code
//! - **Logging**: `tracing` target and span names per subsystem
//!
//! # Signal/Slot Example
//!
//! ```
//! use mirror_view_core::Signal;
//!
//! let value_changed = Signal::<i32>::new();
//!
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! value_changed.emit(42);
//! value_changed.disconnect(conn_id);
//! ```

pub mod guard;
pub mod logging;
pub mod signal;

pub use guard::{CallbackError, CallbackResult, guarded};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
