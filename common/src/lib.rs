//! Common types for the minivm sandbox.
//!
//! This crate holds everything the runtime and the built-in contracts share:
//! addresses, the call/return surface, events, the error taxonomy and the
//! transactional storage overlay.

pub mod address;
pub mod call;
pub mod error;
pub mod event;
pub mod storage;

pub use address::Address;
pub use call::{Call, Value};
pub use error::VmError;
pub use event::{Event, EventRecord};
pub use storage::{SlotKey, SlotValue, StateOverlay, Storage};
