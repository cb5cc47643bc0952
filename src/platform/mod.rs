//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Timers (deadline tasks polled with caller-supplied time)
//! - Input events
//! - Storage (LocalStorage on web)

pub mod input;
pub mod storage;
pub mod timer;

pub use input::{InputState, pointer_from_client};
pub use storage::{MemoryStorage, Storage};
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
pub use timer::{Interval, Timeout};
