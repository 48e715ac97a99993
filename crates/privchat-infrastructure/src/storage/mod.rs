//! Storage layer: atomic file operations and session store backends.

mod atomic_json;
mod durable_store;
mod volatile_store;

pub use atomic_json::{AtomicJsonError, AtomicJsonFile};
pub use durable_store::DurableStore;
pub use volatile_store::VolatileStore;
