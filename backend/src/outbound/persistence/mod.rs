//! Persistence adapters.
//!
//! The storage engine behind the ports is swappable; this build ships the
//! in-memory transactional store.

mod memory;

pub use memory::MemoryStore;
