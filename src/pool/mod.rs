//! Allocation-free containers backing the particle system.
//!
//! - [`Pool`]: fixed-capacity free-list allocator over pre-built instances
//! - [`IndexedSet`]: unordered collection with O(1) add/remove

#[allow(clippy::module_inception)]
pub mod pool;
pub mod indexed_set;

pub use indexed_set::{IndexedSet, SetKey};
pub use pool::{Pool, PoolHandle, Poolable};
