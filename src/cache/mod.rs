//! Cache module for memoizing search results in memory
//!
//! This module provides a TTL-bounded store keyed by (operation, argument)
//! pairs. Entries are serialized snapshots; reads return fresh
//! deserializations so no caller can mutate another caller's result.

mod store;

pub use store::{CacheStore, Clock, SystemClock};
