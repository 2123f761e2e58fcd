//! Task store layer.
//!
//! # Responsibility
//! - Own the canonical in-memory task collection.
//! - Guarantee task invariants on every mutation.
//! - Flush each mutation durably through the persistence adapter.
//!
//! # Invariants
//! - The collection has exactly one writer; readers observe borrowed slices.
//! - Every successful mutation is persisted before the call returns.

pub mod task_store;
