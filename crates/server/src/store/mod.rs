//! Content storage module
//!
//! Provides durable single-document JSON storage for the content bundle.

pub mod json_store;

pub use json_store::{ContentStore, StoreError};
