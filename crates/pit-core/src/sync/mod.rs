//! SyncEngine for coordinating a collection with its remote store
//!
//! This module provides:
//! - **engine**: the `init`, `status`, `add`, `push` and `clone` operations
//! - **report**: the per-document results those operations return

mod engine;
mod report;

pub use engine::{EngineConfig, SyncEngine};
pub use report::{
    AddReport, CloneReport, DigestMismatch, DocumentState, DocumentStatus, PushItem, PushOutcome,
    PushReport, StatusReport,
};
