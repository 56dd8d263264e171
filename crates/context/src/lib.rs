//! Retrieval and prompt assembly for the history examiner.
//!
//! Pipeline per question:
//!
//! 1. [`selector`] scans the read-only [`KnowledgeStore`] and assembles a
//!    bounded context block.
//! 2. [`prompt`] wraps that block in the examiner protocol and frames the
//!    user's question with its mark target.
//!
//! Both steps are pure functions over borrowed data and safe to call from
//! any number of concurrent requests. [`store`] handles reading (and, for
//! offline tooling, rewriting) the knowledge file.
//!
//! [`KnowledgeStore`]: examiner_core::KnowledgeStore

pub mod prompt;
pub mod selector;
pub mod store;

pub use prompt::build_prompt;
pub use selector::{ContextSelector, SelectionLimits, select_context};
