//! # Examiner Core
//!
//! Domain types, traits, and error definitions for the history examiner.
//! This crate has **zero framework dependencies** — it defines the domain model
//! that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The knowledge corpus is a typed, read-only document. Generation back-ends
//! are traits here; implementations live in `examiner-providers`. This enables:
//! - Swapping back-ends via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod knowledge;
pub mod message;
pub mod provider;

// Re-export key types at crate root for ergonomics
pub use error::{KnowledgeError, ProviderError};
pub use knowledge::{
    ExtraFields, KnowledgeStore, MarkScheme, MarkSchemeEntry, OrderedMap, PaperRef, PastPapers,
    QaPair, StoreStats, SyllabusItem, TopicRecord, merge_past_papers, paper_entries,
};
pub use message::{Message, Prompt, Role};
pub use provider::{
    ChatProvider, ChatRequest, ChatResponse, TextGenerationProvider, TextGenerationRequest,
};
