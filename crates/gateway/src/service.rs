//! The answer pipeline: select context, build the prompt, dispatch.

use examiner_context::{ContextSelector, SelectionLimits, build_prompt};
use examiner_core::knowledge::KnowledgeStore;
use examiner_providers::Dispatcher;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Mark value used when the caller does not give one.
pub const DEFAULT_MARKS: i64 = 4;

/// The generated answer, echoed with the requested mark value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,
    pub marks: i64,
}

/// Read-only after construction; shared across concurrent requests.
pub struct AnswerService {
    store: Arc<KnowledgeStore>,
    limits: SelectionLimits,
    dispatcher: Arc<Dispatcher>,
}

impl AnswerService {
    pub fn new(
        store: Arc<KnowledgeStore>,
        limits: SelectionLimits,
        dispatcher: Arc<Dispatcher>,
    ) -> Self {
        Self {
            store,
            limits,
            dispatcher,
        }
    }

    /// Context block the selector would produce for `query`.
    pub fn context_for(&self, query: &str) -> String {
        ContextSelector::new(&self.store, self.limits).select(query)
    }

    /// Run the full pipeline. Generation failures come back as answer text.
    pub async fn answer(&self, query: &str, marks: i64) -> Answer {
        let context = self.context_for(query);
        debug!(context_len = context.len(), marks, "Context selected");

        let prompt = build_prompt(query, marks, &context);
        let answer = self.dispatcher.generate(&prompt).await;

        Answer { answer, marks }
    }
}
