//! `examiner context` — Show what retrieval selects for a question.

use examiner_config::AppConfig;
use examiner_context::{ContextSelector, SelectionLimits};

pub fn run(config: &AppConfig, query: &str) -> Result<(), Box<dyn std::error::Error>> {
    let store = examiner_context::store::load(&config.knowledge.path)?;
    let context =
        ContextSelector::new(&store, SelectionLimits::from(&config.selection)).select(query);

    if context.is_empty() {
        println!("(no matching context for this question)");
    } else {
        println!("{context}");
    }

    Ok(())
}
