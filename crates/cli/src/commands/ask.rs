//! `examiner ask` — Run the answer pipeline once from the terminal.

use examiner_config::AppConfig;
use examiner_context::SelectionLimits;
use examiner_gateway::AnswerService;
use examiner_providers::Dispatcher;
use std::sync::Arc;

pub async fn run(
    config: &AppConfig,
    query: &str,
    marks: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = examiner_context::store::load(&config.knowledge.path)?;
    let dispatcher = Dispatcher::from_config(&config.providers)?;

    let service = AnswerService::new(
        Arc::new(store),
        SelectionLimits::from(&config.selection),
        Arc::new(dispatcher),
    );

    let answer = service.answer(query, marks).await;

    println!("[{} marks]\n", answer.marks);
    println!("{}", answer.answer);

    Ok(())
}
