//! Prompt construction.
//!
//! The examiner protocol is static text with one substitution point, the
//! context block. Length and structure per mark value are stated to the model
//! as instructions only; nothing checks the generated answer against them.

use examiner_core::Prompt;

const EXAMINER_PROTOCOL: &str = "
You are the Cambridge History Examiner Simulation Engine (Syllabus 2059/01).
Strictly follow the 10-step protocol:
1. Detect Command Word/Topic.
2. Enforce Length: 4m(110-150w), 7m(220-260w), 14m(450-550w).
3. If personality mentioned, start with Bio details.
4. Structure: 4m(2 PEEL), 7m(3 PEEL), 14m(Intro, Agree, Disagree, Judgement).
5. Use Nigel Kelly evidence exclusively from context.
6. Append [EXAMINER AUDIT] footer with predictive mark and reasoning.
7. Student Answer Analysis when appropriate.
8. Depth Analysis for evaluation questions.
9. Tone: Clinical, formal examiner.
10. Failsafe: Default to 4m logic.

CONTEXT:
";

/// Combine the protocol, the selected context and the question.
pub fn build_prompt(query: &str, marks: i64, context: &str) -> Prompt {
    Prompt {
        system: format!("{EXAMINER_PROTOCOL}{context}\n"),
        user: format!("Answer for {marks} marks: {query}"),
    }
}
