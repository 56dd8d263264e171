//! Generation back-ends for the history examiner.
//!
//! - [`OpenAiCompatProvider`] implements `ChatProvider` against any
//!   OpenAI-compatible `/chat/completions` endpoint (Groq by default).
//! - [`HfInferenceProvider`] implements `TextGenerationProvider` against the
//!   Hugging Face inference API.
//! - [`Dispatcher`] tries the chat back-end first and falls back to text
//!   generation, translating one prompt into each wire shape.

pub mod dispatcher;
pub mod hf_inference;
pub mod openai_compat;

pub use dispatcher::{Dispatcher, OFFLINE_MESSAGE, PrimaryStage, SecondaryStage};
pub use hf_inference::HfInferenceProvider;
pub use openai_compat::OpenAiCompatProvider;
