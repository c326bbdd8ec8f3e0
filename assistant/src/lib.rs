//! # Assistant
//!
//! Ties the retrieval session to a chat provider:
//!
//! - **ask**: retrieve the top segments for a question, hand them to the
//!   model as labelled context and return the answer with citations
//! - **study tools**: summary, key insights, mind map, quiz, flashcards,
//!   table of contents and audio script, generated from the leading
//!   segments of the pool; the audio script can be spoken through a
//!   [`docqa_llm::SpeechProvider`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! use docqa_assistant::{AssistantConfig, DocumentAssistant};
//! use docqa_llm::OpenAiCompatProvider;
//!
//! let config = AssistantConfig::default();
//! let provider = OpenAiCompatProvider::from_config(&config.llm)?;
//! let assistant = DocumentAssistant::new(config, provider)?;
//!
//! assistant.add_file(Path::new("handbook.docx")).await?;
//! let answer = assistant.ask("How many vacation days do I get?").await?;
//! println!("{}\nSources: {}", answer.answer, answer.sources.join(", "));
//! ```

pub mod assistant;
pub mod config;
pub mod error;
pub mod json;
pub mod prompt;
pub mod study;

#[cfg(test)]
mod test_support;

pub use assistant::{AddedDocument, Answer, Citation, DocumentAssistant, NO_RELEVANT_INFORMATION};
pub use config::AssistantConfig;
pub use error::{AssistantError, Result};
pub use json::extract_json_array;
pub use study::{
    AudioOverview, DEFAULT_FLASHCARDS, DEFAULT_QUIZ_QUESTIONS, Flashcard, QuizQuestion, StudyTool,
};
