//! Grounded question answering over a retrieval session.

use std::path::Path;

use docqa_documents::load_document;
use docqa_llm::{ChatMessage, ChatProvider, ChatRequest};
use docqa_retrieval::{DocumentRecord, PoolStats, RetrievalSession, ScoredSegment};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::AssistantConfig;
use crate::error::{AssistantError, Result};
use crate::prompt::{ANSWER_SYSTEM_PROMPT, answer_prompt, retrieval_context};

/// Reply used when no segment matches the question.
pub const NO_RELEVANT_INFORMATION: &str = "I couldn't find relevant information in the documents.";

/// A segment the answer was grounded on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Citation {
    pub index: usize,
    pub source_document: String,
    pub score: f32,
    pub start_offset: usize,
    pub end_offset: usize,
}

impl From<&ScoredSegment> for Citation {
    fn from(hit: &ScoredSegment) -> Self {
        Self {
            index: hit.segment.index,
            source_document: hit.segment.source_document.clone(),
            score: hit.score,
            start_offset: hit.segment.start_offset,
            end_offset: hit.segment.end_offset,
        }
    }
}

/// An answer with the documents and segments behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub answer: String,

    /// Documents cited, unique, in first-seen order.
    pub sources: Vec<String>,

    pub citations: Vec<Citation>,
}

impl Answer {
    fn not_found() -> Self {
        Self {
            answer: NO_RELEVANT_INFORMATION.to_string(),
            sources: Vec::new(),
            citations: Vec::new(),
        }
    }
}

/// Result of loading a file into the assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddedDocument {
    pub name: String,
    pub segments: usize,
    pub metadata: String,
}

/// Document assistant: a retrieval session plus a chat provider.
pub struct DocumentAssistant<P> {
    pub(crate) config: AssistantConfig,
    pub(crate) session: RetrievalSession,
    pub(crate) provider: P,
}

impl<P: ChatProvider> DocumentAssistant<P> {
    /// Create an assistant with an empty session.
    pub fn new(config: AssistantConfig, provider: P) -> Result<Self> {
        config.validate()?;
        let session = RetrievalSession::new(config.retrieval.clone())?;
        Ok(Self {
            config,
            session,
            provider,
        })
    }

    /// The underlying retrieval session.
    pub fn session(&self) -> &RetrievalSession {
        &self.session
    }

    /// The chat provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// The assistant configuration.
    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    /// Load a `.txt`, `.md` or `.docx` file and add it to the session.
    pub async fn add_file(&self, path: &Path) -> Result<AddedDocument> {
        let document = load_document(path)?;
        let segments = self
            .session
            .add_document(&document.text, &document.name)
            .await?;
        Ok(AddedDocument {
            name: document.name,
            segments,
            metadata: document.metadata,
        })
    }

    /// Add raw text under `name`. Returns the number of segments created.
    pub async fn add_text(&self, text: &str, name: &str) -> Result<usize> {
        Ok(self.session.add_document(text, name).await?)
    }

    /// Drop every loaded document.
    pub async fn clear(&self) {
        self.session.clear().await;
    }

    pub async fn stats(&self) -> PoolStats {
        self.session.stats().await
    }

    pub async fn documents(&self) -> Vec<DocumentRecord> {
        self.session.documents().await
    }

    /// Answer `question` from the configured number of top segments.
    pub async fn ask(&self, question: &str) -> Result<Answer> {
        self.ask_with_top_k(question, self.config.retrieval.top_k)
            .await
    }

    /// Answer `question` from at most `top_k` segments.
    ///
    /// When nothing matches, a fixed reply is returned and the model is not
    /// called.
    pub async fn ask_with_top_k(&self, question: &str, top_k: usize) -> Result<Answer> {
        let hits = self.session.retrieve(question, top_k).await?;
        if hits.is_empty() {
            debug!("No segments matched; skipping the model call");
            return Ok(Answer::not_found());
        }

        let context = retrieval_context(&hits, self.config.max_context_chars);
        if context.included == 0 {
            return Err(AssistantError::Config(format!(
                "max_context_chars ({}) cannot hold a single labelled segment",
                self.config.max_context_chars
            )));
        }
        let used = &hits[..context.included];

        let request = ChatRequest::new(vec![
            ChatMessage::system(ANSWER_SYSTEM_PROMPT),
            ChatMessage::user(answer_prompt(question, &context.text)),
        ]);
        let response = self.provider.complete(request).await?;
        info!(
            "Answered from {} segments using {}",
            used.len(),
            self.provider.name()
        );

        let mut sources: Vec<String> = Vec::new();
        for hit in used {
            if !sources.contains(&hit.segment.source_document) {
                sources.push(hit.segment.source_document.clone());
            }
        }

        Ok(Answer {
            answer: response.content,
            sources,
            citations: used.iter().map(Citation::from).collect(),
        })
    }
}
