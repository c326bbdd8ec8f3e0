//! Study tools: material generated from the leading segments of the pool.

use std::fmt;
use std::str::FromStr;

use docqa_llm::{ChatProvider, ChatRequest, SpeechProvider};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::assistant::DocumentAssistant;
use crate::error::{AssistantError, Result};
use crate::json::extract_json_array;
use crate::prompt::{self, document_context};

/// Attempts made for the quiz before giving up on malformed output.
pub const QUIZ_ATTEMPTS: usize = 2;

/// Default number of quiz questions.
pub const DEFAULT_QUIZ_QUESTIONS: usize = 5;

/// Default number of flashcards.
pub const DEFAULT_FLASHCARDS: usize = 10;

/// The available study tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyTool {
    Summary,
    KeyInsights,
    MindMap,
    Quiz,
    Flashcards,
    TableOfContents,
    AudioScript,
}

impl StudyTool {
    pub const ALL: [StudyTool; 7] = [
        StudyTool::Summary,
        StudyTool::KeyInsights,
        StudyTool::MindMap,
        StudyTool::Quiz,
        StudyTool::Flashcards,
        StudyTool::TableOfContents,
        StudyTool::AudioScript,
    ];

    /// How many leading pool segments form the tool's context.
    pub fn context_segments(self) -> usize {
        match self {
            StudyTool::Summary | StudyTool::AudioScript => 5,
            StudyTool::TableOfContents => 6,
            StudyTool::Flashcards => 8,
            StudyTool::KeyInsights | StudyTool::MindMap | StudyTool::Quiz => 10,
        }
    }

    pub fn temperature(self) -> f32 {
        match self {
            StudyTool::Quiz => 0.5,
            _ => 0.7,
        }
    }

    pub fn max_tokens(self) -> u32 {
        match self {
            StudyTool::TableOfContents => 300,
            StudyTool::Summary => 400,
            StudyTool::KeyInsights => 500,
            StudyTool::AudioScript => 600,
            StudyTool::MindMap => 800,
            StudyTool::Quiz | StudyTool::Flashcards => 1500,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StudyTool::Summary => "summary",
            StudyTool::KeyInsights => "key_insights",
            StudyTool::MindMap => "mind_map",
            StudyTool::Quiz => "quiz",
            StudyTool::Flashcards => "flashcards",
            StudyTool::TableOfContents => "table_of_contents",
            StudyTool::AudioScript => "audio_script",
        }
    }
}

impl fmt::Display for StudyTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StudyTool {
    type Err = AssistantError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        StudyTool::ALL
            .into_iter()
            .find(|tool| tool.as_str() == normalized)
            .ok_or_else(|| AssistantError::InvalidInput(format!("unknown study tool: {s}")))
    }
}

/// One multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

/// One question/answer card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub question: String,
    pub answer: String,
}

/// An audio script and its synthesized speech.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioOverview {
    pub script: String,

    /// Encoded audio, in the speech provider's configured format.
    pub audio: Vec<u8>,
}

impl<P: ChatProvider> DocumentAssistant<P> {
    /// Two to three paragraph summary.
    pub async fn summary(&self) -> Result<String> {
        self.generate(StudyTool::Summary, prompt::summary_prompt)
            .await
    }

    /// Key insights as a list of sentences.
    pub async fn key_insights(&self) -> Result<Vec<String>> {
        let output = self
            .generate(StudyTool::KeyInsights, prompt::key_insights_prompt)
            .await?;
        extract_json_array(&output)
    }

    /// ASCII-tree mind map.
    pub async fn mind_map(&self) -> Result<String> {
        self.generate(StudyTool::MindMap, prompt::mind_map_prompt)
            .await
    }

    /// `count` multiple-choice questions. Malformed output is retried once.
    pub async fn quiz(&self, count: usize) -> Result<Vec<QuizQuestion>> {
        require_count(count)?;
        let mut last_error = None;
        for attempt in 1..=QUIZ_ATTEMPTS {
            let output = self
                .generate(StudyTool::Quiz, |context| prompt::quiz_prompt(context, count))
                .await?;
            match parse_quiz(&output) {
                Ok(questions) => return Ok(questions),
                Err(err) => {
                    warn!("Quiz attempt {attempt}/{QUIZ_ATTEMPTS} unusable: {err}");
                    last_error = Some(err);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| {
            AssistantError::MalformedOutput("quiz generation produced nothing".to_string())
        }))
    }

    /// `count` question/answer flashcards.
    pub async fn flashcards(&self, count: usize) -> Result<Vec<Flashcard>> {
        require_count(count)?;
        let output = self
            .generate(StudyTool::Flashcards, |context| {
                prompt::flashcards_prompt(context, count)
            })
            .await?;
        extract_json_array(&output)
    }

    /// Section titles.
    pub async fn table_of_contents(&self) -> Result<Vec<String>> {
        let output = self
            .generate(StudyTool::TableOfContents, prompt::table_of_contents_prompt)
            .await?;
        extract_json_array(&output)
    }

    /// Conversational script for a short spoken overview.
    pub async fn audio_script(&self) -> Result<String> {
        self.generate(StudyTool::AudioScript, prompt::audio_script_prompt)
            .await
    }

    /// Audio script read aloud by `speech`.
    pub async fn audio_overview<S: SpeechProvider + ?Sized>(
        &self,
        speech: &S,
    ) -> Result<AudioOverview> {
        let script = self.audio_script().await?;
        let audio = speech.synthesize(&script).await?;
        info!("Synthesized {} bytes of audio with {}", audio.len(), speech.name());
        Ok(AudioOverview { script, audio })
    }

    /// Run one tool's prompt over its leading segments and return the raw
    /// model text.
    async fn generate(
        &self,
        tool: StudyTool,
        build_prompt: impl FnOnce(&str) -> String,
    ) -> Result<String> {
        let segments = self
            .session
            .leading_segments(tool.context_segments())
            .await;
        if segments.is_empty() {
            return Err(AssistantError::NoDocuments);
        }

        let context = document_context(&segments, self.config.max_context_chars);
        debug!(
            "Generating {tool} from {} segments ({} chars)",
            context.included,
            context.text.chars().count()
        );

        let request = ChatRequest::from_prompt(build_prompt(&context.text))
            .with_temperature(tool.temperature())
            .with_max_tokens(tool.max_tokens());
        Ok(self.provider.complete(request).await?.content)
    }
}

fn require_count(count: usize) -> Result<()> {
    if count == 0 {
        return Err(AssistantError::InvalidInput(
            "count must be positive".to_string(),
        ));
    }
    Ok(())
}

fn parse_quiz(output: &str) -> Result<Vec<QuizQuestion>> {
    let questions: Vec<QuizQuestion> = extract_json_array(output)?;
    if questions.is_empty() {
        return Err(AssistantError::MalformedOutput(
            "quiz contains no questions".to_string(),
        ));
    }
    if let Some(q) = questions.iter().find(|q| q.options.is_empty()) {
        return Err(AssistantError::MalformedOutput(format!(
            "question without options: {}",
            q.question
        )));
    }
    Ok(questions)
}
