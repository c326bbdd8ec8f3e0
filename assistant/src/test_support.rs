//! Scripted chat and speech providers for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use docqa_llm::{ChatProvider, ChatRequest, ChatResponse, LlmError, SpeechProvider};

/// Replays canned replies in order and records every request.
#[derive(Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<docqa_llm::Result<String>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, content: &str) -> Self {
        self.replies.lock().unwrap().push_back(Ok(content.to_string()));
        self
    }

    pub fn fail(self, err: LlmError) -> Self {
        self.replies.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn complete(&self, request: ChatRequest) -> docqa_llm::Result<ChatResponse> {
        self.requests.lock().unwrap().push(request);
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::InvalidResponse("script exhausted".to_string())));
        reply.map(|content| ChatResponse {
            content,
            model: "scripted".to_string(),
            tokens_used: None,
        })
    }
}

/// Speech provider that "encodes" text as `audio:<text>` and records what
/// it was asked to speak.
#[derive(Default)]
pub struct ScriptedSpeech {
    fail: bool,
    spoken: Mutex<Vec<String>>,
}

impl ScriptedSpeech {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechProvider for ScriptedSpeech {
    fn name(&self) -> &str {
        "scripted-speech"
    }

    fn is_available(&self) -> bool {
        !self.fail
    }

    async fn synthesize(&self, text: &str) -> docqa_llm::Result<Vec<u8>> {
        if self.fail {
            return Err(LlmError::ProviderNotConfigured("no speech key".to_string()));
        }
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(format!("audio:{text}").into_bytes())
    }
}
