//! Scripted provider for tests
//!
//! Replies are consumed in order; every call is recorded so tests can assert
//! on what the coach sent. An exhausted script answers with no text.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use super::{ChatRequest, LlmProvider, LlmResponse, VisionRequest};
use crate::types::{ErrorCategory, LlmError, Result};

#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    Empty,
    Fail(ErrorCategory),
    /// Sleep, then answer
    Delayed(Duration, Box<Reply>),
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Reply::Text(text.into())
    }

    pub fn delayed(delay: Duration, reply: Reply) -> Self {
        Reply::Delayed(delay, Box::new(reply))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Chat {
        system_instruction: String,
        history: Vec<(String, String)>,
        message: String,
        temperature: f32,
    },
    Vision {
        mime_type: String,
        prompt: String,
        schema_verdict_enum: bool,
    },
}

#[derive(Debug, Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedProvider {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    async fn answer(&self) -> Result<LlmResponse> {
        let mut reply = self.replies.lock().unwrap().pop_front().unwrap_or(Reply::Empty);
        loop {
            match reply {
                Reply::Text(text) => return Ok(LlmResponse::text_only(text)),
                Reply::Empty => return Ok(LlmResponse::default()),
                Reply::Fail(category) => {
                    return Err(LlmError::with_provider(category, "scripted failure", "scripted")
                        .into());
                }
                Reply::Delayed(delay, inner) => {
                    tokio::time::sleep(delay).await;
                    reply = *inner;
                }
            }
        }
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn chat(&self, request: ChatRequest<'_>) -> Result<LlmResponse> {
        self.calls.lock().unwrap().push(Call::Chat {
            system_instruction: request.system_instruction.to_string(),
            history: request
                .history
                .iter()
                .map(|m| (m.role.as_str().to_string(), m.text.clone()))
                .collect(),
            message: request.message.to_string(),
            temperature: request.temperature,
        });
        self.answer().await
    }

    async fn generate_with_image(&self, request: VisionRequest<'_>) -> Result<LlmResponse> {
        self.calls.lock().unwrap().push(Call::Vision {
            mime_type: request.image.mime_type.clone(),
            prompt: request.prompt.to_string(),
            schema_verdict_enum: request.schema["properties"]["verdict"]["enum"].is_array(),
        });
        self.answer().await
    }

    fn name(&self) -> &str {
        "scripted"
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}
