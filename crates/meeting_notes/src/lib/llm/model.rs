use std::future::Future;

use serde::Serialize;

use crate::{error::Error, types::ModelDescriptor};

/// A chat-completion runtime that can answer a single prompt and list the
/// models it serves.
pub trait LanguageModel {
    /// Identifier of the model every chat request is sent to
    fn model_id(&self) -> &str;

    fn chat(&self, request: ChatRequest) -> impl Future<Output = Result<String, Error>> + Send;

    fn list_models(&self) -> impl Future<Output = Result<Vec<ModelDescriptor>, Error>> + Send;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub prompt: String,
    pub options: SamplingOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SamplingOptions {
    pub temperature: f32,
    pub top_p: f32,
    /// Ask the runtime to constrain its output to JSON
    #[serde(skip)]
    pub json_mode: bool,
}

impl Default for SamplingOptions {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            top_p: 0.9,
            json_mode: true,
        }
    }
}
