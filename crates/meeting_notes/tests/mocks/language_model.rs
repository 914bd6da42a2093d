use std::sync::{Arc, Mutex};

use meeting_notes::{ChatRequest, Error, LanguageModel, ModelDescriptor};

#[derive(Debug, Clone)]
pub enum Failure {
    Connection(String),
    Api(u16, String),
}

impl Failure {
    fn to_error(&self) -> Error {
        match self {
            Failure::Connection(msg) => Error::Connection(msg.clone()),
            Failure::Api(status, msg) => Error::Api {
                status: *status,
                message: msg.clone(),
            },
        }
    }
}

#[derive(Clone)]
pub struct MockLanguageModel {
    pub model: String,
    pub reply: String,
    pub models: Vec<ModelDescriptor>,
    pub calls: Arc<Mutex<Vec<ChatRequest>>>,
    pub fail_with: Option<Failure>,
}

impl MockLanguageModel {
    pub fn new(reply: &str) -> Self {
        Self {
            model: "mock-llama".to_string(),
            reply: reply.to_string(),
            models: vec![
                ModelDescriptor::Name("mock-llama".into()),
                ModelDescriptor::Detailed {
                    name: None,
                    model: Some("mistral:7b".into()),
                    id: None,
                },
            ],
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(failure: Failure) -> Self {
        Self {
            fail_with: Some(failure),
            ..Self::new("")
        }
    }

    pub fn with_models(mut self, models: Vec<ModelDescriptor>) -> Self {
        self.models = models;
        self
    }
}

impl LanguageModel for MockLanguageModel {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn chat(&self, request: ChatRequest) -> Result<String, Error> {
        self.calls.lock().unwrap().push(request);
        if let Some(ref failure) = self.fail_with {
            return Err(failure.to_error());
        }
        Ok(self.reply.clone())
    }

    async fn list_models(&self) -> Result<Vec<ModelDescriptor>, Error> {
        if let Some(ref failure) = self.fail_with {
            return Err(failure.to_error());
        }
        Ok(self.models.clone())
    }
}
