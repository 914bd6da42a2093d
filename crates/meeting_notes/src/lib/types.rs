use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::error::Error;

/// Structured metadata extracted from a single meeting transcript.
///
/// Every field is always populated; the normalizer substitutes defaults (or the
/// whole [`MeetingAnalysis::fallback`] record) when the model's reply is incomplete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingAnalysis {
    pub summary: String,
    pub participants: Vec<String>,
    pub key_decisions: Vec<String>,
    pub action_items: Vec<String>,
    pub discussion_points: Vec<String>,
}

impl MeetingAnalysis {
    pub const NO_SUMMARY: &'static str = "No summary available";
    pub const FALLBACK_SUMMARY: &'static str =
        "Error: Could not parse the LLM response into structured format";
    pub const FALLBACK_DECISION: &'static str = "Unable to parse LLM response - JSON format error";
    pub const FALLBACK_ACTION: &'static str = "Try analyzing again or use a different model";
    /// Number of characters of the raw reply echoed back in the fallback record
    pub const RAW_EXCERPT_CHARS: usize = 300;

    /// The degraded record returned when the model's reply holds no parseable object.
    pub fn fallback(raw_response: &str) -> Self {
        let excerpt: String = raw_response.chars().take(Self::RAW_EXCERPT_CHARS).collect();

        Self {
            summary: Self::FALLBACK_SUMMARY.to_string(),
            participants: Vec::new(),
            key_decisions: vec![Self::FALLBACK_DECISION.to_string()],
            action_items: vec![Self::FALLBACK_ACTION.to_string()],
            discussion_points: vec![format!("Raw response: {excerpt}...")],
        }
    }
}

/// One element of a list field as the model produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum ListItem {
    Text(String),
    Number(Number),
    Bool(bool),
    Null,
    Other(Value),
}

impl From<Value> for ListItem {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => ListItem::Text(s),
            Value::Number(n) => ListItem::Number(n),
            Value::Bool(b) => ListItem::Bool(b),
            Value::Null => ListItem::Null,
            other => ListItem::Other(other),
        }
    }
}

impl ListItem {
    pub fn into_text(self) -> String {
        match self {
            ListItem::Text(s) => s,
            ListItem::Number(n) => n.to_string(),
            ListItem::Bool(b) => b.to_string(),
            ListItem::Null => "null".to_string(),
            // compact JSON, which `Value`'s Display already is
            ListItem::Other(v) => v.to_string(),
        }
    }
}

/// A model entry from the runtime's listing endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ModelDescriptor {
    Name(String),
    Detailed {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        model: Option<String>,
        #[serde(default)]
        id: Option<String>,
    },
    Unrecognized(Value),
}

impl ModelDescriptor {
    /// Resolves the descriptor's name, preferring `name`, then `model`, then `id`.
    pub fn name(&self) -> Result<&str, Error> {
        match self {
            ModelDescriptor::Name(name) => Ok(name.as_str()),
            ModelDescriptor::Detailed { name, model, id } => [name, model, id]
                .into_iter()
                .flatten()
                .map(String::as_str)
                .find(|n| !n.is_empty())
                .ok_or_else(|| Error::UnrecognizedModel("no name, model or id key".into())),
            ModelDescriptor::Unrecognized(value) => Err(Error::UnrecognizedModel(value.to_string())),
        }
    }
}

/// What one successful analysis hands back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisOutcome {
    pub analysis: MeetingAnalysis,
    pub model_used: String,
    pub raw_response: String,
}
