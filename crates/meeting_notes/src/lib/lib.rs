mod analyzer;
mod error;
mod llm;
pub mod normalizer;
pub mod prompt;
pub mod server;
pub mod tracing;
pub mod types;

pub use analyzer::{builder::MeetingAnalyzerBuilder, MeetingAnalyzer};
pub use error::Error;
pub use llm::model::{ChatRequest, LanguageModel, SamplingOptions};
pub use llm::ollama;
pub use types::{AnalysisOutcome, ListItem, MeetingAnalysis, ModelDescriptor};
