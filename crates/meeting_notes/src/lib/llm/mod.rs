pub mod model;
pub mod ollama;
