use crate::{
    error::Error,
    llm::model::{ChatRequest, LanguageModel, SamplingOptions},
    normalizer::normalize,
    prompt::build_analysis_prompt,
    types::AnalysisOutcome,
};

pub mod builder;

/// Runs transcripts through a language model and normalizes its replies.
#[derive(Debug)]
pub struct MeetingAnalyzer<M>
where
    M: LanguageModel + Send + Sync + 'static,
{
    model: M,
    sampling: SamplingOptions,
}

impl<M> MeetingAnalyzer<M>
where
    M: LanguageModel + Send + Sync + 'static,
{
    pub fn new(model: M, sampling: SamplingOptions) -> Self {
        MeetingAnalyzer { model, sampling }
    }

    pub fn model_id(&self) -> &str {
        self.model.model_id()
    }

    /// Extracts a [`crate::MeetingAnalysis`] from `transcript`.
    ///
    /// Blank transcripts are rejected before the model is called. Replies the
    /// normalizer cannot parse still succeed, carrying the fallback record.
    #[tracing::instrument(skip_all, fields(model = %self.model.model_id(), len = transcript.len()))]
    pub async fn analyze(&self, transcript: &str) -> Result<AnalysisOutcome, Error> {
        if transcript.trim().is_empty() {
            return Err(Error::EmptyTranscript);
        }

        let request = ChatRequest {
            prompt: build_analysis_prompt(transcript),
            options: self.sampling,
        };

        let raw_response = self
            .model
            .chat(request)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to analyze transcript"))?;

        tracing::info!(response_len = raw_response.len(), "Received model response");
        let analysis = normalize(&raw_response);

        Ok(AnalysisOutcome {
            analysis,
            model_used: self.model.model_id().to_string(),
            raw_response,
        })
    }

    /// Names of the models the runtime serves; any descriptor without a
    /// recognizable name fails the whole listing.
    #[tracing::instrument(skip(self))]
    pub async fn available_models(&self) -> Result<Vec<String>, Error> {
        let descriptors = self
            .model
            .list_models()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to list models"))?;

        descriptors
            .iter()
            .map(|d| d.name().map(str::to_string))
            .collect::<Result<Vec<_>, _>>()
            .inspect_err(|e| tracing::error!(error = %e, "Unrecognized model descriptor"))
    }
}
