use crate::{
    llm::model::{LanguageModel, SamplingOptions},
    MeetingAnalyzer,
};

pub struct MeetingAnalyzerBuilder<M = ()> {
    model: M,
    sampling: SamplingOptions,
}

impl MeetingAnalyzerBuilder {
    pub fn new() -> Self {
        Self {
            model: (),
            sampling: SamplingOptions::default(),
        }
    }
}

impl Default for MeetingAnalyzerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> MeetingAnalyzerBuilder<M> {
    pub fn model<M2: LanguageModel + Send + Sync + 'static>(
        self,
        model: M2,
    ) -> MeetingAnalyzerBuilder<M2> {
        MeetingAnalyzerBuilder {
            model,
            sampling: self.sampling,
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.sampling.temperature = temperature;
        self
    }

    pub fn top_p(mut self, top_p: f32) -> Self {
        self.sampling.top_p = top_p;
        self
    }
}

impl<M> MeetingAnalyzerBuilder<M>
where
    M: LanguageModel + Send + Sync + 'static,
{
    pub fn build(self) -> MeetingAnalyzer<M> {
        MeetingAnalyzer::new(self.model, self.sampling)
    }
}
