const ANALYSIS_TEMPLATE: &str = include_str!("./prompts/analysis.txt");
const TRANSCRIPT_PLACEHOLDER: &str = "{transcript}";

/// Renders the extraction instructions for `transcript`.
///
/// The transcript is embedded verbatim; validation (e.g. rejecting blank
/// transcripts) is the caller's job.
pub fn build_analysis_prompt(transcript: &str) -> String {
    ANALYSIS_TEMPLATE.replacen(TRANSCRIPT_PLACEHOLDER, transcript, 1)
}
