// CV tailoring pipeline: job description analysis, CV rewriting, and the
// multipart endpoint that runs them in sequence.
// All completion calls go through llm_client::CompletionService.

pub mod analyzer;
pub mod handlers;
pub mod optimizer;
pub mod pipeline;
pub mod prompts;
