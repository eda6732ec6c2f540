//! CV optimizer — rewrites extracted CV text against a job analysis.

use tracing::info;

use crate::analysis::analyzer::AnalysisOutcome;
use crate::analysis::prompts::{
    OPTIMIZE_MAX_TOKENS, OPTIMIZE_PROMPT_TEMPLATE, OPTIMIZE_SYSTEM, OPTIMIZE_TEMPERATURE,
};
use crate::llm_client::prompts::fill_template;
use crate::llm_client::{CompletionRequest, CompletionService, LlmError};

pub fn build_optimize_request(
    analysis: &AnalysisOutcome,
    cv_text: &str,
) -> Result<CompletionRequest, LlmError> {
    let analysis_json = serde_json::to_string_pretty(analysis)?;
    Ok(CompletionRequest {
        system: OPTIMIZE_SYSTEM,
        prompt: fill_template(
            OPTIMIZE_PROMPT_TEMPLATE,
            &[("analysis_json", analysis_json.as_str()), ("cv_text", cv_text)],
        ),
        max_tokens: OPTIMIZE_MAX_TOKENS,
        temperature: OPTIMIZE_TEMPERATURE,
    })
}

/// Returns the rewritten CV verbatim, or an empty string when the service
/// produced no completion. Whether an empty rewrite is acceptable is the
/// caller's decision.
pub async fn optimize_cv(
    analysis: &AnalysisOutcome,
    cv_text: &str,
    llm: &dyn CompletionService,
) -> Result<String, LlmError> {
    let request = build_optimize_request(analysis, cv_text)?;
    let optimized = llm.complete(&request).await?.unwrap_or_default();
    info!("CV optimization produced {} chars", optimized.len());
    Ok(optimized)
}
