//! Job description analyzer — extracts requirements from a raw job description.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::analysis::prompts::{
    ANALYZE_MAX_TOKENS, ANALYZE_PROMPT_TEMPLATE, ANALYZE_SYSTEM, ANALYZE_TEMPERATURE,
};
use crate::llm_client::prompts::{fill_template, JSON_ONLY_INSTRUCTION};
use crate::llm_client::{strip_json_fences, CompletionRequest, CompletionService, LlmError};

/// Requirements extracted from a job description.
///
/// Holds the model's JSON object exactly as returned. No field is required
/// and no field type is enforced; the accessors give a typed view of the five
/// requested fields and ignore values of an unexpected shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobAnalysis(Map<String, Value>);

impl JobAnalysis {
    pub fn required_skills(&self) -> Vec<&str> {
        self.strings("requiredSkills")
    }

    pub fn soft_skills(&self) -> Vec<&str> {
        self.strings("softSkills")
    }

    pub fn experience(&self) -> Option<String> {
        self.text("experience")
    }

    pub fn education(&self) -> Option<String> {
        self.text("education")
    }

    /// Responsibilities come back either as one paragraph or as a list.
    pub fn key_responsibilities(&self) -> Vec<&str> {
        self.strings("keyResponsibilities")
    }

    fn strings(&self, key: &str) -> Vec<&str> {
        match self.0.get(key) {
            Some(Value::String(s)) => vec![s.as_str()],
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Array(_) => Some(self.strings(key).join(", ")).filter(|s| !s.is_empty()),
            _ => None,
        }
    }
}

impl From<Map<String, Value>> for JobAnalysis {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// What the analyzer made of the model's answer.
///
/// Serializes as the analysis object itself, or as `{ "rawContent": ... }`
/// when the answer was not a JSON object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    Structured(JobAnalysis),
    Unstructured {
        #[serde(rename = "rawContent")]
        raw_content: String,
    },
}

/// Builds the completion request for a job description.
pub fn build_analysis_request(job_description: &str) -> CompletionRequest {
    CompletionRequest {
        system: ANALYZE_SYSTEM,
        prompt: fill_template(
            ANALYZE_PROMPT_TEMPLATE,
            &[
                ("job_description", job_description),
                ("json_only", JSON_ONLY_INSTRUCTION),
            ],
        ),
        max_tokens: ANALYZE_MAX_TOKENS,
        temperature: ANALYZE_TEMPERATURE,
    }
}

/// Interprets a completion.
///
/// Empty text and a literal JSON `null` yield `None`. Any JSON object is kept
/// as-is in `Structured`; everything else is kept verbatim as `Unstructured`.
pub fn parse_analysis(text: &str) -> Option<AnalysisOutcome> {
    if text.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(strip_json_fences(text)) {
        Ok(Value::Object(fields)) => Some(AnalysisOutcome::Structured(fields.into())),
        Ok(Value::Null) => None,
        Ok(other) => {
            debug!("Analysis was JSON but not an object ({other}); keeping raw content");
            Some(AnalysisOutcome::Unstructured {
                raw_content: text.to_string(),
            })
        }
        Err(e) => {
            debug!("Analysis was not valid JSON ({e}); keeping raw content");
            Some(AnalysisOutcome::Unstructured {
                raw_content: text.to_string(),
            })
        }
    }
}

/// Analyzes a job description. `Ok(None)` means the service returned no completion.
pub async fn analyze_job_description(
    job_description: &str,
    llm: &dyn CompletionService,
) -> Result<Option<AnalysisOutcome>, LlmError> {
    let request = build_analysis_request(job_description);
    let completion = llm.complete(&request).await?;

    let outcome = completion.as_deref().and_then(parse_analysis);
    match &outcome {
        Some(AnalysisOutcome::Structured(analysis)) => {
            info!(
                required_skills = analysis.required_skills().len(),
                soft_skills = analysis.soft_skills().len(),
                responsibilities = analysis.key_responsibilities().len(),
                "Job analysis parsed as structured JSON"
            );
            debug!(
                experience = ?analysis.experience(),
                education = ?analysis.education(),
                "Job analysis requirements"
            );
        }
        Some(AnalysisOutcome::Unstructured { .. }) => info!("Job analysis fell back to raw content"),
        None => info!("Job analysis returned no completion"),
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::StubCompletions;
    use serde_json::json;

    const ANALYSIS_JSON: &str = r#"{
        "requiredSkills": ["Go", "PostgreSQL"],
        "softSkills": ["Communication"],
        "experience": "5+ years backend",
        "education": "BSc Computer Science",
        "keyResponsibilities": ["Build APIs", "Own services"]
    }"#;

    #[test]
    fn test_parse_full_analysis() {
        let outcome = parse_analysis(ANALYSIS_JSON).unwrap();
        let AnalysisOutcome::Structured(analysis) = outcome else {
            panic!("expected structured analysis");
        };
        assert_eq!(analysis.required_skills(), vec!["Go", "PostgreSQL"]);
        assert_eq!(analysis.soft_skills(), vec!["Communication"]);
        assert_eq!(analysis.experience().as_deref(), Some("5+ years backend"));
        assert_eq!(analysis.education().as_deref(), Some("BSc Computer Science"));
        assert_eq!(
            analysis.key_responsibilities(),
            vec!["Build APIs", "Own services"]
        );
    }

    #[test]
    fn test_parse_responsibilities_as_text() {
        let outcome = parse_analysis(r#"{"keyResponsibilities": "Design and ship services"}"#);
        let Some(AnalysisOutcome::Structured(analysis)) = outcome else {
            panic!("expected structured analysis");
        };
        assert_eq!(analysis.key_responsibilities(), vec!["Design and ship services"]);
        assert!(analysis.required_skills().is_empty());
    }

    #[test]
    fn test_parse_partial_object_keeps_extra_fields() {
        let outcome = parse_analysis(r#"{"requiredSkills": ["Rust"], "salary": "competitive"}"#);
        let Some(AnalysisOutcome::Structured(analysis)) = outcome else {
            panic!("expected structured analysis");
        };
        assert!(analysis.soft_skills().is_empty());

        let wire = serde_json::to_value(AnalysisOutcome::Structured(analysis)).unwrap();
        assert_eq!(wire, json!({"requiredSkills": ["Rust"], "salary": "competitive"}));
    }

    #[test]
    fn test_parse_mixed_field_types_stay_structured() {
        let text = r#"{"requiredSkills":["Go"],"experience":5,"education":["BSc","MSc"],"softSkills":null}"#;
        let outcome = parse_analysis(text).unwrap();
        let AnalysisOutcome::Structured(analysis) = &outcome else {
            panic!("expected structured analysis, got {outcome:?}");
        };
        assert_eq!(analysis.experience().as_deref(), Some("5"));
        assert_eq!(analysis.education().as_deref(), Some("BSc, MSc"));
        assert!(analysis.soft_skills().is_empty());

        let wire = serde_json::to_value(&outcome).unwrap();
        assert_eq!(wire, serde_json::from_str::<serde_json::Value>(text).unwrap());
    }

    #[test]
    fn test_parse_fenced_json() {
        let fenced = format!("```json\n{ANALYSIS_JSON}\n```");
        assert!(matches!(
            parse_analysis(&fenced),
            Some(AnalysisOutcome::Structured(_))
        ));
    }

    #[test]
    fn test_parse_prose_falls_back_to_raw_content() {
        let text = "The role needs Go and good communication.";
        let outcome = parse_analysis(text).unwrap();
        assert_eq!(
            outcome,
            AnalysisOutcome::Unstructured {
                raw_content: text.to_string()
            }
        );
        assert_eq!(serde_json::to_value(&outcome).unwrap(), json!({"rawContent": text}));
    }

    #[test]
    fn test_parse_json_array_falls_back_to_raw_content() {
        assert!(matches!(
            parse_analysis(r#"["Go", "SQL"]"#),
            Some(AnalysisOutcome::Unstructured { .. })
        ));
    }

    #[test]
    fn test_parse_empty_text_and_null_are_none() {
        assert_eq!(parse_analysis(""), None);
        assert_eq!(parse_analysis("null"), None);
    }

    #[test]
    fn test_parse_whitespace_only_keeps_raw_content() {
        assert_eq!(
            parse_analysis("  \n"),
            Some(AnalysisOutcome::Unstructured {
                raw_content: "  \n".to_string()
            })
        );
    }

    #[test]
    fn test_request_embeds_job_description_with_low_temperature() {
        let request = build_analysis_request("Seeking a backend engineer with Go experience");
        assert_eq!(request.system, ANALYZE_SYSTEM);
        assert!(request
            .prompt
            .contains("Seeking a backend engineer with Go experience"));
        for field in [
            "requiredSkills",
            "softSkills",
            "experience",
            "education",
            "keyResponsibilities",
        ] {
            assert!(request.prompt.contains(field), "prompt missing {field}");
        }
        assert_eq!(request.max_tokens, 800);
        assert!((request.temperature - 0.2).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_analyze_returns_none_on_empty_completion() {
        let llm = StubCompletions::new(vec![Ok(None)]);
        let outcome = analyze_job_description("Rust engineer", &llm).await.unwrap();
        assert_eq!(outcome, None);
        assert_eq!(llm.calls(), 1);
    }

    #[tokio::test]
    async fn test_analyze_propagates_errors_without_retry() {
        let llm = StubCompletions::new(vec![Err(LlmError::Api {
            status: 503,
            code: None,
            message: "Service unavailable".to_string(),
        })]);
        let err = analyze_job_description("Rust engineer", &llm)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert_eq!(llm.calls(), 1);
    }
}
