// Prompt constants for the analysis pipeline.

/// System prompt for job description analysis.
pub const ANALYZE_SYSTEM: &str = "You are an expert HR assistant who analyzes job descriptions.";

/// Job description analysis prompt. Replace `{job_description}` and `{json_only}` before sending.
pub const ANALYZE_PROMPT_TEMPLATE: &str = r#"Analyze the following job description and extract the key requirements, skills,
and qualifications being sought:

{job_description}

Return a structured JSON object with the following properties:
1. requiredSkills: Array of technical skills required
2. softSkills: Array of soft skills mentioned
3. experience: Years or type of experience required
4. education: Education requirements
5. keyResponsibilities: Key job responsibilities

{json_only}"#;

/// Extraction is literal, so the analyzer runs short and cold.
pub const ANALYZE_MAX_TOKENS: u32 = 800;
pub const ANALYZE_TEMPERATURE: f32 = 0.2;

/// System prompt for CV rewriting.
pub const OPTIMIZE_SYSTEM: &str =
    "You are an expert CV writer who tailors CVs to specific job descriptions.";

/// CV rewriting prompt. Replace `{analysis_json}` and `{cv_text}` before sending.
pub const OPTIMIZE_PROMPT_TEMPLATE: &str = r#"I have analyzed a job description and extracted the following key requirements and skills:
{analysis_json}

Now, I need to optimize the following CV to better match these requirements:

{cv_text}

Please generate an optimized version of this CV that:
1. Highlights experiences and skills that match the job requirements
2. Reorganizes content to emphasize relevant qualifications
3. Uses terminology from the job description where appropriate
4. Adds any missing sections that would strengthen the application
5. Keeps the overall length and structure similar to the original

Return the optimized CV text."#;

pub const OPTIMIZE_MAX_TOKENS: u32 = 2000;
pub const OPTIMIZE_TEMPERATURE: f32 = 0.3;
