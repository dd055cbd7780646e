//! Analyze-phase nodes: `prepare_analyzer`, `analyze_category` and `combiner`.

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::error::AgentError;
use crate::graph::{ErrorPolicy, Node, RunContext};
use crate::llm::parse_json_response;
use crate::resume::{CategoryResult, CategoryScore, JdAnalysis, Resume};
use crate::state::{keys, StateUpdate, WorkflowState};

use super::{ask, names, prompts};

/// Categories every resume is scored on, in analysis order.
pub const ANALYSIS_CATEGORIES: [&str; 5] = [
    "keywordMatch",
    "skillsAlignment",
    "experienceRelevance",
    "achievementImpact",
    "formatAndClarity",
];

/// Human title for a category key; unknown keys are shown as-is.
pub fn category_title(category: &str) -> &str {
    match category {
        "keywordMatch" => "Keyword Match",
        "skillsAlignment" => "Skills Alignment",
        "experienceRelevance" => "Experience Relevance",
        "achievementImpact" => "Achievement Impact",
        "formatAndClarity" => "Format & Clarity",
        other => other,
    }
}

/// Announces the category queue and resets the analysis accumulators.
pub struct PrepareAnalyzerNode {
    categories: Vec<String>,
}

impl PrepareAnalyzerNode {
    pub fn new() -> Self {
        Self::with_categories(ANALYSIS_CATEGORIES)
    }

    pub fn with_categories<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            categories: categories.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for PrepareAnalyzerNode {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Node for PrepareAnalyzerNode {
    fn id(&self) -> &str {
        names::PREPARE_ANALYZER
    }

    async fn run(&self, state: WorkflowState, _ctx: &RunContext) -> Result<StateUpdate, AgentError> {
        let _: JdAnalysis = state.require(keys::JD_ANALYSIS)?;
        let resume: Resume = state.require(keys::RESUME)?;

        let mut update = StateUpdate::new()
            .set(keys::ANALYSIS_TASKS, self.categories.clone())
            .set(keys::PARALLEL_ANALYSIS_RESULTS, Value::Null)
            .set(keys::CURRENT_ANALYSIS_TASK, Value::Null);
        if state.present(keys::RESUME_TEXT).is_none() {
            update = update.set(keys::RESUME_TEXT, resume.render_text());
        }
        Ok(update)
    }
}

/// Scores `currentAnalysisTask` and appends the result.
///
/// Failures never stop the phase: a failed call or malformed answer becomes a
/// zero-score placeholder carrying the error text.
pub struct AnalyzeCategoryNode;

impl AnalyzeCategoryNode {
    async fn score(
        &self,
        category: &str,
        state: &WorkflowState,
        ctx: &RunContext,
    ) -> Result<CategoryResult, AgentError> {
        let jd_analysis = state.present(keys::JD_ANALYSIS).cloned().unwrap_or(Value::Null);
        let research = state
            .get(keys::ANALYSIS_REPORT)
            .and_then(|r| r.get("webSearchResults"))
            .and_then(Value::as_str)
            .unwrap_or_default();
        let input = format!(
            "Category: {} ({})\n\nJob analysis:\n{}\n\nMarket research:\n{}\n\nResume:\n{}",
            category_title(category),
            category,
            jd_analysis,
            research,
            state.get_str(keys::RESUME_TEXT).unwrap_or_default()
        );
        let answer = ask(ctx, prompts::ANALYZE_CATEGORY_PROMPT, input).await?;
        let score: CategoryScore = parse_json_response(&answer)?;
        Ok(CategoryResult::from_score(category, score))
    }
}

#[async_trait]
impl Node for AnalyzeCategoryNode {
    fn id(&self) -> &str {
        names::ANALYZE_CATEGORY
    }

    fn error_policy(&self) -> ErrorPolicy {
        ErrorPolicy::Continue
    }

    async fn run(&self, state: WorkflowState, ctx: &RunContext) -> Result<StateUpdate, AgentError> {
        let category: String = state.require(keys::CURRENT_ANALYSIS_TASK)?;

        let delay = ctx.config.analysis_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let result = match self.score(&category, &state, ctx).await {
            Ok(result) => result,
            Err(e) => CategoryResult::placeholder(&category, e.to_string()),
        };
        Ok(StateUpdate::new()
            .set_serialized(keys::PARALLEL_ANALYSIS_RESULTS, &[result])?
            .set(keys::TASK_COMPLETED, category))
    }
}

/// Folds `parallelAnalysisResults` into `analysisReport.detailedAnalysis` and
/// `analysisReport.overallScore`.
pub struct CombinerNode;

#[async_trait]
impl Node for CombinerNode {
    fn id(&self) -> &str {
        names::COMBINER
    }

    async fn run(&self, state: WorkflowState, _ctx: &RunContext) -> Result<StateUpdate, AgentError> {
        let results: Vec<CategoryResult> = state
            .decode(keys::PARALLEL_ANALYSIS_RESULTS)?
            .unwrap_or_default();

        let mut detailed = Map::new();
        for result in &results {
            let value = serde_json::to_value(result)
                .map_err(|e| AgentError::ExecutionFailed(e.to_string()))?;
            detailed.insert(result.category.clone(), value);
        }

        let scores: Vec<u32> = detailed
            .values()
            .filter_map(|v| v.get("score").and_then(Value::as_u64))
            .map(|s| s as u32)
            .collect();
        let overall = if scores.is_empty() {
            0
        } else {
            let sum: u32 = scores.iter().sum();
            (f64::from(sum) / scores.len() as f64).round() as u32
        };

        Ok(StateUpdate::new().set(
            keys::ANALYSIS_REPORT,
            json!({ "detailedAnalysis": detailed, "overallScore": overall }),
        ))
    }
}
