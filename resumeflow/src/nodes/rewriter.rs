//! Rewrite-phase nodes: `prepare_rewriter`, `rewrite_section` and `combine_sections`.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::error::AgentError;
use crate::graph::{Node, RunContext};
use crate::llm::parse_json_response;
use crate::resume::{is_empty_section, Resume};
use crate::state::{keys, StateUpdate, WorkflowState};

use super::{ask, names, prompts};

/// Builds `rewriteTasks` from `sectionOrder` and resets the rewrite accumulators.
///
/// Skipped: missing or empty sections, `enabled: false`, keys listed in
/// `config.excludeSections`, and repeated keys.
pub struct PrepareRewriterNode;

#[async_trait]
impl Node for PrepareRewriterNode {
    fn id(&self) -> &str {
        names::PREPARE_REWRITER
    }

    async fn run(&self, state: WorkflowState, ctx: &RunContext) -> Result<StateUpdate, AgentError> {
        let resume: Resume = state.require(keys::RESUME)?;
        let mut tasks: Vec<String> = Vec::new();
        for entry in &resume.section_order {
            let key = &entry.key;
            let has_content = resume
                .sections
                .get(key)
                .map(|s| !is_empty_section(s))
                .unwrap_or(false);
            if !has_content
                || entry.enabled == Some(false)
                || ctx.config.exclude_sections.contains(key)
                || tasks.contains(key)
            {
                continue;
            }
            tasks.push(key.clone());
        }
        Ok(StateUpdate::new()
            .set(keys::REWRITE_TASKS, tasks)
            .set(keys::OPTIMIZED_SECTIONS, Value::Null)
            .set(keys::CURRENT_TASK, Value::Null))
    }
}

#[derive(Debug, Deserialize)]
struct Rewritten {
    content: Value,
}

fn same_kind(a: &Value, b: &Value) -> bool {
    std::mem::discriminant(a) == std::mem::discriminant(b)
}

/// Rewrites the section named by `currentTask`, retrying per the run's
/// [`RetryPolicy`](super::RetryPolicy).
///
/// An attempt fails on a service error, a non-JSON answer, or content whose JSON
/// type differs from the input section. When every attempt fails the node returns
/// `AgentError::Service` and the phase halts; sections merged earlier stay.
pub struct RewriteSectionNode;

#[async_trait]
impl Node for RewriteSectionNode {
    fn id(&self) -> &str {
        names::REWRITE_SECTION
    }

    async fn run(&self, state: WorkflowState, ctx: &RunContext) -> Result<StateUpdate, AgentError> {
        let key: String = state.require(keys::CURRENT_TASK)?;
        let resume: Resume = state.require(keys::RESUME)?;
        let original = resume.sections.get(&key).cloned().ok_or_else(|| {
            AgentError::ExecutionFailed(format!("resume has no section {}", key))
        })?;

        let input = format!(
            "Section \"{}\" ({}):\n{}\n\nJob analysis:\n{}\n\nResume analysis:\n{}",
            resume.title_of(&key),
            key,
            original,
            state.present(keys::JD_ANALYSIS).cloned().unwrap_or(Value::Null),
            state.present(keys::ANALYSIS_REPORT).cloned().unwrap_or(Value::Null),
        );

        let policy = ctx.config.retry_policy();
        let label = format!("rewrite_section:{}", key);
        let outcome = policy
            .run(&label, |_attempt| {
                let input = input.clone();
                let original = &original;
                async move {
                    let answer = ask(ctx, prompts::REWRITE_SECTION_PROMPT, input).await?;
                    let rewritten: Rewritten = parse_json_response(&answer)?;
                    if !same_kind(&rewritten.content, original) {
                        return Err(AgentError::Validation(
                            "rewritten content changed the section's JSON type".into(),
                        ));
                    }
                    Ok(rewritten.content)
                }
            })
            .await;

        match outcome {
            Ok(content) => {
                let mut merged = Map::new();
                merged.insert(key.clone(), content);
                Ok(StateUpdate::new()
                    .set(keys::OPTIMIZED_SECTIONS, merged)
                    .set(keys::TASK_COMPLETED, key))
            }
            Err(e) => Err(AgentError::Service(format!(
                "rewriting section {} failed after {} attempts: {}",
                key,
                policy.max_attempts(),
                e
            ))),
        }
    }
}

/// Overlays `optimizedSections` onto a copy of `resume` as `optimizedResume`.
pub struct CombineSectionsNode;

#[async_trait]
impl Node for CombineSectionsNode {
    fn id(&self) -> &str {
        names::COMBINE_SECTIONS
    }

    async fn run(&self, state: WorkflowState, _ctx: &RunContext) -> Result<StateUpdate, AgentError> {
        let mut optimized = state
            .present(keys::RESUME)
            .cloned()
            .ok_or_else(|| AgentError::ExecutionFailed("missing required channel: resume".into()))?;
        let sections = state
            .present(keys::OPTIMIZED_SECTIONS)
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        let Some(root) = optimized.as_object_mut() else {
            return Err(AgentError::Validation("resume must be an object".into()));
        };
        let target = root
            .entry("sections")
            .or_insert_with(|| json!({}));
        let Some(target) = target.as_object_mut() else {
            return Err(AgentError::Validation("resume.sections must be an object".into()));
        };
        for (key, content) in sections {
            target.insert(key, content);
        }
        Ok(StateUpdate::new().set(keys::OPTIMIZED_RESUME, optimized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::config::PhaseConfig;
    use crate::graph::RunContext;
    use crate::llm::MockLlm;
    use crate::search::MockSearch;
    use crate::services::Services;
    use crate::test_support::{test_context, with_llm};

    fn resume() -> Value {
        json!({
            "info": {"name": "Ada"},
            "sections": {
                "summary": "Backend engineer",
                "experience": [{"company": "Acme", "details": "Built APIs"}],
                "projects": [],
                "hobbies": "Chess",
                "skills": "Go"
            },
            "sectionOrder": [
                {"key": "summary"},
                {"key": "experience"},
                {"key": "projects"},
                {"key": "hobbies", "enabled": false},
                {"key": "missing"},
                {"key": "summary"},
                {"key": "skills"}
            ]
        })
    }

    /// **Scenario**: Tasks follow sectionOrder and skip empty, disabled, excluded, missing and repeated keys.
    #[tokio::test]
    async fn prepare_filters_tasks() {
        let config = PhaseConfig {
            exclude_sections: vec!["skills".into()],
            ..PhaseConfig::immediate()
        };
        let ctx = RunContext::new(
            Services::new(Arc::new(MockLlm::with_response("{}")), Arc::new(MockSearch::echo())),
            config,
        );
        let state = WorkflowState::from_value(json!({"resume": resume()})).unwrap();
        let u = PrepareRewriterNode.run(state, &ctx).await.unwrap();
        assert_eq!(u.get(keys::REWRITE_TASKS), Some(&json!(["summary", "experience"])));
        assert_eq!(u.get(keys::OPTIMIZED_SECTIONS), Some(&Value::Null));
    }

    fn current(key: &str) -> WorkflowState {
        WorkflowState::from_value(json!({"resume": resume(), "currentTask": key})).unwrap()
    }

    /// **Scenario**: Fail, fail, succeed yields the section and taskCompleted.
    #[tokio::test]
    async fn rewrite_recovers_within_retries() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let llm = MockLlm::from_fn(move |_| {
            if seen.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(AgentError::Service("overloaded".into()))
            } else {
                Ok(r#"{"content": "Senior backend engineer shipping Go services"}"#.into())
            }
        });
        let u = RewriteSectionNode.run(current("summary"), &with_llm(llm)).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            u.get(keys::OPTIMIZED_SECTIONS),
            Some(&json!({"summary": "Senior backend engineer shipping Go services"}))
        );
        assert_eq!(u.get(keys::TASK_COMPLETED), Some(&json!("summary")));
    }

    /// **Scenario**: Content of a different JSON type counts as a failed attempt.
    #[tokio::test]
    async fn rewrite_rejects_type_change() {
        let llm = MockLlm::with_response(r#"{"content": "flattened"}"#);
        let err = RewriteSectionNode
            .run(current("experience"), &with_llm(llm))
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Service(_)));
        assert!(err.to_string().contains("experience"));
        assert!(err.to_string().contains("3 attempts"));
    }

    /// **Scenario**: combine_sections overlays rewritten sections and keeps the rest.
    #[tokio::test]
    async fn combine_overlays_sections() {
        let state = WorkflowState::from_value(json!({
            "resume": resume(),
            "optimizedSections": {"summary": "New summary"}
        }))
        .unwrap();
        let u = CombineSectionsNode.run(state, &test_context()).await.unwrap();
        let out = u.get(keys::OPTIMIZED_RESUME).unwrap();
        assert_eq!(out["sections"]["summary"], json!("New summary"));
        assert_eq!(out["sections"]["skills"], json!("Go"));
        assert_eq!(out["info"]["name"], json!("Ada"));
    }
}
