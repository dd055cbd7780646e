//! Short human-readable text attached to finished steps.

use serde_json::Value;

use crate::nodes::names;
use crate::state::keys;
use crate::stream::Frame;

const EXCERPT_CHARS: usize = 160;

fn joined(value: Option<&Value>) -> Option<String> {
    let items: Vec<&str> = value?.as_array()?.iter().filter_map(Value::as_str).collect();
    (!items.is_empty()).then(|| items.join(", "))
}

fn excerpt(text: &str) -> String {
    let text = text.trim();
    if text.chars().count() <= EXCERPT_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(EXCERPT_CHARS).collect();
    format!("{}…", cut.trim_end())
}

/// Content for a skeleton step, from the values its frame carried.
pub(super) fn for_step(node: &str, frame: &Frame) -> Option<String> {
    match node {
        names::PREPARER => frame
            .get(keys::RESUME_TEXT)
            .and_then(Value::as_str)
            .map(|t| format!("Resume text: {} characters", t.chars().count())),
        names::JD_ANALYZER => {
            joined(frame.get(keys::JD_ANALYSIS).and_then(|a| a.get("keySkills")))
                .map(|s| format!("Key skills: {}", s))
        }
        names::QUERY_WRITER => joined(frame.get(keys::QUERIES)).map(|q| format!("Queries: {}", q)),
        names::WEB_SEARCHER => frame
            .get(keys::SUMMARIES)
            .and_then(Value::as_array)
            .map(|s| format!("{} summaries collected", s.len())),
        names::REFLECTION => match frame.get(keys::IS_SUFFICIENT).and_then(Value::as_bool) {
            Some(true) => Some("Research is sufficient".to_string()),
            Some(false) => frame
                .get(keys::KNOWLEDGE_GAP)
                .and_then(Value::as_str)
                .filter(|g| !g.is_empty())
                .map(|g| format!("Knowledge gap: {}", g)),
            None => None,
        },
        names::FINAL_ANSWER => frame
            .get(keys::ANALYSIS_REPORT)
            .and_then(|r| r.get("webSearchResults"))
            .and_then(Value::as_str)
            .map(excerpt),
        names::PREPARE_ANALYZER => frame
            .get(keys::ANALYSIS_TASKS)
            .and_then(Value::as_array)
            .map(|t| format!("{} categories", t.len())),
        names::COMBINER => frame
            .get(keys::ANALYSIS_REPORT)
            .and_then(|r| r.get("overallScore"))
            .and_then(Value::as_u64)
            .map(|s| format!("Overall score: {}/100", s)),
        names::PREPARE_REWRITER => frame
            .get(keys::REWRITE_TASKS)
            .and_then(Value::as_array)
            .map(|t| format!("{} sections to rewrite", t.len())),
        names::COMBINE_SECTIONS => frame
            .get(keys::OPTIMIZED_RESUME)
            .map(|_| "Optimized resume ready".to_string()),
        _ => None,
    }
}

/// Content for a finished child: the category score, or a rewrite note.
pub(super) fn for_child(frame: &Frame, task: &str) -> Option<String> {
    if let Some(results) = frame
        .get(keys::PARALLEL_ANALYSIS_RESULTS)
        .and_then(Value::as_array)
    {
        let result = results
            .iter()
            .rev()
            .find(|r| r.get("category").and_then(Value::as_str) == Some(task))?;
        let score = result.get("score").and_then(Value::as_u64).unwrap_or(0);
        return Some(match result.get("error").and_then(Value::as_str) {
            Some(e) => format!("Score unavailable: {}", e),
            None => format!("Score: {}/100", score),
        });
    }
    frame
        .get(keys::OPTIMIZED_SECTIONS)
        .map(|_| "Section rewritten".to_string())
}
