//! Scripted services and seeds shared by the phase tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use resumeflow::nodes::prompts;
use resumeflow::{
    AgentError, Frame, Message, MockLlm, MockSearch, Phase, PhaseRunner, Services,
    StateAccumulator,
};
use serde_json::{json, Value};
use tokio_stream::StreamExt;

/// Knobs for the scripted model.
#[derive(Clone, Debug, Default)]
pub struct Script {
    /// Reflection reports sufficient on every pass.
    pub sufficient: bool,
    /// The JD extraction answers with a malformed shape.
    pub jd_invalid: bool,
    /// Category whose scoring always fails.
    pub failing_category: Option<String>,
    /// Number of leading rewrite calls that fail.
    pub rewrite_failures: usize,
    /// Section whose rewrite always fails.
    pub failing_section: Option<String>,
}

const KNOWN_SKILLS: [&str; 5] = ["Go", "Kubernetes", "Rust", "Python", "PostgreSQL"];

fn jd_answer(user: &str, invalid: bool) -> String {
    if invalid {
        return r#"{"keySkills": "Go"}"#.to_string();
    }
    let skills: Vec<&str> = KNOWN_SKILLS
        .iter()
        .copied()
        .filter(|s| user.contains(s))
        .collect();
    json!({
        "keySkills": skills,
        "responsibilities": ["Build backend services"],
        "qualifications": ["5+ years of experience"]
    })
    .to_string()
}

/// Section key and JSON as written by the rewrite node's user message.
fn section_of(user: &str) -> Option<(String, Value)> {
    let (head, rest) = user.split_once("):\n")?;
    let key = head.rsplit_once(" (")?.1.to_string();
    let body = rest.split("\n\nJob analysis:").next()?;
    Some((key, serde_json::from_str(body).ok()?))
}

fn rewritten(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(format!("Optimized: {}", s)),
        other => other,
    }
}

/// Model that answers every node's prompt deterministically.
pub fn scripted_llm(script: Script) -> MockLlm {
    let rewrites = Arc::new(AtomicUsize::new(0));
    MockLlm::from_fn(move |messages: &[Message]| {
        let system = messages.first().map(Message::content).unwrap_or_default();
        let user = messages.get(1).map(Message::content).unwrap_or_default();
        match system {
            prompts::JD_ANALYSIS_PROMPT => Ok(jd_answer(user, script.jd_invalid)),
            prompts::QUERY_WRITER_PROMPT => Ok(json!({
                "rationale": "cover skills and market",
                "query": ["go backend hiring trends", "kubernetes skills employers value"]
            })
            .to_string()),
            prompts::REFLECTION_PROMPT if script.sufficient => Ok(json!({
                "isSufficient": true, "knowledgeGap": "", "followUpQueries": []
            })
            .to_string()),
            prompts::REFLECTION_PROMPT => Ok(json!({
                "isSufficient": false,
                "knowledgeGap": "compensation data",
                "followUpQueries": ["backend salary ranges"]
            })
            .to_string()),
            prompts::FINAL_ANSWER_PROMPT => Ok("Employers expect Go and Kubernetes.".to_string()),
            prompts::ANALYZE_CATEGORY_PROMPT => {
                if let Some(cat) = &script.failing_category {
                    if user.contains(&format!("({})", cat)) {
                        return Err(AgentError::Service("scoring unavailable".into()));
                    }
                }
                Ok(r#"{"score": 80, "strengths": ["Relevant stack"], "weaknesses": ["Few metrics"], "suggestions": ["Quantify impact"]}"#.to_string())
            }
            prompts::REWRITE_SECTION_PROMPT => {
                let (key, section) = section_of(user)
                    .ok_or_else(|| AgentError::Validation("unreadable section".into()))?;
                if script.failing_section.as_deref() == Some(key.as_str()) {
                    return Err(AgentError::Service(format!("rewrite of {} refused", key)));
                }
                if rewrites.fetch_add(1, Ordering::SeqCst) < script.rewrite_failures {
                    return Err(AgentError::Service("overloaded".into()));
                }
                Ok(json!({ "content": rewritten(section) }).to_string())
            }
            _ => Err(AgentError::Validation("unexpected prompt".into())),
        }
    })
}

pub fn services(script: Script) -> Services {
    Services::new(Arc::new(scripted_llm(script)), Arc::new(MockSearch::echo()))
}

pub fn resume() -> Value {
    json!({
        "info": {"name": "Ada Lovelace", "title": "Backend Engineer"},
        "sections": {
            "summary": "Backend engineer building APIs.",
            "experience": [
                {"id": "e1", "company": "Acme", "role": "Engineer", "details": "Built Go services on Kubernetes"}
            ],
            "skills": "Go, Docker, PostgreSQL"
        },
        "sectionOrder": [
            {"key": "summary", "title": "Summary"},
            {"key": "experience", "title": "Experience"},
            {"key": "skills", "title": "Skills"}
        ]
    })
}

pub fn experience_resume() -> Value {
    json!({
        "info": {"name": "Ada Lovelace"},
        "sections": {
            "experience": [
                {"id": "e1", "company": "Acme", "details": "Ran payment services"}
            ]
        },
        "sectionOrder": [{"key": "experience", "title": "Experience"}]
    })
}

/// Seed with zero delays so tests run fast.
pub fn seed(jd: &str, resume: Value) -> Value {
    json!({
        "jd": jd,
        "resume": resume,
        "config": {"analysisDelayMs": 0, "retryBaseDelayMs": 0}
    })
}

/// Research-phase output, as the analyze phase expects it.
pub fn analyzed_seed(resume: Value) -> Value {
    let mut s = seed("Senior Backend Engineer, Go, Kubernetes", resume);
    s["jdAnalysis"] = json!({
        "keySkills": ["Go", "Kubernetes"],
        "responsibilities": ["Build backend services"],
        "qualifications": []
    });
    s["analysisReport"] = json!({"webSearchResults": "Employers expect Go and Kubernetes."});
    s
}

pub async fn collect(runner: &PhaseRunner, phase: Phase, seed: Value, services: Services) -> Vec<Frame> {
    runner
        .stream(phase, seed, services)
        .expect("phase starts")
        .collect()
        .await
}

pub fn accumulate(seed: Value, frames: &[Frame]) -> StateAccumulator {
    let mut acc = StateAccumulator::from_seed(seed).expect("seed is an object");
    for f in frames {
        acc.merge(f);
    }
    acc
}

pub fn node_ids(frames: &[Frame]) -> Vec<&str> {
    frames.iter().map(|f| f.node_id.as_str()).collect()
}
