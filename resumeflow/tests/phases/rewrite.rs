//! Rewrite phase: per-section retries, fatal exhaustion and the final overlay.

use resumeflow::{Phase, PhaseRunner};
use serde_json::{json, Value};

use crate::common::{accumulate, analyzed_seed, collect, node_ids, resume, services, Script};

fn summary_only_resume() -> Value {
    json!({
        "sections": {"summary": "Backend engineer building APIs."},
        "sectionOrder": [{"key": "summary"}]
    })
}

#[tokio::test]
async fn two_failures_then_success_emit_one_rewrite_frame() {
    let runner = PhaseRunner::new().unwrap();
    let script = Script {
        rewrite_failures: 2,
        ..Script::default()
    };
    let seed = analyzed_seed(summary_only_resume());
    let frames = collect(&runner, Phase::Rewrite, seed, services(script)).await;

    assert_eq!(
        node_ids(&frames),
        vec![
            "prepare_rewriter",
            "route_next_section",
            "rewrite_section",
            "route_next_section",
            "combine_sections"
        ]
    );
    assert_eq!(frames[2].get("taskCompleted"), Some(&json!("summary")));
    assert!(frames.iter().all(|f| f.error().is_none()));
    assert_eq!(
        frames[4].get("optimizedResume").unwrap()["sections"]["summary"],
        json!("Optimized: Backend engineer building APIs.")
    );
}

#[tokio::test]
async fn exhausted_retries_emit_error_and_keep_earlier_sections() {
    let runner = PhaseRunner::new().unwrap();
    let script = Script {
        failing_section: Some("experience".into()),
        ..Script::default()
    };
    let seed = analyzed_seed(resume());
    let frames = collect(&runner, Phase::Rewrite, seed.clone(), services(script)).await;

    let last = frames.last().unwrap();
    assert_eq!(last.node_id, "rewrite_section");
    let error = last.error().unwrap();
    assert!(error.contains("experience"), "{}", error);
    assert!(!node_ids(&frames).contains(&"combine_sections"));

    let acc = accumulate(seed, &frames);
    assert_eq!(
        acc.get("optimizedSections"),
        Some(&json!({"summary": "Optimized: Backend engineer building APIs."}))
    );
    assert!(acc.get("optimizedResume").is_none());
}

#[tokio::test]
async fn excluded_and_disabled_sections_are_not_rewritten() {
    let runner = PhaseRunner::new().unwrap();
    let mut resume = resume();
    resume["sectionOrder"][2]["enabled"] = json!(false);
    let mut seed = analyzed_seed(resume);
    seed["config"]["excludeSections"] = json!(["summary"]);
    let frames = collect(&runner, Phase::Rewrite, seed, services(Script::default())).await;

    assert_eq!(frames[0].get("rewriteTasks"), Some(&json!(["experience"])));
    let rewritten: Vec<_> = frames
        .iter()
        .filter_map(|f| f.get("taskCompleted"))
        .collect();
    assert_eq!(rewritten, vec![&json!("experience")]);
    let out = frames.last().unwrap().get("optimizedResume").unwrap();
    assert_eq!(out["sections"]["summary"], json!("Backend engineer building APIs."));
}

/// **Scenario**: The largest maxRetries a caller can send is capped, so failing
/// attempts are retried and the phase still assembles the resume.
#[tokio::test]
async fn extreme_max_retries_still_completes() {
    let runner = PhaseRunner::new().unwrap();
    let script = Script {
        rewrite_failures: 3,
        ..Script::default()
    };
    let mut seed = analyzed_seed(summary_only_resume());
    seed["config"]["maxRetries"] = json!(u32::MAX);
    let frames = collect(&runner, Phase::Rewrite, seed, services(script)).await;

    assert!(frames.iter().all(|f| f.error().is_none()));
    assert_eq!(node_ids(&frames).last(), Some(&"combine_sections"));
    assert_eq!(
        frames.last().unwrap().get("optimizedResume").unwrap()["sections"]["summary"],
        json!("Optimized: Backend engineer building APIs.")
    );
}
