//! Research phase: JD extraction, the search/reflection loop and its exits.

use resumeflow::{Phase, PhaseRunner, ProgressLog, StepStatus};
use serde_json::{json, Value};

use crate::common::{accumulate, collect, node_ids, resume, seed, services, Script};

const JD: &str = "Senior Backend Engineer, Go, Kubernetes";

#[tokio::test]
async fn sufficient_first_reflection_searches_once_then_answers() {
    let runner = PhaseRunner::new().unwrap();
    let script = Script {
        sufficient: true,
        ..Script::default()
    };
    let frames = collect(&runner, Phase::Research, seed(JD, resume()), services(script)).await;

    assert_eq!(
        node_ids(&frames),
        vec![
            "preparer",
            "jd_analyzer",
            "prepare_research",
            "query_writer",
            "web_searcher",
            "reflection",
            "final_answer"
        ]
    );
    assert!(frames.iter().all(|f| f.error().is_none()));

    let acc = accumulate(seed(JD, resume()), &frames);
    assert_eq!(acc.get("summaries").and_then(Value::as_array).map(Vec::len), Some(2));
    assert_eq!(acc.get("research_loop_count"), Some(&json!(1)));
    assert_eq!(
        acc.get("analysisReport"),
        Some(&json!({"webSearchResults": "Employers expect Go and Kubernetes."}))
    );
}

#[tokio::test]
async fn insufficient_reflection_loops_until_the_cap() {
    let runner = PhaseRunner::new().unwrap();
    let mut s = seed(JD, resume());
    s["config"]["maxResearchLoops"] = json!(2);
    let frames = collect(&runner, Phase::Research, s.clone(), services(Script::default())).await;

    let ids = node_ids(&frames);
    assert_eq!(ids.iter().filter(|id| **id == "web_searcher").count(), 2);
    assert_eq!(ids.iter().filter(|id| **id == "reflection").count(), 2);
    assert_eq!(ids.last(), Some(&"final_answer"));

    let acc = accumulate(s, &frames);
    assert_eq!(acc.get("research_loop_count"), Some(&json!(2)));
    // two first-pass queries plus one follow-up
    assert_eq!(acc.get("summaries").and_then(Value::as_array).map(Vec::len), Some(3));
    assert_eq!(acc.get("knowledge_gap"), Some(&json!("compensation data")));
}

#[tokio::test]
async fn malformed_jd_analysis_halts_with_error_frame() {
    let runner = PhaseRunner::new().unwrap();
    let script = Script {
        jd_invalid: true,
        ..Script::default()
    };
    let frames = collect(&runner, Phase::Research, seed(JD, resume()), services(script)).await;

    assert_eq!(node_ids(&frames), vec!["preparer", "jd_analyzer"]);
    assert!(frames[1].error().unwrap().contains("validation failed"));
}

#[tokio::test]
async fn missing_jd_fails_in_preparer() {
    let runner = PhaseRunner::new().unwrap();
    let frames = collect(
        &runner,
        Phase::Research,
        json!({"resume": resume()}),
        services(Script::default()),
    )
    .await;
    assert_eq!(node_ids(&frames), vec!["preparer"]);
    assert!(frames[0].error().is_some());
}

#[tokio::test]
async fn progress_log_completes_for_research() {
    let runner = PhaseRunner::new().unwrap();
    let script = Script {
        sufficient: true,
        ..Script::default()
    };
    let frames = collect(&runner, Phase::Research, seed(JD, resume()), services(script)).await;
    let log = frames
        .iter()
        .fold(ProgressLog::new(Phase::Research), resumeflow::progress::reduce);
    assert!(log.is_complete());
    assert_eq!(log.find("reflection").unwrap().status, StepStatus::Completed);
    assert!(log
        .find("jd_analyzer")
        .and_then(|e| e.content.as_deref())
        .unwrap()
        .contains("Go, Kubernetes"));
}
