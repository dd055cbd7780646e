//! Analyze phase: one scored result per category, combined into the report.

use resumeflow::nodes::PrepareAnalyzerNode;
use resumeflow::{Phase, PhaseRunner};
use serde_json::{json, Value};

use crate::common::{accumulate, analyzed_seed, collect, node_ids, resume, services, Script};

fn abc_runner() -> PhaseRunner {
    PhaseRunner::with_analyzer(PrepareAnalyzerNode::with_categories(["A", "B", "C"])).unwrap()
}

#[tokio::test]
async fn three_tasks_yield_three_frames_and_a_combined_report() {
    let runner = abc_runner();
    let frames = collect(&runner, Phase::Analyze, analyzed_seed(resume()), services(Script::default())).await;

    let completed: Vec<&str> = frames
        .iter()
        .filter(|f| f.node_id == "analyze_category")
        .filter_map(|f| f.get("taskCompleted").and_then(Value::as_str))
        .collect();
    assert_eq!(completed, vec!["A", "B", "C"]);
    assert_eq!(node_ids(&frames).last(), Some(&"combiner"));

    let report = frames
        .last()
        .and_then(|f| f.get("analysisReport"))
        .unwrap();
    let keys: Vec<&String> = report["detailedAnalysis"].as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["A", "B", "C"]);
    assert_eq!(report["overallScore"], json!(80));
    // research output survives the merge
    assert_eq!(
        report["webSearchResults"],
        json!("Employers expect Go and Kubernetes.")
    );
}

#[tokio::test]
async fn failing_category_degrades_without_stopping_the_phase() {
    let runner = abc_runner();
    let script = Script {
        failing_category: Some("B".into()),
        ..Script::default()
    };
    let frames = collect(&runner, Phase::Analyze, analyzed_seed(resume()), services(script)).await;

    assert!(frames.iter().all(|f| f.error().is_none()));
    let acc = accumulate(analyzed_seed(resume()), &frames);
    let report = acc.get("analysisReport").unwrap();
    assert_eq!(report["detailedAnalysis"]["B"]["score"], json!(0));
    assert!(report["detailedAnalysis"]["B"]["error"]
        .as_str()
        .unwrap()
        .contains("scoring unavailable"));
    assert_eq!(report["overallScore"], json!(53));
}

#[tokio::test]
async fn identical_runs_produce_identical_reports() {
    let runner = PhaseRunner::new().unwrap();
    let mut reports = Vec::new();
    for _ in 0..2 {
        let frames = collect(&runner, Phase::Analyze, analyzed_seed(resume()), services(Script::default())).await;
        let acc = accumulate(analyzed_seed(resume()), &frames);
        reports.push(serde_json::to_string(acc.get("analysisReport").unwrap()).unwrap());
    }
    assert_eq!(reports[0], reports[1]);
}

#[tokio::test]
async fn missing_jd_analysis_stops_at_prepare_analyzer() {
    let runner = PhaseRunner::new().unwrap();
    let mut seed = analyzed_seed(resume());
    seed.as_object_mut().unwrap().remove("jdAnalysis");
    let frames = collect(&runner, Phase::Analyze, seed, services(Script::default())).await;
    assert_eq!(node_ids(&frames), vec!["prepare_analyzer"]);
    assert!(frames[0].error().unwrap().contains("jdAnalysis"));
}
