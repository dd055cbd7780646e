//! Research → Analyze → Rewrite through `run_pipeline` with the in-process source.

use std::collections::BTreeSet;
use std::sync::Arc;

use resumeflow::{run_pipeline, LocalSource, Phase, PhaseRunner};
use serde_json::Value;

use crate::common::{experience_resume, resume, seed, services, Script};

fn section_keys(resume: &Value) -> BTreeSet<String> {
    resume["sections"]
        .as_object()
        .map(|s| s.keys().cloned().collect())
        .unwrap_or_default()
}

fn sufficient() -> Script {
    Script {
        sufficient: true,
        ..Script::default()
    }
}

#[tokio::test]
async fn full_run_keeps_every_section_key() {
    let runner = Arc::new(PhaseRunner::new().unwrap());
    let source = LocalSource::new(runner, services(sufficient()));
    let start = seed("Senior Backend Engineer, Go, Kubernetes", resume());

    let mut per_phase = Vec::new();
    let outcome = run_pipeline(&source, start.clone(), |phase, _frame, _log| per_phase.push(phase))
        .await
        .unwrap();

    assert!(outcome.error().is_none());
    assert_eq!(outcome.phases.len(), 3);
    assert!(outcome.phases.iter().all(|p| p.log.is_complete()));
    assert!(per_phase.contains(&Phase::Analyze));

    let optimized = outcome.optimized_resume().unwrap();
    assert_eq!(section_keys(optimized), section_keys(&start["resume"]));
    assert_eq!(optimized["info"], start["resume"]["info"]);
}

#[tokio::test]
async fn go_kubernetes_experience_scenario() {
    let runner = Arc::new(PhaseRunner::new().unwrap());
    let source = LocalSource::new(runner, services(sufficient()));
    let start = seed("Senior Backend Engineer, Go, Kubernetes", experience_resume());

    let mut rewrite_frames = Vec::new();
    let outcome = run_pipeline(&source, start, |phase, frame, _log| {
        if phase == Phase::Rewrite && frame.node_id == "rewrite_section" {
            rewrite_frames.push(frame.clone());
        }
    })
    .await
    .unwrap();

    let research = &outcome.phases[0].state;
    let skills: Vec<&str> = research["jdAnalysis"]["keySkills"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert!(skills.contains(&"Go") || skills.contains(&"Kubernetes"));

    assert_eq!(rewrite_frames.len(), 1);
    assert_eq!(
        rewrite_frames[0].get("taskCompleted"),
        Some(&Value::String("experience".into()))
    );
}

#[tokio::test]
async fn pipeline_stops_after_failing_phase() {
    let runner = Arc::new(PhaseRunner::new().unwrap());
    let script = Script {
        jd_invalid: true,
        ..Script::default()
    };
    let source = LocalSource::new(runner, services(script));
    let outcome = run_pipeline(&source, seed("Go developer", resume()), |_, _, _| {})
        .await
        .unwrap();

    assert_eq!(outcome.phases.len(), 1);
    let (phase, message) = outcome.error().unwrap();
    assert_eq!(phase, Phase::Research);
    assert!(message.contains("validation failed"));
    assert!(outcome.optimized_resume().is_none());
}
