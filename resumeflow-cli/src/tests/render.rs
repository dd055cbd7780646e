//! Tests for the progress log rendering.

use resumeflow::{Frame, Phase, ProgressLog};
use serde_json::{json, Value};

use crate::render::{render_line, render_log};

fn frame(node: &str, partial: Value) -> Frame {
    match partial {
        Value::Object(m) => Frame::new(node, m),
        _ => unreachable!(),
    }
}

/// **Scenario**: A fresh log shows the first step running and the rest pending.
#[test]
fn fresh_log_marks_first_step_running() {
    let text = render_log(&ProgressLog::new(Phase::Research));
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "research");
    assert_eq!(lines[1], "  [~] Preparing inputs");
    assert!(lines[2].starts_with("  [ ] "), "{}", text);
}

/// **Scenario**: Completed steps show their content; a failure adds the error line.
#[test]
fn completed_and_failed_steps_render() {
    let mut log = ProgressLog::new(Phase::Research);
    log.apply(&frame("preparer", json!({"resumeText": "abc"})));
    log.apply(&frame("jd_analyzer", json!({"error": "bad json"})));
    let text = render_log(&log);
    assert!(text.contains("  [x] Preparing inputs\n      Resume text: 3 characters"), "{}", text);
    assert!(text.contains("[!] Analyzing job description"), "{}", text);
    assert!(text.ends_with("  error: bad json\n"), "{}", text);
    assert_eq!(
        render_line(log.find("preparer").unwrap()),
        "[x] Preparing inputs"
    );
}
