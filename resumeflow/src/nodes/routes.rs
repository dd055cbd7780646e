//! Routing functions for the conditional edges of the phase graphs.
//!
//! Routers only read state; every loop's exit condition is decided here.

use serde_json::Value;

use crate::config::PhaseConfig;
use crate::state::{keys, WorkflowState};

/// Label taking the loop-back branch.
pub const CONTINUE: &str = "continue";
/// Label leaving the loop.
pub const END: &str = "end";

/// After `reflection`: leave the research loop when reflection reported the
/// summaries sufficient, proposed no follow-up queries, or the configured
/// `maxResearchLoops` passes have run.
pub fn after_reflection(state: &WorkflowState) -> String {
    let sufficient = state
        .get(keys::IS_SUFFICIENT)
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let pending = state
        .get(keys::QUERIES)
        .and_then(Value::as_array)
        .map(|q| !q.is_empty())
        .unwrap_or(false);
    let loops = state
        .get(keys::RESEARCH_LOOP_COUNT)
        .and_then(Value::as_u64)
        .unwrap_or(0);
    let max_loops = PhaseConfig::from_state(state)
        .map(|c| c.max_research_loops)
        .unwrap_or(crate::config::DEFAULT_MAX_RESEARCH_LOOPS);

    if sufficient || !pending || loops >= u64::from(max_loops) {
        END.to_string()
    } else {
        CONTINUE.to_string()
    }
}

/// After a queue router: continue while it popped a task into `current_key`.
pub fn while_current(current_key: &'static str) -> impl Fn(&WorkflowState) -> String + Send + Sync {
    move |state| {
        if state.present(current_key).is_some() {
            CONTINUE.to_string()
        } else {
            END.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state(v: Value) -> WorkflowState {
        WorkflowState::from_value(v).unwrap()
    }

    /// **Scenario**: Insufficient with pending queries under the cap loops back.
    #[test]
    fn reflection_continues_when_gap_remains() {
        let s = state(json!({"is_sufficient": false, "queries": ["q"], "research_loop_count": 1}));
        assert_eq!(after_reflection(&s), CONTINUE);
    }

    /// **Scenario**: Sufficient, no follow-ups, or the cap each end the loop.
    #[test]
    fn reflection_ends_on_any_exit_condition() {
        let s = state(json!({"is_sufficient": true, "queries": ["q"], "research_loop_count": 1}));
        assert_eq!(after_reflection(&s), END);
        let s = state(json!({"is_sufficient": false, "queries": [], "research_loop_count": 1}));
        assert_eq!(after_reflection(&s), END);
        let s = state(json!({"is_sufficient": false, "queries": ["q"], "research_loop_count": 3}));
        assert_eq!(after_reflection(&s), END);
    }

    /// **Scenario**: The cap comes from config.maxResearchLoops.
    #[test]
    fn reflection_cap_is_configurable() {
        let s = state(json!({
            "is_sufficient": false,
            "queries": ["q"],
            "research_loop_count": 3,
            "config": {"maxResearchLoops": 5}
        }));
        assert_eq!(after_reflection(&s), CONTINUE);
    }

    /// **Scenario**: while_current continues only on a non-null current task.
    #[test]
    fn while_current_follows_current_task() {
        let route = while_current(keys::CURRENT_TASK);
        assert_eq!(route(&state(json!({"currentTask": "experience"}))), CONTINUE);
        assert_eq!(route(&state(json!({"currentTask": null}))), END);
        assert_eq!(route(&state(json!({}))), END);
    }
}
