//! Node execution error types.
//!
//! Returned by `Node::run` and by service clients (`LlmClient`, `SearchClient`).
//! The engine turns any node error into the `error` channel of that node's frame.

use thiserror::Error;

/// Node execution error.
///
/// The variant decides how the surrounding pipeline reacts: validation errors are
/// fatal, service errors are retried or degraded depending on the node.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Execution failed with a message (e.g. missing prerequisite channel).
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// Structured output did not match the expected shape.
    #[error("validation failed: {0}")]
    Validation(String),

    /// External generative or search service call failed.
    #[error("service call failed: {0}")]
    Service(String),

    /// A routing function returned a label with no mapped target.
    #[error("routing failed at node {node}: unknown label {label}")]
    Routing { node: String, label: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Display format of ExecutionFailed contains "execution failed" and the message.
    #[test]
    fn agent_error_display_execution_failed() {
        let err = AgentError::ExecutionFailed("msg".to_string());
        let s = err.to_string();
        assert!(
            s.contains("execution failed"),
            "Display should contain 'execution failed': {}",
            s
        );
        assert!(s.contains("msg"), "Display should contain message: {}", s);
    }

    /// **Scenario**: Routing error names both the node and the offending label.
    #[test]
    fn agent_error_display_routing() {
        let err = AgentError::Routing {
            node: "reflection".into(),
            label: "maybe".into(),
        };
        let s = err.to_string();
        assert!(s.contains("reflection"), "{}", s);
        assert!(s.contains("maybe"), "{}", s);
    }

    /// **Scenario**: Validation and Service variants keep distinct prefixes.
    #[test]
    fn agent_error_variants_have_distinct_prefixes() {
        assert!(AgentError::Validation("x".into())
            .to_string()
            .starts_with("validation failed"));
        assert!(AgentError::Service("x".into())
            .to_string()
            .starts_with("service call failed"));
    }
}
