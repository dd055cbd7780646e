//! Parsing of JSON answers from a chat model.

use serde::de::DeserializeOwned;

use crate::error::AgentError;

/// Parses a model answer as JSON of shape `T`.
///
/// Accepts a bare JSON document or one wrapped in a ```` ``` ```` / ```` ```json ````
/// fence, with surrounding prose. Any mismatch is `AgentError::Validation`.
pub fn parse_json_response<T: DeserializeOwned>(text: &str) -> Result<T, AgentError> {
    let body = extract_json(text)
        .ok_or_else(|| AgentError::Validation("response contains no JSON document".into()))?;
    serde_json::from_str(body).map_err(|e| AgentError::Validation(format!("unexpected shape: {}", e)))
}

fn extract_json(text: &str) -> Option<&str> {
    let text = strip_fence(text.trim());
    let start = text.find(['{', '['])?;
    let close = if text[start..].starts_with('{') { '}' } else { ']' };
    let end = text.rfind(close)?;
    (end >= start).then(|| &text[start..=end])
}

fn strip_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    rest.rfind("```").map(|i| &rest[..i]).unwrap_or(rest).trim()
}
