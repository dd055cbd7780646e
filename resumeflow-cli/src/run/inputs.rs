//! Reading the job description and resume files and building the first seed.

use std::path::Path;

use serde_json::{json, Value};

use crate::config::{Error, RunConfig};

/// Job description text: the file's contents, trimmed. Empty files are rejected.
pub fn read_jd(path: &Path) -> Result<String, Error> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read job description {}: {}", path.display(), e))?;
    let text = text.trim();
    if text.is_empty() {
        return Err(format!("job description {} is empty", path.display()).into());
    }
    Ok(text.to_string())
}

/// Resume document: a JSON object with at least a `sections` object.
pub fn read_resume(path: &Path) -> Result<Value, Error> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read resume {}: {}", path.display(), e))?;
    let resume: Value = serde_json::from_str(&raw)
        .map_err(|e| format!("resume {} is not JSON: {}", path.display(), e))?;
    match resume.get("sections") {
        Some(Value::Object(_)) => Ok(resume),
        _ => Err(format!("resume {} needs a \"sections\" object", path.display()).into()),
    }
}

/// Seed of the research phase: `{jd, resume, config}`.
pub fn initial_seed(jd: String, resume: Value, config: &RunConfig) -> Result<Value, Error> {
    let phase_config = serde_json::to_value(config.to_phase_config())?;
    Ok(json!({ "jd": jd, "resume": resume, "config": phase_config }))
}
