//! Resume document and structured analysis types read and written by the nodes.
//!
//! The resume itself belongs to the caller; these types only read the parts the
//! pipeline needs (`info`, keyed `sections`, ordered `sectionOrder`) and keep any
//! other fields intact through `flatten`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Resume document as sent by the caller.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
    #[serde(default)]
    pub info: Value,
    #[serde(default)]
    pub sections: Map<String, Value>,
    #[serde(default)]
    pub section_order: Vec<SectionRef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of `sectionOrder`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionRef {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Resume {
    /// Section keys in display order: `sectionOrder` first, then any section the
    /// order does not mention (alphabetically).
    pub fn ordered_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        for entry in &self.section_order {
            if !keys.contains(&entry.key) {
                keys.push(entry.key.clone());
            }
        }
        for key in self.sections.keys() {
            if !keys.contains(key) {
                keys.push(key.clone());
            }
        }
        keys
    }

    pub fn title_of<'a>(&'a self, key: &'a str) -> &'a str {
        self.section_order
            .iter()
            .find(|e| e.key == key)
            .and_then(|e| e.title.as_deref())
            .unwrap_or(key)
    }

    /// Plain-text rendering used as model input (`resumeText`).
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        if !self.info.is_null() {
            flatten_into(&self.info, 0, &mut out);
        }
        for key in self.ordered_keys() {
            let Some(section) = self.sections.get(&key) else {
                continue;
            };
            if is_empty_section(section) {
                continue;
            }
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str("## ");
            out.push_str(self.title_of(&key));
            out.push('\n');
            flatten_into(section, 0, &mut out);
        }
        out.trim_end().to_string()
    }
}

/// `null`, blank string, empty array and empty object count as empty.
pub fn is_empty_section(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn flatten_into(value: &Value, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    match value {
        Value::Null => {}
        Value::String(s) => {
            let text = strip_tags(s);
            if !text.is_empty() {
                out.push_str(&indent);
                out.push_str(&text);
                out.push('\n');
            }
        }
        Value::Bool(_) | Value::Number(_) => {
            out.push_str(&indent);
            out.push_str(&value.to_string());
            out.push('\n');
        }
        Value::Array(items) => {
            for item in items {
                flatten_into(item, depth, out);
            }
        }
        Value::Object(map) => {
            for (k, v) in map {
                if k == "id" || k == "visible" {
                    continue;
                }
                match v {
                    Value::String(s) => {
                        let text = strip_tags(s);
                        if !text.is_empty() {
                            out.push_str(&format!("{}{}: {}\n", indent, k, text));
                        }
                    }
                    Value::Array(_) | Value::Object(_) => flatten_into(v, depth + 1, out),
                    Value::Null => {}
                    other => out.push_str(&format!("{}{}: {}\n", indent, k, other)),
                }
            }
        }
    }
}

/// Drops `<...>` markup that rich-text editors leave in resume fields.
fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                out.push(' ');
            }
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Structured extraction of a job description. Every field is required.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JdAnalysis {
    pub key_skills: Vec<String>,
    pub responsibilities: Vec<String>,
    pub qualifications: Vec<String>,
}

/// Model answer for one analysis category.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScore {
    pub score: f64,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// One entry of `parallelAnalysisResults`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResult {
    pub category: String,
    /// 0–100.
    pub score: u32,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    /// Set when the category degraded to a placeholder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CategoryResult {
    pub fn from_score(category: impl Into<String>, score: CategoryScore) -> Self {
        Self {
            category: category.into(),
            score: score.score.clamp(0.0, 100.0).round() as u32,
            strengths: score.strengths,
            weaknesses: score.weaknesses,
            suggestions: score.suggestions,
            error: None,
        }
    }

    /// Zero-score entry for a category whose analysis failed.
    pub fn placeholder(category: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            score: 0,
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            suggestions: Vec::new(),
            error: Some(error.into()),
        }
    }
}
