//! Plain-text rendering of the progress log.

use resumeflow::{LogEntry, ProgressLog, StepStatus};

fn marker(status: StepStatus) -> &'static str {
    match status {
        StepStatus::Pending => "[ ]",
        StepStatus::InProgress => "[~]",
        StepStatus::Completed => "[x]",
        StepStatus::Failed => "[!]",
    }
}

/// One line per entry, children indented under their group; content on the
/// following line. A captured error closes the block.
pub fn render_log(log: &ProgressLog) -> String {
    let mut out = format!("{}\n", log.phase());
    for entry in log.entries() {
        render_entry(entry, 1, &mut out);
    }
    if let Some(error) = log.error() {
        out.push_str(&format!("  error: {}\n", error));
    }
    out
}

fn render_entry(entry: &LogEntry, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    out.push_str(&format!("{}{} {}\n", indent, marker(entry.status), entry.title));
    if let Some(content) = entry.content.as_deref().filter(|c| !c.is_empty()) {
        for line in content.lines() {
            out.push_str(&format!("{}    {}\n", indent, line));
        }
    }
    for child in entry.children.iter().flatten() {
        render_entry(child, depth + 1, out);
    }
}

/// Status line for one entry, printed as frames arrive.
pub fn render_line(entry: &LogEntry) -> String {
    format!("{} {}", marker(entry.status), entry.title)
}
