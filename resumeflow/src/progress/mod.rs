//! Client-side progress log: a step tree folded from execution frames.
//!
//! [`ProgressLog::new`] lays out a phase's fixed steps; [`reduce`] folds one frame
//! into the tree. Analyze and rewrite each get a parent step whose children are
//! sized from the task list the preparing node announces.

mod content;
mod entry;

use serde_json::Value;

use crate::nodes::{category_title, names};
use crate::phases::Phase;
use crate::state::keys;
use crate::stream::Frame;

pub use entry::{LogEntry, StepStatus};

/// Parent step holding one child per analysis category.
pub const ANALYSIS_PARENT: &str = "analysis_parent";
/// Parent step holding one child per rewritten section.
pub const REWRITE_PARENT: &str = "rewrite_sections_parent";
/// Id of the single entry left by [`ErrorDisplay::ClearAll`].
pub const ERROR_ENTRY: &str = "error";

/// What a fatal frame does to the tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorDisplay {
    /// Mark the failing step `failed` with the message; keep everything else.
    #[default]
    Preserve,
    /// Replace the tree with one failed notification entry.
    ClearAll,
}

/// Progress tree for one phase call.
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressLog {
    phase: Phase,
    entries: Vec<LogEntry>,
    error_display: ErrorDisplay,
    error: Option<String>,
}

fn skeleton(phase: Phase) -> &'static [&'static str] {
    match phase {
        Phase::Research => &[
            names::PREPARER,
            names::JD_ANALYZER,
            names::PREPARE_RESEARCH,
            names::QUERY_WRITER,
            names::WEB_SEARCHER,
            names::REFLECTION,
            names::FINAL_ANSWER,
        ],
        Phase::Analyze => &[names::PREPARE_ANALYZER, names::COMBINER],
        Phase::Rewrite => &[names::PREPARE_REWRITER, names::COMBINE_SECTIONS],
    }
}

fn step_title(id: &str) -> &str {
    match id {
        names::PREPARER => "Preparing inputs",
        names::JD_ANALYZER => "Analyzing job description",
        names::PREPARE_RESEARCH => "Planning research",
        names::QUERY_WRITER => "Writing search queries",
        names::WEB_SEARCHER => "Searching the web",
        names::REFLECTION => "Reflecting on findings",
        names::FINAL_ANSWER => "Summarizing research",
        names::PREPARE_ANALYZER => "Preparing analysis",
        ANALYSIS_PARENT => "Analyzing resume",
        names::COMBINER => "Combining analysis",
        names::PREPARE_REWRITER => "Preparing rewrite",
        REWRITE_PARENT => "Rewriting sections",
        names::COMBINE_SECTIONS => "Assembling optimized resume",
        other => other,
    }
}

/// Dynamic group driven by a queue: parent id, child id prefix, task channels.
struct Group {
    parent: &'static str,
    prefix: &'static str,
    tasks: &'static str,
    current: &'static str,
}

const ANALYSIS_GROUP: Group = Group {
    parent: ANALYSIS_PARENT,
    prefix: "analyze_",
    tasks: keys::ANALYSIS_TASKS,
    current: keys::CURRENT_ANALYSIS_TASK,
};

const REWRITE_GROUP: Group = Group {
    parent: REWRITE_PARENT,
    prefix: "rewrite_",
    tasks: keys::REWRITE_TASKS,
    current: keys::CURRENT_TASK,
};

/// Folds one frame into the log. Pure: the input log is consumed, a new one returned.
pub fn reduce(mut log: ProgressLog, frame: &Frame) -> ProgressLog {
    log.apply(frame);
    log
}

impl ProgressLog {
    /// Skeleton for `phase`: first step in progress, the rest pending.
    pub fn new(phase: Phase) -> Self {
        let entries = skeleton(phase)
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let status = if i == 0 {
                    StepStatus::InProgress
                } else {
                    StepStatus::Pending
                };
                LogEntry::new(*id, step_title(id), status)
            })
            .collect();
        Self {
            phase,
            entries,
            error_display: ErrorDisplay::default(),
            error: None,
        }
    }

    pub fn with_error_display(mut self, display: ErrorDisplay) -> Self {
        self.error_display = display;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// First failure message seen, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Finds an entry by id at any depth.
    pub fn find(&self, id: &str) -> Option<&LogEntry> {
        self.entries.iter().find_map(|e| e.find(id))
    }

    /// True once every top-level step finished and no failure was folded in.
    pub fn is_complete(&self) -> bool {
        self.error.is_none() && self.entries.iter().all(|e| e.status.is_terminal())
    }

    /// Folds one frame in place. Unknown node ids are ignored.
    pub fn apply(&mut self, frame: &Frame) {
        if let Some(message) = frame.error() {
            self.fail(frame, message.to_string());
            return;
        }
        if self.error.is_some() && self.error_display == ErrorDisplay::ClearAll {
            return;
        }

        let node = frame.node_id.as_str();
        match node {
            names::ROUTE_NEXT_ANALYSIS => self.start_child(&ANALYSIS_GROUP, frame),
            names::ROUTE_NEXT_SECTION => self.start_child(&REWRITE_GROUP, frame),
            names::ANALYZE_CATEGORY => self.finish_child(&ANALYSIS_GROUP, frame),
            names::REWRITE_SECTION => self.finish_child(&REWRITE_GROUP, frame),
            _ => {
                let Some(index) = self.index_of(node) else {
                    return;
                };
                if let Some(text) = content::for_step(node, frame) {
                    self.entries[index].content = Some(text);
                }
                self.entries[index].advance(StepStatus::Completed);
                match node {
                    names::PREPARE_ANALYZER => self.splice_group(index, &ANALYSIS_GROUP, frame),
                    names::PREPARE_REWRITER => self.splice_group(index, &REWRITE_GROUP, frame),
                    _ => self.start_after(index),
                }
            }
        }
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    fn start_after(&mut self, index: usize) {
        if let Some(next) = self.entries.get_mut(index + 1) {
            next.advance(StepStatus::InProgress);
        }
    }

    fn splice_group(&mut self, index: usize, group: &Group, frame: &Frame) {
        if self.index_of(group.parent).is_some() {
            return;
        }
        let tasks: Vec<String> = frame
            .get(group.tasks)
            .and_then(Value::as_array)
            .map(|a| a.iter().filter_map(Value::as_str).map(String::from).collect())
            .unwrap_or_default();
        let children: Vec<LogEntry> = tasks
            .iter()
            .map(|task| {
                let title = if group.parent == ANALYSIS_PARENT {
                    category_title(task)
                } else {
                    task.as_str()
                };
                LogEntry::new(format!("{}{}", group.prefix, task), title, StepStatus::Pending)
            })
            .collect();

        let mut parent = LogEntry::new(group.parent, step_title(group.parent), StepStatus::InProgress);
        let empty = children.is_empty();
        parent.children = Some(children);
        self.entries.insert(index + 1, parent);
        if empty {
            self.entries[index + 1].advance(StepStatus::Completed);
            self.start_after(index + 1);
        }
    }

    fn start_child(&mut self, group: &Group, frame: &Frame) {
        let Some(task) = frame.get(group.current).and_then(Value::as_str) else {
            return;
        };
        let child_id = format!("{}{}", group.prefix, task);
        if let Some(child) = self.child_mut(group.parent, &child_id) {
            child.advance(StepStatus::InProgress);
        }
    }

    fn finish_child(&mut self, group: &Group, frame: &Frame) {
        let Some(task) = frame.get(keys::TASK_COMPLETED).and_then(Value::as_str) else {
            return;
        };
        let Some(parent_index) = self.index_of(group.parent) else {
            return;
        };
        let child_id = format!("{}{}", group.prefix, task);
        let text = content::for_child(frame, task);

        let parent = &mut self.entries[parent_index];
        let Some(children) = parent.children.as_mut() else {
            return;
        };
        let Some(pos) = children.iter().position(|c| c.id == child_id) else {
            return;
        };
        children[pos].advance(StepStatus::Completed);
        if text.is_some() {
            children[pos].content = text;
        }
        if let Some(next) = children.get_mut(pos + 1) {
            next.advance(StepStatus::InProgress);
        }
        if children.iter().all(|c| c.status == StepStatus::Completed) {
            parent.advance(StepStatus::Completed);
            self.start_after(parent_index);
        }
    }

    fn child_mut(&mut self, parent: &str, child: &str) -> Option<&mut LogEntry> {
        self.entries
            .iter_mut()
            .find(|e| e.id == parent)?
            .children
            .as_mut()?
            .iter_mut()
            .find(|c| c.id == child)
    }

    fn fail(&mut self, frame: &Frame, message: String) {
        if self.error.is_none() {
            self.error = Some(message.clone());
        }
        if self.error_display == ErrorDisplay::ClearAll {
            let mut entry = LogEntry::new(ERROR_ENTRY, "Optimization failed", StepStatus::Failed);
            entry.content = Some(message);
            self.entries = vec![entry];
            return;
        }

        let node = frame.node_id.as_str();
        let group = match node {
            names::ROUTE_NEXT_ANALYSIS | names::ANALYZE_CATEGORY => Some(&ANALYSIS_GROUP),
            names::ROUTE_NEXT_SECTION | names::REWRITE_SECTION => Some(&REWRITE_GROUP),
            _ => None,
        };

        if let Some(group) = group {
            if let Some(parent_index) = self.index_of(group.parent) {
                self.settle_running(parent_index);
                let parent = &mut self.entries[parent_index];
                if let Some(child) = parent
                    .children
                    .iter_mut()
                    .flatten()
                    .find(|c| c.status == StepStatus::InProgress)
                {
                    child.fail(message.clone());
                }
                parent.fail(message);
                return;
            }
        }

        let target = self
            .index_of(node)
            .or_else(|| self.entries.iter().position(|e| e.status == StepStatus::InProgress));
        if let Some(index) = target {
            self.settle_running(index);
            self.entries[index].fail(message);
        }
    }

    /// Returns every running top-level step except `failed` to pending; the run is over.
    fn settle_running(&mut self, failed: usize) {
        for (i, entry) in self.entries.iter_mut().enumerate() {
            if i != failed && entry.status == StepStatus::InProgress {
                entry.status = StepStatus::Pending;
            }
        }
    }
}
