//! Workflow state: channel map, reducers and partial updates.
//!
//! Every node reads a [`WorkflowState`] snapshot and returns a [`StateUpdate`]; the
//! compiled graph folds the update into the state through each channel's [`Reducer`].

mod channel;
mod workflow_state;

pub use channel::{Channel, Reducer};
pub use workflow_state::{StateUpdate, WorkflowState};

/// Channel names shared by the node library, the phase graphs and the progress log.
pub mod keys {
    pub const JD: &str = "jd";
    pub const RESUME: &str = "resume";
    pub const RESUME_TEXT: &str = "resumeText";
    pub const JD_ANALYSIS: &str = "jdAnalysis";
    pub const RESEARCH_TOPIC: &str = "research_topic";
    pub const QUERIES: &str = "queries";
    pub const SUMMARIES: &str = "summaries";
    pub const KNOWLEDGE_GAP: &str = "knowledge_gap";
    pub const RESEARCH_LOOP_COUNT: &str = "research_loop_count";
    pub const IS_SUFFICIENT: &str = "is_sufficient";
    pub const ANALYSIS_TASKS: &str = "analysisTasks";
    pub const CURRENT_ANALYSIS_TASK: &str = "currentAnalysisTask";
    pub const PARALLEL_ANALYSIS_RESULTS: &str = "parallelAnalysisResults";
    pub const ANALYSIS_REPORT: &str = "analysisReport";
    pub const REWRITE_TASKS: &str = "rewriteTasks";
    pub const CURRENT_TASK: &str = "currentTask";
    pub const OPTIMIZED_SECTIONS: &str = "optimizedSections";
    pub const OPTIMIZED_RESUME: &str = "optimizedResume";
    pub const ERROR: &str = "error";
    pub const TASK_COMPLETED: &str = "taskCompleted";
    pub const CONFIG: &str = "config";
}
