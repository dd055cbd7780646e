use serde::{Deserialize, Serialize};

/// Step status. Moves forward only: pending, in progress, then completed or failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl StepStatus {
    fn rank(self) -> u8 {
        match self {
            StepStatus::Pending => 0,
            StepStatus::InProgress => 1,
            StepStatus::Completed | StepStatus::Failed => 2,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.rank() == 2
    }
}

/// One node of the progress tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub title: String,
    pub status: StepStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<LogEntry>>,
}

impl LogEntry {
    pub fn new(id: impl Into<String>, title: impl Into<String>, status: StepStatus) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            status,
            content: None,
            children: None,
        }
    }

    /// Moves to `status` unless that would regress; terminal states are final.
    pub fn advance(&mut self, status: StepStatus) {
        if status.rank() > self.status.rank() {
            self.status = status;
        }
    }

    /// Marks the entry failed with `message`. Unlike [`advance`](Self::advance) this
    /// overrides `Completed`: a looped step can fail on a later pass.
    pub fn fail(&mut self, message: String) {
        self.status = StepStatus::Failed;
        self.content = Some(message);
    }

    pub fn find(&self, id: &str) -> Option<&LogEntry> {
        if self.id == id {
            return Some(self);
        }
        self.children
            .as_ref()
            .and_then(|c| c.iter().find_map(|e| e.find(id)))
    }
}
