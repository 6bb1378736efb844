//! Task values and the task queue.

mod queue;

pub use queue::{TaskQueue, TaskQueueState};

use serde::{Deserialize, Serialize};

/// A unit of work.
///
/// Tasks are plain values: an update produces a new `Task` that replaces
/// the old one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Task {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// A copy of this task with the patch's fields laid over it.
    pub fn merged(&self, patch: &TaskPatch) -> Task {
        Task {
            name: patch.name.clone().unwrap_or_else(|| self.name.clone()),
            description: patch
                .description
                .clone()
                .unwrap_or_else(|| self.description.clone()),
        }
    }
}

/// Partial update for a queued task. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl TaskPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            description: None,
        }
    }

    pub fn description(description: impl Into<String>) -> Self {
        Self {
            name: None,
            description: Some(description.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_unpatched_fields() {
        let task = Task::new("write", "draft chapter");
        let merged = task.merged(&TaskPatch::name("edit"));
        assert_eq!(merged, Task::new("edit", "draft chapter"));
        assert_eq!(task.merged(&TaskPatch::default()), task);
    }

    #[test]
    fn description_defaults_when_missing() {
        let task: Task = serde_json::from_str(r#"{"name":"read"}"#).unwrap();
        assert_eq!(task, Task::new("read", ""));
    }
}
