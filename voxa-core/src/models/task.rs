use serde::{Deserialize, Serialize};

/// Status given to a task when it is first added to a story.
pub const INITIAL_TASK_STATUS: &str = "todo";
/// Progress given to a task when it is first added to a story.
pub const INITIAL_TASK_PROGRESS: &str = "0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub story_id: i64,
    pub title: String,
    pub description: String,
    /// Free-form; the store does not constrain the vocabulary.
    pub status: String,
    /// Free-form; usually a percentage but stored as text.
    pub progress: String,
}

/// One row of the append-only assignment log. A task may be assigned many times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskAssignment {
    pub id: i64,
    pub task_id: i64,
    pub assignee: String,
}
