use serde::{Deserialize, Serialize};

use super::{Comment, Sprint, Task, UserStory};

/// Snapshot of everything a developer needs for a stand-up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevReport {
    pub stories: Vec<UserStory>,
    pub tasks: Vec<Task>,
    pub sprints: Vec<Sprint>,
    pub comments: Vec<Comment>,
}

impl DevReport {
    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
            && self.tasks.is_empty()
            && self.sprints.is_empty()
            && self.comments.is_empty()
    }
}
