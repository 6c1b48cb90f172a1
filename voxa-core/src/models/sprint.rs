use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprint {
    pub id: i64,
    pub name: String,
    /// `None` while the sprint is running.
    pub end_date: Option<NaiveDate>,
}

impl Sprint {
    pub fn is_active(&self) -> bool {
        self.end_date.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SprintTask {
    pub sprint_id: i64,
    pub task_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VelocityRecord {
    pub id: i64,
    pub sprint_id: i64,
    /// Recorded verbatim as entered on the command line.
    pub velocity: String,
}
