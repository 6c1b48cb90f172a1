use rusqlite::{Connection, Row};

use super::comments::{comment_from_row, COMMENT_COLUMNS};
use super::sprints::{sprint_from_row, SPRINT_COLUMNS};
use super::stories::{story_from_row, STORY_COLUMNS};
use super::tasks::{task_from_row, TASK_COLUMNS};
use super::{Database, REPORT_TIMEOUT};
use crate::error::Result;
use crate::models::DevReport;

fn select_all<T>(
    conn: &Connection,
    columns: &str,
    table: &str,
    map: fn(&Row<'_>) -> rusqlite::Result<T>,
) -> rusqlite::Result<Vec<T>> {
    let mut stmt = conn.prepare(&format!("SELECT {columns} FROM {table} ORDER BY id"))?;
    let rows = stmt.query_map([], map)?;
    rows.collect()
}

impl Database {
    /// Stories, tasks, sprints and comments, each in id order, read under one deadline.
    pub fn dev_report(&self) -> Result<DevReport> {
        self.run("dev report", REPORT_TIMEOUT, |conn| {
            Ok(DevReport {
                stories: select_all(conn, STORY_COLUMNS, "user_stories", story_from_row)?,
                tasks: select_all(conn, TASK_COLUMNS, "tasks", task_from_row)?,
                sprints: select_all(conn, SPRINT_COLUMNS, "sprints", sprint_from_row)?,
                comments: select_all(conn, COMMENT_COLUMNS, "comments", comment_from_row)?,
            })
        })
    }
}
