use rusqlite::{params, OptionalExtension, Row};

use super::{Database, REPORT_TIMEOUT, ROW_TIMEOUT};
use crate::error::Result;
use crate::models::{Task, TaskAssignment, INITIAL_TASK_PROGRESS, INITIAL_TASK_STATUS};

pub(super) const TASK_COLUMNS: &str = "id, story_id, title, description, status, progress";

pub(super) fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        story_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        status: row.get(4)?,
        progress: row.get(5)?,
    })
}

fn assignment_from_row(row: &Row<'_>) -> rusqlite::Result<TaskAssignment> {
    Ok(TaskAssignment {
        id: row.get(0)?,
        task_id: row.get(1)?,
        assignee: row.get(2)?,
    })
}

impl Database {
    /// Add a task to a story. The story must exist.
    pub fn add_task(&self, story_id: i64, title: &str, description: &str) -> Result<Task> {
        let id = self.run("add task", REPORT_TIMEOUT, |conn| {
            conn.execute(
                "INSERT INTO tasks (story_id, title, description, status, progress)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    story_id,
                    title,
                    description,
                    INITIAL_TASK_STATUS,
                    INITIAL_TASK_PROGRESS
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })?;
        tracing::info!(task_id = id, story_id, "added task");

        Ok(Task {
            id,
            story_id,
            title: title.to_string(),
            description: description.to_string(),
            status: INITIAL_TASK_STATUS.to_string(),
            progress: INITIAL_TASK_PROGRESS.to_string(),
        })
    }

    pub fn get_task(&self, task_id: i64) -> Result<Option<Task>> {
        self.run("get task", ROW_TIMEOUT, |conn| {
            conn.query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                params![task_id],
                task_from_row,
            )
            .optional()
        })
    }

    /// Tasks under one story, oldest first.
    pub fn list_tasks(&self, story_id: i64) -> Result<Vec<Task>> {
        self.run("list tasks", ROW_TIMEOUT, |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TASK_COLUMNS} FROM tasks WHERE story_id = ?1 ORDER BY id"
            ))?;
            let rows = stmt.query_map(params![story_id], task_from_row)?;
            rows.collect()
        })
    }

    pub fn assign_task(&self, task_id: i64, assignee: &str) -> Result<TaskAssignment> {
        let id = self.run("assign task", ROW_TIMEOUT, |conn| {
            conn.execute(
                "INSERT INTO task_assignments (task_id, assignee) VALUES (?1, ?2)",
                params![task_id, assignee],
            )?;
            Ok(conn.last_insert_rowid())
        })?;
        tracing::info!(task_id, assignee, "assigned task");

        Ok(TaskAssignment {
            id,
            task_id,
            assignee: assignee.to_string(),
        })
    }

    /// Assignment log for a task, in the order it was written.
    pub fn assignments_for_task(&self, task_id: i64) -> Result<Vec<TaskAssignment>> {
        self.run("list assignments", ROW_TIMEOUT, |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, task_id, assignee FROM task_assignments WHERE task_id = ?1 ORDER BY id",
            )?;
            let rows = stmt.query_map(params![task_id], assignment_from_row)?;
            rows.collect()
        })
    }

    /// Returns `false` if no task has that id.
    pub fn update_task_status(&self, task_id: i64, status: &str) -> Result<bool> {
        let changed = self.run("update task status", ROW_TIMEOUT, |conn| {
            conn.execute(
                "UPDATE tasks SET status = ?1 WHERE id = ?2",
                params![status, task_id],
            )
        })?;
        Ok(changed > 0)
    }

    /// Returns `false` if no task has that id.
    pub fn update_task_progress(&self, task_id: i64, progress: &str) -> Result<bool> {
        let changed = self.run("update task progress", ROW_TIMEOUT, |conn| {
            conn.execute(
                "UPDATE tasks SET progress = ?1 WHERE id = ?2",
                params![progress, task_id],
            )
        })?;
        Ok(changed > 0)
    }

    /// Hard-delete a task. Its assignments, comments and sprint memberships go with it.
    pub fn complete_task(&self, task_id: i64) -> Result<bool> {
        let deleted = self.run("complete task", ROW_TIMEOUT, |conn| {
            conn.execute("DELETE FROM tasks WHERE id = ?1", params![task_id])
        })?;
        if deleted > 0 {
            tracing::info!(task_id, "completed task");
        }
        Ok(deleted > 0)
    }
}
