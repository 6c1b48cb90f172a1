use chrono::{Local, NaiveDate};
use rusqlite::{params, OptionalExtension, Row};

use super::tasks::task_from_row;
use super::{Database, ROW_TIMEOUT};
use crate::error::Result;
use crate::models::{Sprint, SprintTask, Task, VelocityRecord};

pub(super) const SPRINT_COLUMNS: &str = "id, name, end_date";

pub(super) fn sprint_from_row(row: &Row<'_>) -> rusqlite::Result<Sprint> {
    Ok(Sprint {
        id: row.get(0)?,
        name: row.get(1)?,
        end_date: row.get(2)?,
    })
}

impl Database {
    pub fn start_sprint(&self, name: &str) -> Result<Sprint> {
        let id = self.run("start sprint", ROW_TIMEOUT, |conn| {
            conn.execute("INSERT INTO sprints (name) VALUES (?1)", params![name])?;
            Ok(conn.last_insert_rowid())
        })?;
        tracing::info!(sprint_id = id, name, "started sprint");

        Ok(Sprint {
            id,
            name: name.to_string(),
            end_date: None,
        })
    }

    pub fn get_sprint(&self, sprint_id: i64) -> Result<Option<Sprint>> {
        self.run("get sprint", ROW_TIMEOUT, |conn| {
            conn.query_row(
                &format!("SELECT {SPRINT_COLUMNS} FROM sprints WHERE id = ?1"),
                params![sprint_id],
                sprint_from_row,
            )
            .optional()
        })
    }

    pub fn add_to_sprint(&self, task_id: i64, sprint_id: i64) -> Result<SprintTask> {
        self.run("add to sprint", ROW_TIMEOUT, |conn| {
            conn.execute(
                "INSERT INTO sprint_tasks (sprint_id, task_id) VALUES (?1, ?2)",
                params![sprint_id, task_id],
            )
        })?;
        tracing::info!(task_id, sprint_id, "added task to sprint");

        Ok(SprintTask { sprint_id, task_id })
    }

    pub fn tasks_in_sprint(&self, sprint_id: i64) -> Result<Vec<Task>> {
        self.run("list sprint tasks", ROW_TIMEOUT, |conn| {
            let mut stmt = conn.prepare(
                "SELECT t.id, t.story_id, t.title, t.description, t.status, t.progress
                 FROM tasks t
                 JOIN sprint_tasks st ON st.task_id = t.id
                 WHERE st.sprint_id = ?1
                 ORDER BY t.id",
            )?;
            let rows = stmt.query_map(params![sprint_id], task_from_row)?;
            rows.collect()
        })
    }

    /// Close a sprint as of today. Returns the recorded end date, or `None`
    /// if no sprint has that id.
    pub fn end_sprint(&self, sprint_id: i64) -> Result<Option<NaiveDate>> {
        self.end_sprint_on(sprint_id, Local::now().date_naive())
    }

    pub fn end_sprint_on(&self, sprint_id: i64, date: NaiveDate) -> Result<Option<NaiveDate>> {
        let changed = self.run("end sprint", ROW_TIMEOUT, |conn| {
            conn.execute(
                "UPDATE sprints SET end_date = ?1 WHERE id = ?2",
                params![date, sprint_id],
            )
        })?;
        if changed == 0 {
            return Ok(None);
        }
        tracing::info!(sprint_id, %date, "ended sprint");
        Ok(Some(date))
    }

    pub fn track_velocity(&self, sprint_id: i64, velocity: &str) -> Result<VelocityRecord> {
        let id = self.run("track velocity", ROW_TIMEOUT, |conn| {
            conn.execute(
                "INSERT INTO velocity_records (sprint_id, velocity) VALUES (?1, ?2)",
                params![sprint_id, velocity],
            )?;
            Ok(conn.last_insert_rowid())
        })?;
        tracing::info!(sprint_id, velocity, "tracked velocity");

        Ok(VelocityRecord {
            id,
            sprint_id,
            velocity: velocity.to_string(),
        })
    }

    pub fn velocity_for_sprint(&self, sprint_id: i64) -> Result<Vec<VelocityRecord>> {
        self.run("list velocity", ROW_TIMEOUT, |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, sprint_id, velocity FROM velocity_records
                 WHERE sprint_id = ?1 ORDER BY id",
            )?;
            let rows = stmt.query_map(params![sprint_id], |row| {
                Ok(VelocityRecord {
                    id: row.get(0)?,
                    sprint_id: row.get(1)?,
                    velocity: row.get(2)?,
                })
            })?;
            rows.collect()
        })
    }
}
