use rusqlite::{params, OptionalExtension, Row};

use super::{Database, ROW_TIMEOUT};
use crate::error::Result;
use crate::models::UserStory;

pub(super) const STORY_COLUMNS: &str = "id, title, description";

pub(super) fn story_from_row(row: &Row<'_>) -> rusqlite::Result<UserStory> {
    Ok(UserStory {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
    })
}

impl Database {
    pub fn create_story(&self, title: &str, description: &str) -> Result<UserStory> {
        let id = self.run("create story", ROW_TIMEOUT, |conn| {
            conn.execute(
                "INSERT INTO user_stories (title, description) VALUES (?1, ?2)",
                params![title, description],
            )?;
            Ok(conn.last_insert_rowid())
        })?;
        tracing::info!(story_id = id, "created user story");

        Ok(UserStory {
            id,
            title: title.to_string(),
            description: description.to_string(),
        })
    }

    /// Every story, oldest first.
    pub fn list_stories(&self) -> Result<Vec<UserStory>> {
        self.run("list stories", ROW_TIMEOUT, |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {STORY_COLUMNS} FROM user_stories ORDER BY id"))?;
            let rows = stmt.query_map([], story_from_row)?;
            rows.collect()
        })
    }

    pub fn view_story(&self, story_id: i64) -> Result<Option<UserStory>> {
        self.run("view story", ROW_TIMEOUT, |conn| {
            conn.query_row(
                &format!("SELECT {STORY_COLUMNS} FROM user_stories WHERE id = ?1"),
                params![story_id],
                story_from_row,
            )
            .optional()
        })
    }
}
