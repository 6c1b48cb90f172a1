use rusqlite::{params, Row};

use super::{Database, REPORT_TIMEOUT, ROW_TIMEOUT};
use crate::error::Result;
use crate::models::Comment;

pub(super) const COMMENT_COLUMNS: &str = "id, task_id, user, comment_text";

pub(super) fn comment_from_row(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get(0)?,
        task_id: row.get(1)?,
        user: row.get(2)?,
        comment_text: row.get(3)?,
    })
}

impl Database {
    pub fn add_comment(&self, task_id: i64, user: &str, comment_text: &str) -> Result<Comment> {
        let id = self.run("add comment", REPORT_TIMEOUT, |conn| {
            conn.execute(
                "INSERT INTO comments (task_id, user, comment_text) VALUES (?1, ?2, ?3)",
                params![task_id, user, comment_text],
            )?;
            Ok(conn.last_insert_rowid())
        })?;
        tracing::info!(task_id, comment_id = id, "added comment");

        Ok(Comment {
            id,
            task_id,
            user: user.to_string(),
            comment_text: comment_text.to_string(),
        })
    }

    pub fn comments_for_task(&self, task_id: i64) -> Result<Vec<Comment>> {
        self.run("list comments", ROW_TIMEOUT, |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COMMENT_COLUMNS} FROM comments WHERE task_id = ?1 ORDER BY id"
            ))?;
            let rows = stmt.query_map(params![task_id], comment_from_row)?;
            rows.collect()
        })
    }
}
