use std::process::ExitCode;

use serde::Serialize;
use voxa_core::models::{Comment, Sprint, Task, UserStory};

use crate::dispatch::Output;
use crate::error::{Result, VoxaError};

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    for line in table_lines(headers, rows) {
        println!("{line}");
    }
}

/// Widths count characters, not bytes.
fn table_lines(headers: &[&str], rows: Vec<Vec<String>>) -> Vec<String> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let line = |cells: Vec<String>| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let w = widths.get(i).copied().unwrap_or(0);
                format!("{:width$}", cell, width = w)
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![
        line(headers.iter().map(|h| h.to_string()).collect()),
        line(widths.iter().map(|&w| "-".repeat(w)).collect()),
    ];
    lines.extend(rows.into_iter().map(line));
    lines
}

fn story_rows(stories: &[UserStory]) -> Vec<Vec<String>> {
    stories
        .iter()
        .map(|s| vec![s.id.to_string(), s.title.clone(), s.description.clone()])
        .collect()
}

fn task_rows(tasks: &[Task]) -> Vec<Vec<String>> {
    tasks
        .iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                t.story_id.to_string(),
                t.title.clone(),
                t.status.clone(),
                t.progress.clone(),
            ]
        })
        .collect()
}

fn sprint_rows(sprints: &[Sprint]) -> Vec<Vec<String>> {
    sprints
        .iter()
        .map(|s| {
            let end = s
                .end_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "active".to_string());
            vec![s.id.to_string(), s.name.clone(), end]
        })
        .collect()
}

fn comment_rows(comments: &[Comment]) -> Vec<Vec<String>> {
    comments
        .iter()
        .map(|c| {
            vec![
                c.id.to_string(),
                c.task_id.to_string(),
                c.user.clone(),
                c.comment_text.clone(),
            ]
        })
        .collect()
}

const STORY_HEADERS: &[&str] = &["ID", "TITLE", "DESCRIPTION"];
const TASK_HEADERS: &[&str] = &["ID", "STORY", "TITLE", "STATUS", "PROGRESS"];
const SPRINT_HEADERS: &[&str] = &["ID", "NAME", "END DATE"];
const COMMENT_HEADERS: &[&str] = &["ID", "TASK", "USER", "COMMENT"];

pub fn render(output: &Output) -> anyhow::Result<()> {
    match output {
        Output::Message(message) => println!("{message}"),
        Output::Response(response) => {
            println!("HTTP Status: {}", response.status);
            print_json(&response.body)?;
        }
        Output::Stories(stories) => print_table(STORY_HEADERS, story_rows(stories)),
        Output::Story { story, tasks } => {
            print_table(STORY_HEADERS, story_rows(std::slice::from_ref(story)));
            if !tasks.is_empty() {
                println!();
                print_table(TASK_HEADERS, task_rows(tasks));
            }
        }
        Output::TaskDetail {
            task,
            assignments,
            comments,
        } => {
            print_table(TASK_HEADERS, task_rows(std::slice::from_ref(task)));
            println!("\nDescription: {}", task.description);
            let assignees: Vec<&str> = assignments.iter().map(|a| a.assignee.as_str()).collect();
            if !assignees.is_empty() {
                println!("Assigned to: {}", assignees.join(", "));
            }
            if !comments.is_empty() {
                println!();
                print_table(COMMENT_HEADERS, comment_rows(comments));
            }
        }
        Output::SprintDetail {
            sprint,
            tasks,
            velocity,
        } => {
            print_table(SPRINT_HEADERS, sprint_rows(std::slice::from_ref(sprint)));
            if !velocity.is_empty() {
                let values: Vec<&str> = velocity.iter().map(|v| v.velocity.as_str()).collect();
                println!("\nVelocity: {}", values.join(", "));
            }
            println!();
            print_table(TASK_HEADERS, task_rows(tasks));
        }
        Output::Report(report) => {
            println!("User stories:");
            print_table(STORY_HEADERS, story_rows(&report.stories));
            println!("\nTasks:");
            print_table(TASK_HEADERS, task_rows(&report.tasks));
            println!("\nSprints:");
            print_table(SPRINT_HEADERS, sprint_rows(&report.sprints));
            println!("\nComments:");
            print_table(COMMENT_HEADERS, comment_rows(&report.comments));
        }
        Output::Dataset(records) => print_json(records)?,
        Output::Plan(steps) => {
            for (i, step) in steps.iter().enumerate() {
                println!("{:>2}. {step}", i + 1);
            }
        }
    }
    Ok(())
}

/// Print an error with everything needed to diagnose it without re-running.
pub fn report_error(err: &VoxaError) {
    eprintln!("Error: {err}");
    if let VoxaError::RequestFailed { status, body, .. } = err {
        if let Some(status) = status {
            eprintln!("HTTP Status: {status}");
        }
        if let Some(body) = body {
            let body = serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string());
            eprintln!("Response Data: {body}");
        }
    }
}

/// Render the result of a command and pick the process exit code.
///
/// Every failure, from any command, exits non-zero.
pub fn finish(result: Result<Output>) -> ExitCode {
    match result {
        Ok(output) => match render(&output) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("Error: {err:#}");
                ExitCode::FAILURE
            }
        },
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}
