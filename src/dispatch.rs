//! Maps one parsed command to one domain operation.
//!
//! The dispatcher owns every collaborator a command might need. They are
//! handed in at construction so tests can swap any of them; nothing is global.

use std::fs;

use serde_json::Value;
use voxa_core::db::{Database, DbConfig};
use voxa_core::models::{
    Comment, DevReport, Sprint, Task, TaskAssignment, UserStory, VelocityRecord,
};

use crate::cli::Commands;
use crate::config::ConfigStore;
use crate::error::{Result, VoxaError};
use crate::http::{HttpExecutor, HttpResponse};
use crate::prompt::{Prompter, TerminalPrompter};
use crate::provision::{self, Provisioner, ShellProvisioner};
use crate::seed::{self, RandomGenerator, Schema, ValueGenerator};

/// What a successful command hands back for display.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Message(String),
    Response(HttpResponse),
    Stories(Vec<UserStory>),
    Story {
        story: UserStory,
        tasks: Vec<Task>,
    },
    TaskDetail {
        task: Task,
        assignments: Vec<TaskAssignment>,
        comments: Vec<Comment>,
    },
    SprintDetail {
        sprint: Sprint,
        tasks: Vec<Task>,
        velocity: Vec<VelocityRecord>,
    },
    Report(DevReport),
    Dataset(Vec<Value>),
    Plan(Vec<String>),
}

pub struct Dispatcher {
    config_store: ConfigStore,
    executor: HttpExecutor,
    db_config: DbConfig,
    database: Option<Database>,
    prompter: Option<Box<dyn Prompter>>,
    provisioner: Box<dyn Provisioner>,
    generator: Box<dyn ValueGenerator>,
}

impl Dispatcher {
    /// The database is opened from `db_config` only when a tracking command runs.
    pub fn new(config_store: ConfigStore, db_config: DbConfig) -> Self {
        Self {
            config_store,
            executor: HttpExecutor::new(),
            db_config,
            database: None,
            prompter: None,
            provisioner: Box::new(ShellProvisioner),
            generator: Box::new(RandomGenerator::from_entropy()),
        }
    }

    pub fn with_database(mut self, database: Database) -> Self {
        self.database = Some(database);
        self
    }

    pub fn with_prompter(mut self, prompter: impl Prompter + 'static) -> Self {
        self.prompter = Some(Box::new(prompter));
        self
    }

    pub fn with_provisioner(mut self, provisioner: impl Provisioner + 'static) -> Self {
        self.provisioner = Box::new(provisioner);
        self
    }

    pub fn with_generator(mut self, generator: impl ValueGenerator + 'static) -> Self {
        self.generator = Box::new(generator);
        self
    }

    fn database(&mut self) -> Result<&Database> {
        let database = match self.database.take() {
            Some(database) => database,
            None => {
                let database = Database::connect(&self.db_config)?;
                database.migrate()?;
                database
            }
        };
        Ok(self.database.insert(database))
    }

    pub async fn dispatch(&mut self, command: Commands) -> Result<Output> {
        tracing::debug!(?command, "dispatching");

        match command {
            Commands::Init { yes } => {
                let answers = if yes {
                    None
                } else {
                    Some(match self.prompter.as_mut() {
                        Some(prompter) => prompter.init_answers()?,
                        None => TerminalPrompter::stdio().init_answers()?,
                    })
                };
                self.config_store.initialize(answers)?;
                Ok(Output::Message(format!(
                    "Initialization complete. Configuration saved to {}.",
                    self.config_store.path().display()
                )))
            }
            Commands::Get { route, base_url } => {
                let config = self.config_store.load()?;
                let response = self
                    .executor
                    .get(&config, &route, base_url.as_deref())
                    .await?;
                Ok(Output::Response(response))
            }
            Commands::Post { route, data } => {
                let payload: Value = serde_json::from_str(&data)
                    .map_err(|e| VoxaError::validation(format!("--data is not valid JSON: {e}")))?;
                let config = self.config_store.load()?;
                let response = self.executor.post(&config, &route, &payload).await?;
                Ok(Output::Response(response))
            }
            Commands::CreateStory { title, description } => {
                let story = self.database()?.create_story(&title, &description)?;
                Ok(Output::Message(format!("User story {} created.", story.id)))
            }
            Commands::AddTask {
                story_id,
                title,
                description,
            } => {
                let task = self.database()?.add_task(story_id, &title, &description)?;
                Ok(Output::Message(format!(
                    "Task {} added to story {}.",
                    task.id, story_id
                )))
            }
            Commands::ListStories => Ok(Output::Stories(self.database()?.list_stories()?)),
            Commands::ViewStory { story_id } => {
                let db = self.database()?;
                let story = db.view_story(story_id)?.ok_or(VoxaError::NotFound {
                    entity: "story",
                    id: story_id,
                })?;
                Ok(Output::Story {
                    story,
                    tasks: db.list_tasks(story_id)?,
                })
            }
            Commands::ViewTask { task_id } => {
                let db = self.database()?;
                let task = db.get_task(task_id)?.ok_or(VoxaError::NotFound {
                    entity: "task",
                    id: task_id,
                })?;
                Ok(Output::TaskDetail {
                    task,
                    assignments: db.assignments_for_task(task_id)?,
                    comments: db.comments_for_task(task_id)?,
                })
            }
            Commands::AssignTask { task_id, assignee } => {
                self.database()?.assign_task(task_id, &assignee)?;
                Ok(Output::Message(format!(
                    "Task {task_id} assigned to {assignee}."
                )))
            }
            Commands::UpdateTaskStatus { task_id, status } => {
                let updated = self.database()?.update_task_status(task_id, &status)?;
                found(updated, "task", task_id)?;
                Ok(Output::Message(format!(
                    "Task {task_id} status set to {status}."
                )))
            }
            Commands::UpdateTaskProgress { task_id, progress } => {
                let updated = self.database()?.update_task_progress(task_id, &progress)?;
                found(updated, "task", task_id)?;
                Ok(Output::Message(format!(
                    "Task {task_id} progress set to {progress}."
                )))
            }
            Commands::CompleteTask { task_id } => {
                let deleted = self.database()?.complete_task(task_id)?;
                found(deleted, "task", task_id)?;
                Ok(Output::Message(format!("Task {task_id} completed.")))
            }
            Commands::StartSprint { sprint_name } => {
                let sprint = self.database()?.start_sprint(&sprint_name)?;
                Ok(Output::Message(format!(
                    "Sprint {} '{}' started.",
                    sprint.id, sprint.name
                )))
            }
            Commands::AddToSprint { task_id, sprint_id } => {
                self.database()?.add_to_sprint(task_id, sprint_id)?;
                Ok(Output::Message(format!(
                    "Task {task_id} added to sprint {sprint_id}."
                )))
            }
            Commands::EndSprint { sprint_id } => {
                let date = self
                    .database()?
                    .end_sprint(sprint_id)?
                    .ok_or(VoxaError::NotFound {
                        entity: "sprint",
                        id: sprint_id,
                    })?;
                Ok(Output::Message(format!(
                    "Sprint {sprint_id} ended on {date}."
                )))
            }
            Commands::ViewSprint { sprint_id } => {
                let db = self.database()?;
                let sprint = db.get_sprint(sprint_id)?.ok_or(VoxaError::NotFound {
                    entity: "sprint",
                    id: sprint_id,
                })?;
                Ok(Output::SprintDetail {
                    sprint,
                    tasks: db.tasks_in_sprint(sprint_id)?,
                    velocity: db.velocity_for_sprint(sprint_id)?,
                })
            }
            Commands::Comment {
                task_id,
                user,
                comment_text,
            } => {
                self.database()?.add_comment(task_id, &user, &comment_text)?;
                Ok(Output::Message(format!("Comment added to task {task_id}.")))
            }
            Commands::TrackVelocity {
                sprint_id,
                velocity,
            } => {
                self.database()?.track_velocity(sprint_id, &velocity)?;
                Ok(Output::Message(format!(
                    "Velocity {velocity} recorded for sprint {sprint_id}."
                )))
            }
            Commands::DevReport => Ok(Output::Report(self.database()?.dev_report()?)),
            Commands::Seed {
                count,
                schema,
                output,
            } => {
                let schema = match schema {
                    Some(path) => Schema::load(&path)?,
                    None => Schema::default(),
                };
                let records = seed::generate(&schema, count, self.generator.as_mut());

                match output {
                    Some(path) => {
                        let json = serde_json::to_string_pretty(&records).map_err(|e| {
                            VoxaError::validation(format!("cannot encode dataset: {e}"))
                        })?;
                        fs::write(&path, json)?;
                        Ok(Output::Message(format!(
                            "Generated {count} records in {}.",
                            path.display()
                        )))
                    }
                    None => Ok(Output::Dataset(records)),
                }
            }
            Commands::Setup {
                profile,
                dir,
                dry_run,
            } => {
                if dry_run {
                    let steps = provision::plan(profile, &dir);
                    return Ok(Output::Plan(steps.iter().map(ToString::to_string).collect()));
                }
                let report = self
                    .provisioner
                    .provision(profile, &dir)
                    .map_err(VoxaError::Provision)?;
                Ok(Output::Message(format!(
                    "{} environment ready in {} ({} steps).",
                    report.profile,
                    report.directory.display(),
                    report.steps_run
                )))
            }
        }
    }
}

/// Turn a "no row matched" answer from the repository into an error.
fn found(matched: bool, entity: &'static str, id: i64) -> Result<()> {
    if matched {
        Ok(())
    } else {
        Err(VoxaError::NotFound { entity, id })
    }
}
