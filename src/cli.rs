use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::provision::Profile;

/// voxa - HTTP client configuration and sprint tracking
#[derive(Parser, Debug)]
#[command(name = "voxa")]
#[command(about = "Persisted HTTP client settings, ad-hoc requests and sprint tracking")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Initialize the CLI by setting up configuration
    Init {
        /// Skip interactive prompts and write the defaults
        #[arg(short, long)]
        yes: bool,
    },

    /// Send an HTTP GET request
    Get {
        /// Path appended verbatim to the base URL
        route: String,

        /// Base URL for this request only
        #[arg(short, long = "baseUrl", alias = "base-url")]
        base_url: Option<String>,
    },

    /// Send an HTTP POST request
    Post {
        /// Path appended verbatim to the base URL
        route: String,

        /// JSON request body
        #[arg(short, long, default_value = "{}")]
        data: String,
    },

    /// Create a user story
    CreateStory { title: String, description: String },

    /// Add a task to a user story
    AddTask {
        story_id: i64,
        title: String,
        description: String,
    },

    /// List all user stories
    ListStories,

    /// Show one user story
    ViewStory { story_id: i64 },

    /// Show one task with its assignments and comments
    ViewTask { task_id: i64 },

    /// Assign a task to someone
    AssignTask { task_id: i64, assignee: String },

    /// Set the status of a task
    UpdateTaskStatus { task_id: i64, status: String },

    /// Set the progress of a task
    UpdateTaskProgress { task_id: i64, progress: String },

    /// Complete (delete) a task
    CompleteTask { task_id: i64 },

    /// Start a new sprint
    StartSprint { sprint_name: String },

    /// Add a task to a sprint
    AddToSprint { task_id: i64, sprint_id: i64 },

    /// End a sprint as of today
    EndSprint { sprint_id: i64 },

    /// Show one sprint with its tasks and velocity
    ViewSprint { sprint_id: i64 },

    /// Comment on a task
    Comment {
        task_id: i64,
        user: String,
        comment_text: String,
    },

    /// Record the velocity of a sprint
    TrackVelocity { sprint_id: i64, velocity: String },

    /// Show stories, tasks, sprints and comments
    DevReport,

    /// Generate a synthetic dataset
    Seed {
        /// Number of records to generate
        count: usize,

        /// JSON schema file: [{"name": ..., "type": ...}]
        #[arg(long)]
        schema: Option<PathBuf>,

        /// Write the dataset here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Scaffold a local development environment
    Setup {
        #[arg(value_enum)]
        profile: Profile,

        /// Directory to scaffold into
        #[arg(long, default_value = ".")]
        dir: PathBuf,

        /// Print the steps without running them
        #[arg(long)]
        dry_run: bool,
    },
}
