mod common;

use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};

use serde_json::json;
use tempfile::TempDir;
use voxa::cli::Commands;
use voxa::config::{ClientConfig, ConfigStore, CONFIG_FILE, DEFAULT_BASE_URL};
use voxa::dispatch::{Dispatcher, Output};
use voxa::prompt::{InitAnswers, Prompter};
use voxa::provision::{Profile, ProvisionReport, Provisioner};
use voxa::seed::RandomGenerator;
use voxa::VoxaError;
use voxa_core::db::{Database, DbConfig};
use voxa_core::DbError;

use common::spawn_api;

struct ScriptedPrompter(InitAnswers);

impl Prompter for ScriptedPrompter {
    fn init_answers(&mut self) -> io::Result<InitAnswers> {
        Ok(self.0.clone())
    }
}

#[derive(Clone, Default)]
struct RecordingProvisioner {
    calls: Arc<Mutex<Vec<Profile>>>,
}

impl Provisioner for RecordingProvisioner {
    fn provision(&self, profile: Profile, dir: &Path) -> anyhow::Result<ProvisionReport> {
        self.calls.lock().unwrap().push(profile);
        Ok(ProvisionReport {
            profile,
            directory: dir.to_path_buf(),
            steps_run: 3,
        })
    }
}

struct FailingProvisioner;

impl Provisioner for FailingProvisioner {
    fn provision(&self, _profile: Profile, _dir: &Path) -> anyhow::Result<ProvisionReport> {
        anyhow::bail!("npm not found")
    }
}

struct Harness {
    dir: TempDir,
    dispatcher: Dispatcher,
}

impl Harness {
    fn new() -> Self {
        Self::with(|dispatcher| dispatcher)
    }

    /// Temp config dir and in-memory database, plus any extra collaborators.
    fn with(customize: impl FnOnce(Dispatcher) -> Dispatcher) -> Self {
        let dir = TempDir::new().unwrap();
        let db = Database::open_memory().unwrap();
        db.migrate().unwrap();
        let dispatcher = Dispatcher::new(
            ConfigStore::at(dir.path().join(CONFIG_FILE)),
            DbConfig::default(),
        )
        .with_database(db)
        .with_generator(RandomGenerator::seeded(11));
        Self {
            dir,
            dispatcher: customize(dispatcher),
        }
    }

    fn store(&self) -> ConfigStore {
        ConfigStore::at(self.dir.path().join(CONFIG_FILE))
    }

    async fn run(&mut self, command: Commands) -> voxa::Result<Output> {
        self.dispatcher.dispatch(command).await
    }

    async fn ok(&mut self, command: Commands) -> Output {
        self.run(command).await.expect("command should succeed")
    }
}

#[tokio::test]
async fn init_yes_writes_default_config() {
    let mut h = Harness::new();

    h.ok(Commands::Init { yes: true }).await;

    let config = h.store().load().unwrap();
    assert_eq!(config, ClientConfig::default());
    assert_eq!(config.base_url, DEFAULT_BASE_URL);
}

#[tokio::test]
async fn init_uses_prompt_answers() {
    let mut h = Harness::with(|dispatcher| {
        dispatcher.with_prompter(ScriptedPrompter(InitAnswers {
            base_url: Some("http://staging/api".into()),
            header: Some("X-Team:core".into()),
            api_key: Some("sk".into()),
        }))
    });

    h.ok(Commands::Init { yes: false }).await;

    let config = h.store().load().unwrap();
    assert_eq!(config.base_url, "http://staging/api");
    assert_eq!(config.headers, vec!["X-Team:core".to_string()]);
    assert_eq!(config.api_key.as_deref(), Some("sk"));
}

#[tokio::test]
async fn get_without_config_is_config_not_found() {
    let mut h = Harness::new();

    let err = h
        .run(Commands::Get {
            route: "/users".into(),
            base_url: Some("http://127.0.0.1:1".into()),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, VoxaError::ConfigNotFound { .. }));
}

#[tokio::test]
async fn get_uses_stored_base_url() {
    let base = spawn_api().await;
    let mut h = Harness::new();
    h.store()
        .write(&ClientConfig {
            base_url: base,
            ..Default::default()
        })
        .unwrap();

    let output = h
        .ok(Commands::Get {
            route: "/users".into(),
            base_url: None,
        })
        .await;

    match output {
        Output::Response(response) => assert_eq!(response.status, 200),
        other => panic!("expected a response, got {other:?}"),
    }
}

#[tokio::test]
async fn get_404_reports_status_and_body() {
    let base = spawn_api().await;
    let mut h = Harness::new();
    h.ok(Commands::Init { yes: true }).await;

    let err = h
        .run(Commands::Get {
            route: "/missing".into(),
            base_url: Some(base),
        })
        .await
        .unwrap_err();

    match &err {
        VoxaError::RequestFailed { status, body, .. } => {
            assert_eq!(*status, Some(404));
            assert_eq!(body.as_ref(), Some(&json!({ "error": "not found" })));
        }
        other => panic!("expected RequestFailed, got {other:?}"),
    }
    assert_eq!(
        voxa::output::finish(Err(err)),
        std::process::ExitCode::FAILURE
    );
}

#[tokio::test]
async fn post_rejects_invalid_json_before_loading_config() {
    let mut h = Harness::new();

    let err = h
        .run(Commands::Post {
            route: "/items".into(),
            data: "{not json".into(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, VoxaError::ValidationError(_)));
}

#[tokio::test]
async fn post_sends_payload_to_stored_base_url() {
    let base = spawn_api().await;
    let mut h = Harness::new();
    h.store()
        .write(&ClientConfig {
            base_url: base,
            ..Default::default()
        })
        .unwrap();

    let output = h
        .ok(Commands::Post {
            route: "/items".into(),
            data: r#"{"sku": 7}"#.into(),
        })
        .await;

    match output {
        Output::Response(response) => {
            assert_eq!(response.status, 201);
            assert_eq!(response.body, json!({ "received": { "sku": 7 } }));
        }
        other => panic!("expected a response, got {other:?}"),
    }
}

#[tokio::test]
async fn post_without_config_is_config_not_found() {
    let mut h = Harness::new();

    let err = h
        .run(Commands::Post {
            route: "/items".into(),
            data: r#"{"sku": 7}"#.into(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, VoxaError::ConfigNotFound { .. }));
}

#[tokio::test]
async fn post_sends_headers_exactly_as_stored() {
    let base = spawn_api().await;
    let mut h = Harness::new();
    h.store()
        .write(&ClientConfig {
            base_url: base,
            api_key: Some("sk-live".into()),
            headers: vec!["X-Team:checkout".into()],
        })
        .unwrap();

    let output = h
        .ok(Commands::Post {
            route: "/headers".into(),
            data: "{}".into(),
        })
        .await;

    match output {
        Output::Response(response) => {
            assert_eq!(response.body["team"], json!(["checkout"]));
            assert_eq!(response.body["authorization"], json!(["Bearer sk-live"]));
        }
        other => panic!("expected a response, got {other:?}"),
    }
}

#[tokio::test]
async fn story_and_task_lifecycle() {
    let mut h = Harness::new();

    h.ok(Commands::CreateStory {
        title: "Checkout".into(),
        description: "Pay for the cart".into(),
    })
    .await;
    h.ok(Commands::AddTask {
        story_id: 1,
        title: "T".into(),
        description: "D".into(),
    })
    .await;
    h.ok(Commands::UpdateTaskStatus {
        task_id: 1,
        status: "in-progress".into(),
    })
    .await;

    match h.ok(Commands::ViewTask { task_id: 1 }).await {
        Output::TaskDetail { task, .. } => {
            assert_eq!(task.status, "in-progress");
            assert_eq!(task.title, "T");
            assert_eq!(task.description, "D");
        }
        other => panic!("expected task detail, got {other:?}"),
    }

    h.ok(Commands::CompleteTask { task_id: 1 }).await;

    let err = h.run(Commands::ViewTask { task_id: 1 }).await.unwrap_err();
    assert!(matches!(err, VoxaError::NotFound { entity: "task", id: 1 }));
}

#[tokio::test]
async fn view_story_includes_its_tasks() {
    let mut h = Harness::new();
    for title in ["Checkout", "Search"] {
        h.ok(Commands::CreateStory {
            title: title.into(),
            description: "d".into(),
        })
        .await;
    }
    for (story_id, title) in [(1, "Cart"), (2, "Index"), (1, "Pay")] {
        h.ok(Commands::AddTask {
            story_id,
            title: title.into(),
            description: "d".into(),
        })
        .await;
    }

    match h.ok(Commands::ViewStory { story_id: 1 }).await {
        Output::Story { story, tasks } => {
            assert_eq!(story.title, "Checkout");
            let titles: Vec<_> = tasks.iter().map(|t| t.title.as_str()).collect();
            assert_eq!(titles, vec!["Cart", "Pay"]);
        }
        other => panic!("expected a story, got {other:?}"),
    }
}

#[tokio::test]
async fn list_stories_returns_every_story() {
    let mut h = Harness::new();
    for i in 0..3 {
        h.ok(Commands::CreateStory {
            title: format!("story {i}"),
            description: "d".into(),
        })
        .await;
    }

    match h.ok(Commands::ListStories).await {
        Output::Stories(stories) => assert_eq!(stories.len(), 3),
        other => panic!("expected stories, got {other:?}"),
    }
}

#[tokio::test]
async fn updates_to_unknown_rows_fail() {
    let mut h = Harness::new();

    for command in [
        Commands::UpdateTaskStatus {
            task_id: 40,
            status: "done".into(),
        },
        Commands::UpdateTaskProgress {
            task_id: 40,
            progress: "50".into(),
        },
        Commands::CompleteTask { task_id: 40 },
        Commands::EndSprint { sprint_id: 40 },
        Commands::ViewStory { story_id: 40 },
    ] {
        let err = h.run(command).await.unwrap_err();
        assert!(matches!(err, VoxaError::NotFound { id: 40, .. }));
    }
}

#[tokio::test]
async fn foreign_key_violations_are_query_failures() {
    let mut h = Harness::new();

    let err = h
        .run(Commands::AssignTask {
            task_id: 5,
            assignee: "ana".into(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, VoxaError::QueryFailed(DbError::Query { .. })));
}

#[tokio::test]
async fn sprint_flow() {
    let mut h = Harness::new();
    h.ok(Commands::CreateStory {
        title: "S".into(),
        description: "D".into(),
    })
    .await;
    h.ok(Commands::AddTask {
        story_id: 1,
        title: "T".into(),
        description: "D".into(),
    })
    .await;
    h.ok(Commands::StartSprint {
        sprint_name: "Sprint 1".into(),
    })
    .await;
    h.ok(Commands::AddToSprint {
        task_id: 1,
        sprint_id: 1,
    })
    .await;
    h.ok(Commands::TrackVelocity {
        sprint_id: 1,
        velocity: "13".into(),
    })
    .await;

    let today = chrono::Local::now().date_naive();
    match h.ok(Commands::EndSprint { sprint_id: 1 }).await {
        Output::Message(message) => assert!(message.contains(&today.to_string())),
        other => panic!("expected a message, got {other:?}"),
    }

    match h.ok(Commands::ViewSprint { sprint_id: 1 }).await {
        Output::SprintDetail {
            sprint,
            tasks,
            velocity,
        } => {
            assert_eq!(sprint.end_date, Some(today));
            assert_eq!(tasks.len(), 1);
            assert_eq!(velocity[0].velocity, "13");
        }
        other => panic!("expected sprint detail, got {other:?}"),
    }
}

#[tokio::test]
async fn dev_report_includes_comments() {
    let mut h = Harness::new();
    h.ok(Commands::CreateStory {
        title: "S".into(),
        description: "D".into(),
    })
    .await;
    h.ok(Commands::AddTask {
        story_id: 1,
        title: "T".into(),
        description: "D".into(),
    })
    .await;
    h.ok(Commands::StartSprint {
        sprint_name: "Sprint 1".into(),
    })
    .await;
    h.ok(Commands::Comment {
        task_id: 1,
        user: "ana".into(),
        comment_text: "ship it".into(),
    })
    .await;

    match h.ok(Commands::DevReport).await {
        Output::Report(report) => {
            assert_eq!(report.stories.len(), 1);
            assert_eq!(report.tasks.len(), 1);
            assert_eq!(report.sprints.len(), 1);
            assert_eq!(report.comments.len(), 1);
            assert_eq!(report.comments[0].comment_text, "ship it");
        }
        other => panic!("expected a report, got {other:?}"),
    }
}

#[tokio::test]
async fn tracking_commands_without_database_config_fail_at_first_query() {
    let dir = TempDir::new().unwrap();
    let mut dispatcher = Dispatcher::new(
        ConfigStore::at(dir.path().join(CONFIG_FILE)),
        DbConfig::default(),
    );

    dispatcher.dispatch(Commands::Init { yes: true }).await.unwrap();
    let err = dispatcher.dispatch(Commands::ListStories).await.unwrap_err();

    assert!(matches!(err, VoxaError::QueryFailed(DbError::NotConfigured)));
}

#[tokio::test]
async fn seed_writes_dataset_file() {
    let mut h = Harness::new();
    let path = h.dir.path().join("data.json");

    h.ok(Commands::Seed {
        count: 4,
        schema: None,
        output: Some(path.clone()),
    })
    .await;

    let records: Vec<serde_json::Value> =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(records.len(), 4);
    assert!(records[0].get("email").is_some());
}

#[tokio::test]
async fn seed_reads_custom_schema() {
    let mut h = Harness::new();
    let schema = h.dir.path().join("schema.json");
    std::fs::write(&schema, r#"[{"name": "word", "type": "word"}]"#).unwrap();

    match h
        .ok(Commands::Seed {
            count: 2,
            schema: Some(schema),
            output: None,
        })
        .await
    {
        Output::Dataset(records) => {
            assert_eq!(records.len(), 2);
            assert!(records[0]["word"].is_string());
            assert_eq!(records[0].as_object().unwrap().len(), 1);
        }
        other => panic!("expected a dataset, got {other:?}"),
    }
}

#[tokio::test]
async fn setup_dry_run_lists_steps_without_provisioning() {
    let provisioner = RecordingProvisioner::default();
    let mut h = Harness::with(|dispatcher| {
        dispatcher.with_provisioner(provisioner.clone())
    });

    match h
        .ok(Commands::Setup {
            profile: Profile::Flask,
            dir: "/tmp/flask-app".into(),
            dry_run: true,
        })
        .await
    {
        Output::Plan(steps) => {
            assert!(steps[0].contains("/tmp/flask-app"));
            assert!(steps.iter().any(|s| s.contains("pip")));
        }
        other => panic!("expected a plan, got {other:?}"),
    }
    assert!(provisioner.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn setup_hands_profile_to_provisioner() {
    let provisioner = RecordingProvisioner::default();
    let mut h = Harness::with(|dispatcher| {
        dispatcher.with_provisioner(provisioner.clone())
    });

    h.ok(Commands::Setup {
        profile: Profile::Ruby,
        dir: "/tmp/ruby-app".into(),
        dry_run: false,
    })
    .await;

    assert_eq!(*provisioner.calls.lock().unwrap(), vec![Profile::Ruby]);
}

#[tokio::test]
async fn setup_failure_is_reported() {
    let mut h = Harness::with(|dispatcher| {
        dispatcher.with_provisioner(FailingProvisioner)
    });

    let err = h
        .run(Commands::Setup {
            profile: Profile::Mern,
            dir: "/tmp/mern-app".into(),
            dry_run: false,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, VoxaError::Provision(_)));
    assert!(err.to_string().contains("npm not found"));
}
