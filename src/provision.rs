//! Local environment scaffolding.
//!
//! A profile expands into a list of [`Step`]s (directories, starter files,
//! package-manager commands) which a [`Provisioner`] carries out. Nothing here
//! touches the HTTP configuration or the tracking database.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Profile {
    Mern,
    Django,
    Flask,
    Ruby,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mern => "mern",
            Self::Django => "django",
            Self::Flask => "flask",
            Self::Ruby => "ruby",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    CreateDir(PathBuf),
    WriteFile {
        path: PathBuf,
        contents: &'static str,
    },
    Run {
        program: String,
        args: Vec<String>,
        cwd: PathBuf,
    },
}

impl Step {
    fn run(program: &str, args: &[&str], cwd: &Path) -> Self {
        Self::Run {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            cwd: cwd.to_path_buf(),
        }
    }

    fn write(path: PathBuf, contents: &'static str) -> Self {
        Self::WriteFile { path, contents }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateDir(path) => write!(f, "mkdir -p {}", path.display()),
            Self::WriteFile { path, .. } => write!(f, "write {}", path.display()),
            Self::Run { program, args, cwd } => {
                write!(f, "(cd {} && {}", cwd.display(), program)?;
                for arg in args {
                    write!(f, " {arg}")?;
                }
                f.write_str(")")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionReport {
    pub profile: Profile,
    pub directory: PathBuf,
    pub steps_run: usize,
}

pub trait Provisioner {
    fn provision(&self, profile: Profile, dir: &Path) -> anyhow::Result<ProvisionReport>;
}

const EXPRESS_SERVER: &str = r#"const express = require("express");
const cors = require("cors");

const app = express();
app.use(cors());
app.use(express.json());

app.get("/api/health", (req, res) => res.json({ status: "ok" }));

const port = process.env.PORT || 3000;
app.listen(port, () => console.log(`API listening on ${port}`));
"#;

const FLASK_APP: &str = r#"from flask import Flask, jsonify

app = Flask(__name__)


@app.get("/api/health")
def health():
    return jsonify(status="ok")
"#;

const FLASK_REQUIREMENTS: &str = "flask\n";

const SINATRA_APP: &str = r#"require "sinatra"
require "json"

get "/api/health" do
  content_type :json
  { status: "ok" }.to_json
end
"#;

/// Steps that scaffold `profile` inside `dir`, in execution order.
pub fn plan(profile: Profile, dir: &Path) -> Vec<Step> {
    let mut steps = vec![Step::CreateDir(dir.to_path_buf())];

    match profile {
        Profile::Mern => {
            let server = dir.join("server");
            steps.extend([
                Step::CreateDir(server.clone()),
                Step::run("npm", &["init", "-y"], &server),
                Step::run(
                    "npm",
                    &["install", "express", "mongoose", "cors", "dotenv"],
                    &server,
                ),
                Step::write(server.join("index.js"), EXPRESS_SERVER),
                Step::run(
                    "npm",
                    &["create", "vite@latest", "client", "--", "--template", "react"],
                    dir,
                ),
            ]);
        }
        Profile::Django => {
            steps.extend([
                Step::run("python3", &["-m", "venv", ".venv"], dir),
                Step::run(".venv/bin/pip", &["install", "django"], dir),
                Step::run(".venv/bin/django-admin", &["startproject", "app", "."], dir),
            ]);
        }
        Profile::Flask => {
            steps.extend([
                Step::run("python3", &["-m", "venv", ".venv"], dir),
                Step::write(dir.join("requirements.txt"), FLASK_REQUIREMENTS),
                Step::run(".venv/bin/pip", &["install", "-r", "requirements.txt"], dir),
                Step::write(dir.join("app.py"), FLASK_APP),
            ]);
        }
        Profile::Ruby => {
            steps.extend([
                Step::run("bundle", &["init"], dir),
                Step::run("bundle", &["add", "sinatra", "puma"], dir),
                Step::write(dir.join("app.rb"), SINATRA_APP),
            ]);
        }
    }

    steps
}

/// Runs each step with the real filesystem and `std::process::Command`.
#[derive(Debug, Default)]
pub struct ShellProvisioner;

impl ShellProvisioner {
    /// Execute steps in order, stopping at the first failure.
    pub fn run_steps(&self, steps: &[Step]) -> anyhow::Result<usize> {
        for (index, step) in steps.iter().enumerate() {
            tracing::info!(step = index + 1, total = steps.len(), %step, "provisioning");
            match step {
                Step::CreateDir(path) => fs::create_dir_all(path)
                    .with_context(|| format!("failed to create {}", path.display()))?,
                Step::WriteFile { path, contents } => fs::write(path, contents)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                Step::Run { program, args, cwd } => {
                    let status = Command::new(program)
                        .args(args)
                        .current_dir(cwd)
                        .status()
                        .with_context(|| format!("failed to start {program}"))?;
                    if !status.success() {
                        bail!("`{step}` exited with {status}");
                    }
                }
            }
        }
        Ok(steps.len())
    }
}

impl Provisioner for ShellProvisioner {
    fn provision(&self, profile: Profile, dir: &Path) -> anyhow::Result<ProvisionReport> {
        let steps_run = self.run_steps(&plan(profile, dir))?;
        Ok(ProvisionReport {
            profile,
            directory: dir.to_path_buf(),
            steps_run,
        })
    }
}
