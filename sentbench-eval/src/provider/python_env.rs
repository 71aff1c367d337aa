//! Python interpreter discovery
//!
//! Python-backed providers need an interpreter that has their NLP packages
//! installed. Environments are tried in this order: explicit path from
//! `SENTBENCH_PYTHON_PATH`, a project venv, an active conda env, `uv`, then
//! the system interpreter.

use crate::constants::ENV_PYTHON_PATH;
use crate::error::{EvalError, Result};
use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Kinds of Python environment we know how to launch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PythonEnvironment {
    /// Interpreter given explicitly through the environment
    Explicit(PathBuf),
    /// Virtual environment inside the working directory
    Venv(PathBuf),
    /// Active conda environment
    Conda(String),
    /// Python managed by uv
    Uv,
    /// Interpreter found on PATH
    System(PathBuf),
}

impl PythonEnvironment {
    /// Detect the preferred environment for `base_dir`
    pub fn detect(base_dir: &Path) -> Result<Self> {
        if let Some(explicit) = check_explicit() {
            return Ok(explicit);
        }

        check_venv(base_dir)
            .or_else(check_conda)
            .or_else(check_uv)
            .or_else(check_system_python)
            .ok_or_else(|| {
                EvalError::Config(format!(
                    "no suitable Python environment found; install Python 3.8+ or set {ENV_PYTHON_PATH}"
                ))
            })
    }

    /// Detect the preferred environment for the current directory
    pub fn detect_current() -> Result<Self> {
        let cwd = env::current_dir()?;
        Self::detect(&cwd)
    }

    /// Build a command that starts this interpreter
    pub fn command(&self) -> Command {
        let mut cmd = match self {
            PythonEnvironment::Explicit(path)
            | PythonEnvironment::Venv(path)
            | PythonEnvironment::System(path) => Command::new(path),
            // Conda activates the env, so its python is first on PATH
            PythonEnvironment::Conda(_) => Command::new("python"),
            PythonEnvironment::Uv => {
                let mut c = Command::new("uv");
                c.args(["run", "python"]);
                c
            }
        };

        cmd.env("PYTHONIOENCODING", "utf-8");
        cmd.env("PYTHONUNBUFFERED", "1");
        cmd
    }

    /// Human-readable description
    pub fn describe(&self) -> String {
        match self {
            PythonEnvironment::Explicit(path) => format!("explicit ({})", path.display()),
            PythonEnvironment::Venv(path) => format!("venv ({})", path.display()),
            PythonEnvironment::Conda(name) => format!("conda ({name})"),
            PythonEnvironment::Uv => "uv".to_string(),
            PythonEnvironment::System(path) => format!("system ({})", path.display()),
        }
    }
}

fn check_explicit() -> Option<PythonEnvironment> {
    let path = PathBuf::from(env::var_os(ENV_PYTHON_PATH)?);
    if path.exists() {
        Some(PythonEnvironment::Explicit(path))
    } else {
        log::warn!(
            "{ENV_PYTHON_PATH} points to {}, which does not exist",
            path.display()
        );
        None
    }
}

fn check_venv(base_dir: &Path) -> Option<PythonEnvironment> {
    [
        "venv/bin/python",
        "venv/Scripts/python.exe",
        ".venv/bin/python",
        ".venv/Scripts/python.exe",
    ]
    .iter()
    .map(|relative| base_dir.join(relative))
    .find(|path| path.exists())
    .map(PythonEnvironment::Venv)
}

fn check_conda() -> Option<PythonEnvironment> {
    let conda_env = env::var("CONDA_DEFAULT_ENV").ok()?;
    if conda_env.is_empty() || conda_env == "base" {
        return None;
    }
    Command::new("conda")
        .arg("--version")
        .output()
        .ok()
        .map(|_| PythonEnvironment::Conda(conda_env))
}

fn check_uv() -> Option<PythonEnvironment> {
    let output = Command::new("uv")
        .args(["run", "python", "--version"])
        .output()
        .ok()?;
    output.status.success().then_some(PythonEnvironment::Uv)
}

fn check_system_python() -> Option<PythonEnvironment> {
    let candidates: &[&str] = if cfg!(windows) {
        &["python.exe", "python3.exe", "py.exe"]
    } else {
        &["python3", "python"]
    };

    candidates.iter().find_map(|cmd| {
        let output = Command::new(cmd).arg("--version").output().ok()?;
        output
            .status
            .success()
            .then(|| PythonEnvironment::System(PathBuf::from(cmd)))
    })
}
