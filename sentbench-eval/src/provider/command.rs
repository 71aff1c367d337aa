//! External command provider
//!
//! Runs a program once per text. The text is written to its stdin and the
//! language code is exported as `SENTBENCH_LANG`. Each non-empty stdout line
//! is one sentence.

use super::SegmentationProvider;
use crate::constants::ENV_LANG;
use crate::error::{EvalError, Result};
use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;

/// Segmentation provider backed by an arbitrary executable
#[derive(Debug, Clone)]
pub struct CommandProvider {
    id: String,
    name: String,
    program: String,
    args: Vec<String>,
}

impl CommandProvider {
    /// Create a provider running `program`
    pub fn new(id: impl Into<String>, program: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the program arguments
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

impl SegmentationProvider for CommandProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn split_sentences(&self, text: &str, lang_code: &str) -> Result<Vec<String>> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env(ENV_LANG, lang_code)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                EvalError::provider(&self.id, format!("failed to run '{}': {e}", self.program))
            })?;

        // Feed stdin from another thread so a chatty child cannot deadlock us
        let writer = child.stdin.take().map(|mut stdin| {
            let input = text.to_string();
            thread::spawn(move || stdin.write_all(input.as_bytes()))
        });

        let output = child.wait_with_output()?;

        if let Some(handle) = writer {
            match handle.join() {
                Ok(Ok(())) => {}
                // The child may legitimately exit without reading everything
                Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                Ok(Err(e)) => return Err(e.into()),
                Err(_) => {
                    return Err(EvalError::provider(&self.id, "stdin writer panicked"));
                }
            }
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EvalError::provider(
                &self.id,
                format!("'{}' exited with {}: {}", self.program, output.status, stderr.trim()),
            ));
        }

        let stdout = String::from_utf8(output.stdout).map_err(|e| {
            EvalError::provider(&self.id, format!("output is not valid UTF-8: {e}"))
        })?;

        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn is_available(&self) -> bool {
        Command::new(&self.program)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|mut child| {
                let _ = child.kill();
                let _ = child.wait();
            })
            .is_ok()
    }
}
