//! Python-backed segmentation providers
//!
//! Each provider owns a long-lived Python worker process. Requests and
//! responses are single JSON lines over the worker's stdin and stdout, so a
//! model is loaded once per run rather than once per record.

use super::python_env::PythonEnvironment;
use super::SegmentationProvider;
use crate::error::{EvalError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Stdio};
use std::str::FromStr;
use std::sync::Mutex;

/// Worker loop shared by all Python backends
///
/// Invoked as `python -c WORKER_SCRIPT <backend> <model> <sentencizer>`.
const WORKER_SCRIPT: &str = r#"
import json
import sys

backend, model, sentencizer = sys.argv[1], sys.argv[2], sys.argv[3] == "1"

# Replies own the real stdout; library chatter goes to stderr
out = sys.stdout
sys.stdout = sys.stderr


def load():
    if backend == "spacy":
        import spacy

        nlp = spacy.load(model)
        if sentencizer:
            nlp.add_pipe("sentencizer")
        return lambda text, lang: [s.text for s in nlp(text).sents]
    if backend == "stanza":
        import stanza

        pipelines = {}

        def split(text, lang):
            if lang not in pipelines:
                pipelines[lang] = stanza.Pipeline(lang, processors="tokenize", verbose=False)
            return [s.text for s in pipelines[lang](text).sentences]

        return split
    if backend == "argos":
        import argostranslate.translate

        return lambda text, lang: argostranslate.translate.chunk(text, lang)
    if backend == "nltk":
        import nltk

        languages = {"en": "english", "de": "german", "fr": "french", "es": "spanish",
                     "it": "italian", "pt": "portuguese", "nl": "dutch", "ru": "russian"}
        return lambda text, lang: nltk.sent_tokenize(text, language=languages.get(lang, "english"))
    raise ValueError("unknown backend: " + backend)


def reply(payload):
    out.write(json.dumps(payload) + "\n")
    out.flush()


try:
    split = load()
    reply({"ready": True})
except Exception as exc:
    reply({"error": "failed to load backend: %s" % exc})
    sys.exit(1)

for line in sys.stdin:
    if not line.strip():
        continue
    request = json.loads(line)
    try:
        reply({"sentences": [str(s) for s in split(request["text"], request["lang_code"])]})
    except Exception as exc:
        reply({"error": str(exc)})
"#;

/// Import probe used by `is_available`
const PROBE_SCRIPT: &str = r#"
import importlib, sys
try:
    importlib.import_module(sys.argv[1])
    print("available")
except Exception:
    print("not available")
"#;

/// NLP library driving a Python provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PythonBackend {
    /// spaCy pipeline sentences
    Spacy,
    /// Stanza tokenize processor
    Stanza,
    /// Argos Translate chunking
    Argos,
    /// NLTK Punkt tokenizer
    Nltk,
}

impl PythonBackend {
    /// Identifier passed to the worker script
    pub fn as_str(&self) -> &'static str {
        match self {
            PythonBackend::Spacy => "spacy",
            PythonBackend::Stanza => "stanza",
            PythonBackend::Argos => "argos",
            PythonBackend::Nltk => "nltk",
        }
    }

    /// Python module whose presence means the backend can run
    pub fn module(&self) -> &'static str {
        match self {
            PythonBackend::Spacy => "spacy",
            PythonBackend::Stanza => "stanza",
            PythonBackend::Argos => "argostranslate.translate",
            PythonBackend::Nltk => "nltk",
        }
    }
}

impl fmt::Display for PythonBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PythonBackend {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spacy" => Ok(PythonBackend::Spacy),
            "stanza" => Ok(PythonBackend::Stanza),
            "argos" | "argostranslate" => Ok(PythonBackend::Argos),
            "nltk" | "punkt" => Ok(PythonBackend::Nltk),
            other => Err(EvalError::Config(format!("unknown python backend '{other}'"))),
        }
    }
}

#[derive(Debug, Serialize)]
struct WorkerRequest<'a> {
    text: &'a str,
    lang_code: &'a str,
}

#[derive(Debug, Deserialize)]
struct WorkerResponse {
    #[serde(default)]
    sentences: Option<Vec<String>>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    ready: bool,
}

/// Running worker process
struct PythonWorker {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    /// Set once a request went unanswered or the reply was unreadable
    desynced: bool,
}

impl PythonWorker {
    fn spawn(provider: &PythonProvider) -> Result<Self> {
        let python = PythonEnvironment::detect_current()?;
        log::info!(
            "Starting {} worker for '{}' with {}",
            provider.backend,
            provider.id,
            python.describe()
        );

        let mut cmd = python.command();
        cmd.arg("-c")
            .arg(WORKER_SCRIPT)
            .arg(provider.backend.as_str())
            .arg(provider.model.as_deref().unwrap_or(""))
            .arg(if provider.sentencizer { "1" } else { "0" })
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());

        let mut child = cmd.spawn().map_err(|e| {
            EvalError::provider(&provider.id, format!("failed to start Python: {e}"))
        })?;

        let (stdin, stdout) = match (child.stdin.take(), child.stdout.take()) {
            (Some(stdin), Some(stdout)) => (stdin, BufReader::new(stdout)),
            _ => {
                let _ = child.kill();
                return Err(EvalError::provider(&provider.id, "worker pipes unavailable"));
            }
        };

        let mut worker = Self {
            child,
            stdin,
            stdout,
            desynced: false,
        };

        let greeting = worker.read_response(&provider.id)?;
        if let Some(error) = greeting.error {
            return Err(EvalError::provider(&provider.id, error));
        }
        if !greeting.ready {
            return Err(EvalError::provider(
                &provider.id,
                "worker did not report ready",
            ));
        }

        Ok(worker)
    }

    fn read_response(&mut self, provider_id: &str) -> Result<WorkerResponse> {
        let mut line = String::new();
        let read = self.stdout.read_line(&mut line)?;
        if read == 0 {
            return Err(EvalError::provider(
                provider_id,
                "worker exited unexpectedly",
            ));
        }
        serde_json::from_str(&line).map_err(|e| {
            EvalError::provider(provider_id, format!("malformed worker response: {e}"))
        })
    }

    fn exchange(&mut self, provider_id: &str, request: &str) -> Result<WorkerResponse> {
        writeln!(self.stdin, "{request}")?;
        self.stdin.flush()?;
        self.read_response(provider_id)
    }

    fn split(&mut self, provider_id: &str, text: &str, lang_code: &str) -> Result<Vec<String>> {
        let request = serde_json::to_string(&WorkerRequest { text, lang_code })?;

        // Any later reply could belong to this request
        let response = self.exchange(provider_id, &request).inspect_err(|_| {
            self.desynced = true;
        })?;
        match (response.sentences, response.error) {
            (_, Some(error)) => Err(EvalError::provider(provider_id, error)),
            (Some(sentences), None) => Ok(sentences),
            (None, None) => Err(EvalError::provider(
                provider_id,
                "worker response carried no sentences",
            )),
        }
    }
}

impl Drop for PythonWorker {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Segmentation provider running a Python NLP library
pub struct PythonProvider {
    id: String,
    name: String,
    backend: PythonBackend,
    model: Option<String>,
    sentencizer: bool,
    worker: Mutex<Option<PythonWorker>>,
}

impl fmt::Debug for PythonProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PythonProvider")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("backend", &self.backend)
            .field("model", &self.model)
            .field("sentencizer", &self.sentencizer)
            .finish_non_exhaustive()
    }
}

impl PythonProvider {
    /// Create a provider; the worker starts on first use
    pub fn new(id: impl Into<String>, name: impl Into<String>, backend: PythonBackend) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            backend,
            model: None,
            sentencizer: false,
            worker: Mutex::new(None),
        }
    }

    /// Model to load (spaCy package name)
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Add spaCy's rule-based sentencizer pipe
    pub fn with_sentencizer(mut self, sentencizer: bool) -> Self {
        self.sentencizer = sentencizer;
        self
    }

    /// Backing library
    pub fn backend(&self) -> PythonBackend {
        self.backend
    }

    /// Configured model, if any
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }
}

impl SegmentationProvider for PythonProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn split_sentences(&self, text: &str, lang_code: &str) -> Result<Vec<String>> {
        let mut guard = self
            .worker
            .lock()
            .map_err(|_| EvalError::provider(&self.id, "worker lock poisoned"))?;

        if guard.is_none() {
            *guard = Some(PythonWorker::spawn(self)?);
        }

        let result = match guard.as_mut() {
            Some(worker) => worker.split(&self.id, text, lang_code),
            None => Err(EvalError::provider(&self.id, "worker unavailable")),
        };

        // Restart a dead or out-of-step worker on the next call
        let restart = guard
            .as_mut()
            .map(|worker| worker.desynced || !matches!(worker.child.try_wait(), Ok(None)))
            .unwrap_or(false);
        if restart {
            log::warn!("Python worker for '{}' stopped answering; it will be restarted", self.id);
            *guard = None;
        }

        result
    }

    fn is_available(&self) -> bool {
        let Ok(python) = PythonEnvironment::detect_current() else {
            return false;
        };
        python
            .command()
            .arg("-c")
            .arg(PROBE_SCRIPT)
            .arg(self.backend.module())
            .stderr(Stdio::null())
            .output()
            .map(|out| String::from_utf8_lossy(&out.stdout).trim() == "available")
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parsing() {
        assert_eq!("spacy".parse::<PythonBackend>().unwrap(), PythonBackend::Spacy);
        assert_eq!("Stanza".parse::<PythonBackend>().unwrap(), PythonBackend::Stanza);
        assert_eq!("punkt".parse::<PythonBackend>().unwrap(), PythonBackend::Nltk);
        assert!("fasttext".parse::<PythonBackend>().is_err());
    }

    #[test]
    fn test_backend_serde_names() {
        let json = serde_json::to_string(&PythonBackend::Argos).unwrap();
        assert_eq!(json, "\"argos\"");
    }

    #[test]
    fn test_builder() {
        let provider = PythonProvider::new("spacy-sentencizer", "Spacy Sentencizer", PythonBackend::Spacy)
            .with_model("en_core_web_sm")
            .with_sentencizer(true);

        assert_eq!(provider.id(), "spacy-sentencizer");
        assert_eq!(provider.name(), "Spacy Sentencizer");
        assert_eq!(provider.model(), Some("en_core_web_sm"));
        assert!(format!("{provider:?}").contains("sentencizer: true"));
    }

    #[test]
    fn test_worker_response_shapes() {
        let ok: WorkerResponse = serde_json::from_str(r#"{"sentences": ["A.", "B."]}"#).unwrap();
        assert_eq!(ok.sentences.unwrap(), vec!["A.", "B."]);

        let err: WorkerResponse = serde_json::from_str(r#"{"error": "boom"}"#).unwrap();
        assert_eq!(err.error.as_deref(), Some("boom"));

        let ready: WorkerResponse = serde_json::from_str(r#"{"ready": true}"#).unwrap();
        assert!(ready.ready);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_reply_restarts_worker() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        let interpreter = dir.path().join("python");
        // Echoes each request's text back as its only sentence. The first
        // process also prints a stray line before its first reply.
        let script = r#"#!/bin/sh
echo '{"ready": true}'
marker="$(dirname "$0")/started"
if [ ! -e "$marker" ]; then
    touch "$marker"
    echo "Downloading model..."
fi
while read -r line; do
    text=$(printf '%s' "$line" | sed 's/.*"text":\("[^"]*"\).*/\1/')
    echo "{\"sentences\": [$text]}"
done
"#;
        std::fs::write(&interpreter, script).unwrap();
        std::fs::set_permissions(&interpreter, std::fs::Permissions::from_mode(0o755)).unwrap();

        std::env::set_var(crate::constants::ENV_PYTHON_PATH, &interpreter);
        let provider = PythonProvider::new("fake", "Fake", PythonBackend::Spacy);
        let first = provider.split_sentences("First.", "en");
        let second = provider.split_sentences("Second.", "en");
        let third = provider.split_sentences("Third.", "en");
        std::env::remove_var(crate::constants::ENV_PYTHON_PATH);

        assert!(first
            .unwrap_err()
            .to_string()
            .contains("malformed worker response"));
        assert_eq!(second.unwrap(), vec!["Second."]);
        assert_eq!(third.unwrap(), vec!["Third."]);
    }

    #[test]
    fn test_worker_script_keeps_stdout_for_replies() {
        assert!(WORKER_SCRIPT.contains("sys.stdout = sys.stderr"));
        assert!(WORKER_SCRIPT.contains("out.write("));
    }

    #[test]
    fn test_request_shape() {
        let json = serde_json::to_value(WorkerRequest {
            text: "Hi.",
            lang_code: "en",
        })
        .unwrap();
        assert_eq!(json["text"], "Hi.");
        assert_eq!(json["lang_code"], "en");
    }
}
