//! Segmentation providers
//!
//! A provider turns raw text into an ordered list of sentences. Built-in
//! providers cover native Rust splitters and several Python NLP libraries;
//! further providers can be declared in configuration as external commands.

pub mod command;
pub mod punctuation;
pub mod python;
pub mod python_env;
pub mod unicode;

pub use command::CommandProvider;
pub use punctuation::PunctuationProvider;
pub use python::{PythonBackend, PythonProvider};
pub use unicode::UnicodeProvider;

use crate::constants::WARMUP_TEXT;
use crate::error::{EvalError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A sentence segmentation strategy under evaluation
pub trait SegmentationProvider: Send + Sync {
    /// Unique identifier, used as the key for results
    fn id(&self) -> &str;

    /// Display name used in reports
    fn name(&self) -> &str {
        self.id()
    }

    /// Split `text` into sentences
    fn split_sentences(&self, text: &str, lang_code: &str) -> Result<Vec<String>>;

    /// Whether the provider's backing tool can be started
    fn is_available(&self) -> bool {
        true
    }

    /// Untimed call made before measurements start
    fn warm_up(&self, lang_code: &str) -> Result<()> {
        self.split_sentences(WARMUP_TEXT, lang_code).map(|_| ())
    }
}

impl fmt::Debug for dyn SegmentationProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SegmentationProvider")
            .field("id", &self.id())
            .field("name", &self.name())
            .finish()
    }
}

/// Declarative description of a provider, as found in configuration files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProviderSpec {
    /// Rule-based punctuation splitter
    Punctuation {
        /// Unique id
        id: String,
        /// Display name
        #[serde(default)]
        name: Option<String>,
        /// Extra abbreviations on top of the defaults
        #[serde(default)]
        abbreviations: Vec<String>,
    },
    /// Unicode UAX #29 sentence boundaries
    Unicode {
        /// Unique id
        id: String,
        /// Display name
        #[serde(default)]
        name: Option<String>,
    },
    /// Python NLP library in a worker process
    Python {
        /// Unique id
        id: String,
        /// Display name
        #[serde(default)]
        name: Option<String>,
        /// Library to use
        backend: PythonBackend,
        /// Model to load, for backends that take one
        #[serde(default)]
        model: Option<String>,
        /// Add spaCy's rule-based sentencizer
        #[serde(default)]
        sentencizer: bool,
    },
    /// External program, one sentence per output line
    Command {
        /// Unique id
        id: String,
        /// Display name
        #[serde(default)]
        name: Option<String>,
        /// Executable to run
        program: String,
        /// Arguments
        #[serde(default)]
        args: Vec<String>,
    },
}

impl ProviderSpec {
    /// Unique id of the described provider
    pub fn id(&self) -> &str {
        match self {
            ProviderSpec::Punctuation { id, .. }
            | ProviderSpec::Unicode { id, .. }
            | ProviderSpec::Python { id, .. }
            | ProviderSpec::Command { id, .. } => id,
        }
    }

    /// Short kind label
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderSpec::Punctuation { .. } => "punctuation",
            ProviderSpec::Unicode { .. } => "unicode",
            ProviderSpec::Python { .. } => "python",
            ProviderSpec::Command { .. } => "command",
        }
    }

    /// Instantiate the provider
    pub fn build(&self) -> Result<Box<dyn SegmentationProvider>> {
        if self.id().trim().is_empty() {
            return Err(EvalError::Config("provider id must not be empty".to_string()));
        }

        let provider: Box<dyn SegmentationProvider> = match self {
            ProviderSpec::Punctuation {
                id,
                name,
                abbreviations,
            } => {
                let provider = PunctuationProvider::new(id.as_str())?.with_abbreviations(abbreviations);
                Box::new(match name {
                    Some(name) => provider.with_name(name.as_str()),
                    None => provider,
                })
            }
            ProviderSpec::Unicode { id, name } => {
                let provider = UnicodeProvider::new(id.as_str());
                Box::new(match name {
                    Some(name) => provider.with_name(name.as_str()),
                    None => provider,
                })
            }
            ProviderSpec::Python {
                id,
                name,
                backend,
                model,
                sentencizer,
            } => {
                let display = name.clone().unwrap_or_else(|| id.clone());
                let provider =
                    PythonProvider::new(id.as_str(), display, *backend).with_sentencizer(*sentencizer);
                Box::new(match model {
                    Some(model) => provider.with_model(model.as_str()),
                    None => provider,
                })
            }
            ProviderSpec::Command {
                id,
                name,
                program,
                args,
            } => {
                let provider = CommandProvider::new(id.as_str(), program.as_str()).with_args(args.clone());
                Box::new(match name {
                    Some(name) => provider.with_name(name.as_str()),
                    None => provider,
                })
            }
        };

        Ok(provider)
    }
}

/// Providers that ship with sentbench
pub fn builtin_specs() -> Vec<ProviderSpec> {
    fn python(id: &str, name: &str, backend: PythonBackend, model: Option<&str>, sentencizer: bool) -> ProviderSpec {
        ProviderSpec::Python {
            id: id.to_string(),
            name: Some(name.to_string()),
            backend,
            model: model.map(str::to_string),
            sentencizer,
        }
    }

    vec![
        ProviderSpec::Punctuation {
            id: "punctuation".to_string(),
            name: Some("Rule-based punctuation".to_string()),
            abbreviations: Vec::new(),
        },
        ProviderSpec::Unicode {
            id: "unicode".to_string(),
            name: Some("Unicode UAX #29".to_string()),
        },
        python("spacy", "Spacy en_core_web_sm", PythonBackend::Spacy, Some("en_core_web_sm"), false),
        python(
            "spacy-sentencizer",
            "Spacy Sentencizer en_core_web_sm",
            PythonBackend::Spacy,
            Some("en_core_web_sm"),
            true,
        ),
        python(
            "spacy-xx-sentencizer",
            "Spacy Sentencizer xx_sent_ud_sm",
            PythonBackend::Spacy,
            Some("xx_sent_ud_sm"),
            true,
        ),
        python("argos", "Argos Translate", PythonBackend::Argos, None, false),
        python("stanza", "Stanza", PythonBackend::Stanza, None, false),
        python("nltk-punkt", "NLTK Punkt", PythonBackend::Nltk, None, false),
    ]
}

/// Ids of the built-in providers that run without external tools
pub const NATIVE_PROVIDER_IDS: &[&str] = &["punctuation", "unicode"];

/// Ordered set of providers with unique ids
#[derive(Debug, Default)]
pub struct ProviderRegistry {
    providers: Vec<Box<dyn SegmentationProvider>>,
    ids: HashSet<String>,
}

impl ProviderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from specs, in order
    pub fn from_specs<'a, I>(specs: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a ProviderSpec>,
    {
        let mut registry = Self::new();
        for spec in specs {
            registry.register(spec.build()?)?;
        }
        Ok(registry)
    }

    /// Select providers by id from configured specs, falling back to built-ins
    ///
    /// Configured specs shadow built-ins with the same id.
    pub fn select<S: AsRef<str>>(ids: &[S], configured: &[ProviderSpec]) -> Result<Self> {
        let builtins = builtin_specs();
        let mut registry = Self::new();

        for id in ids {
            let id = id.as_ref();
            let spec = configured
                .iter()
                .chain(builtins.iter())
                .find(|spec| spec.id() == id)
                .ok_or_else(|| EvalError::UnknownProvider(id.to_string()))?;
            registry.register(spec.build()?)?;
        }

        Ok(registry)
    }

    /// Add a provider; ids must be unique
    pub fn register(&mut self, provider: Box<dyn SegmentationProvider>) -> Result<()> {
        let id = provider.id().to_string();
        if !self.ids.insert(id.clone()) {
            return Err(EvalError::DuplicateProvider(id));
        }
        log::debug!("Registered provider '{id}'");
        self.providers.push(provider);
        Ok(())
    }

    /// Look up a provider by id
    pub fn get(&self, id: &str) -> Option<&dyn SegmentationProvider> {
        self.providers
            .iter()
            .find(|p| p.id() == id)
            .map(|p| p.as_ref())
    }

    /// Providers in registration order
    pub fn iter(&self) -> impl Iterator<Item = &dyn SegmentationProvider> {
        self.providers.iter().map(|p| p.as_ref())
    }

    /// Ids in registration order
    pub fn ids(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.id()).collect()
    }

    /// Number of providers
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether no provider is registered
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
