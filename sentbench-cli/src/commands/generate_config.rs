//! Generate config command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

/// Configuration template with every option at its default
pub const CONFIG_TEMPLATE: &str = r#"# sentbench configuration

[evaluation]
# Score normalization: "character_weighted" or "sentence_count"
normalization = "character_weighted"

# Ignore very frequent characters when comparing long sentences
autojunk = true

# Untimed calls per provider before measuring
warmup_runs = 1

# Stop at the first failed trial instead of recording it
fail_fast = false

# Evaluate providers concurrently
parallel = false
# threads = 4

# Use only the first N corpus records
# limit = 100

# Providers to run when none are given with -p.
# Empty means every provider defined below, or the native built-ins.
providers = []

[output]
# Report format: "csv", "json" or "markdown"
format = "csv"
# path = "results.csv"

# Additional providers. An entry whose id matches a built-in replaces it.
#
# [[providers]]
# kind = "punctuation"
# id = "punctuation-legal"
# name = "Punctuation with legal abbreviations"
# abbreviations = ["Art", "Sec", "para"]
#
# [[providers]]
# kind = "python"
# id = "spacy-lg"
# name = "Spacy en_core_web_lg"
# backend = "spacy"          # spacy, stanza, argos or nltk
# model = "en_core_web_lg"
# sentencizer = false
#
# [[providers]]
# kind = "command"
# id = "my-splitter"
# program = "./split.sh"     # reads text on stdin, prints one sentence per line
# args = []
"#;

/// Arguments for the generate-config command
#[derive(Debug, Args)]
pub struct GenerateConfigArgs {
    /// Output file path
    #[arg(short, long, value_name = "FILE", default_value = "sentbench.toml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

impl GenerateConfigArgs {
    /// Execute the generate-config command
    pub fn execute(&self) -> Result<()> {
        use std::fs;

        if self.output.exists() && !self.force {
            anyhow::bail!(
                "{} already exists (use --force to overwrite)",
                self.output.display()
            );
        }

        fs::write(&self.output, CONFIG_TEMPLATE)
            .with_context(|| format!("Failed to write to {}", self.output.display()))?;

        println!("✓ Configuration template written to {}", self.output.display());
        println!();
        println!("Next steps:");
        println!("1. Edit the file to pick providers and options");
        println!("2. Validate it:");
        println!("   sentbench validate --config {}", self.output.display());
        println!("3. Use it for a run:");
        println!(
            "   sentbench run -c corpus.jsonl --config {}",
            self.output.display()
        );

        Ok(())
    }
}
