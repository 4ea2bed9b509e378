use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lingo_config::Config;

#[derive(Debug, Parser)]
#[command(
    name = "lingo",
    version,
    about = "Translate localization strings with a local Ollama server"
)]
pub struct Cli {
    /// Inference server base URL (overrides OLLAMA_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Model name (overrides OLLAMA_MODEL)
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Source locale (overrides SOURCE_LOCALE)
    #[arg(long, global = true)]
    pub from: Option<String>,

    /// Target locale (overrides TARGET_LOCALE)
    #[arg(long, global = true)]
    pub to: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check that the inference server answers
    Check,
    /// List installed models
    Models,
    /// Translate a single string, streaming tokens to stderr
    Translate {
        text: String,
        /// Catalog key, for log correlation
        #[arg(long)]
        key: Option<String>,
        /// Translator comment from the catalog
        #[arg(long)]
        comment: Option<String>,
    },
    /// Translate a JSON array of `{key, source_text, comment?}` entries
    Batch {
        input: PathBuf,
        /// Write results here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    /// Apply command-line overrides on top of the environment config
    pub fn apply(&self, mut config: Config) -> Config {
        let translator = &mut config.translator;

        if let Some(base_url) = &self.base_url {
            translator.base_url = base_url.clone();
        }
        if let Some(model) = &self.model {
            translator.model = model.clone();
        }
        if let Some(from) = &self.from {
            translator.from_lang = from.clone();
        }
        if let Some(to) = &self.to {
            translator.to_lang = to.clone();
        }

        config
    }
}
