use std::env;

use serde::{Deserialize, Serialize};

fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "llama3".to_string()
}

fn default_from_lang() -> String {
    "en".to_string()
}

fn default_to_lang() -> String {
    "fr".to_string()
}

fn default_probe_timeout_ms() -> u64 {
    3000
}

/// Settings for the local inference server used for translation
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Base URL of the Ollama-compatible server
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_from_lang")]
    pub from_lang: String,
    #[serde(default = "default_to_lang")]
    pub to_lang: String,
    /// Upper bound for `/api/tags` lookups. Generation itself is never timed out.
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
}

impl TranslatorConfig {
    pub fn new() -> Self {
        let base_url = env::var("OLLAMA_BASE_URL").unwrap_or_else(|_| default_base_url());
        let model = env::var("OLLAMA_MODEL").unwrap_or_else(|_| default_model());
        let from_lang = env::var("SOURCE_LOCALE").unwrap_or_else(|_| default_from_lang());
        let to_lang = env::var("TARGET_LOCALE").unwrap_or_else(|_| default_to_lang());

        let probe_timeout_ms = env::var("PROBE_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_probe_timeout_ms);

        Self {
            base_url,
            model,
            from_lang,
            to_lang,
            probe_timeout_ms,
        }
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            from_lang: default_from_lang(),
            to_lang: default_to_lang(),
            probe_timeout_ms: default_probe_timeout_ms(),
        }
    }
}
