use std::env;

use serde::{Deserialize, Serialize};

use self::translator::TranslatorConfig;

pub mod translator;

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub translator: TranslatorConfig,

    /// Emit logs as JSON lines instead of human-readable text
    pub log_json: bool,
}

impl Config {
    pub fn new() -> Self {
        let log_json = env::var("LOG_JSON")
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Config {
            translator: TranslatorConfig::new(),
            log_json,
        }
    }
}
