use lingo_config::Config;
use lingo_translator::OllamaClient;

pub struct AppState {
    pub config: Config,
    pub client: OllamaClient,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let client = OllamaClient::from_config(&config.translator);

        Self { config, client }
    }
}
