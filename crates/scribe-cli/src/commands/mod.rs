pub mod config;
pub mod folder;
pub mod prompts;
pub mod writing;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use scribe_application::PromptRotationService;
use scribe_core::ScribeError;
use scribe_infrastructure::paths::ScribePaths;
use scribe_infrastructure::{
    ConfigService, FsPromptStore, JsonHistoryRepository, SystemClock, WritingArchive,
};

/// Everything a command needs, wired once at startup.
pub struct App {
    pub config: ConfigService,
    pub rotation: PromptRotationService,
    pub archive: WritingArchive,
}

impl App {
    pub async fn bootstrap(config_dir: Option<&Path>) -> Result<Self> {
        let paths = ScribePaths::new(config_dir);
        let config_service = ConfigService::new(&paths)?;
        let config = config_service.get_config();

        let store = Arc::new(FsPromptStore::new(config.prompts.clone()));
        let repository = Arc::new(JsonHistoryRepository::new(&paths)?);
        tracing::debug!("[Bootstrap] History file: {:?}", repository.path());

        let rotation = PromptRotationService::restore(
            store,
            repository,
            Arc::new(SystemClock),
            config.history.clone(),
        )
        .await;

        Ok(Self {
            config: config_service,
            rotation,
            archive: WritingArchive::new(&paths)?,
        })
    }
}

/// Renders a command failure for the terminal.
pub fn describe(error: &anyhow::Error) -> String {
    match error.downcast_ref::<ScribeError>() {
        Some(scribe_error) => scribe_error.user_message(),
        None => format!("Error: {:#}", error),
    }
}
