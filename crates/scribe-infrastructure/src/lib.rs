pub mod config_service;
pub mod dto;
pub mod history_repository;
pub mod paths;
pub mod prompt_store;
pub mod storage;
pub mod system_clock;
pub mod writing_archive;

pub use crate::config_service::ConfigService;
pub use crate::history_repository::JsonHistoryRepository;
pub use crate::prompt_store::FsPromptStore;
pub use crate::system_clock::SystemClock;
pub use crate::writing_archive::WritingArchive;
