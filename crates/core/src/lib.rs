pub mod config;
pub mod media_client;
pub mod orchestrator;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, CloudinaryConfig, Config, ConfigError,
    MediaBackend, MediaConfig, SanitizedConfig, ServerConfig,
};
pub use media_client::{
    CloudinaryClient, DeleteOutcome, MediaClient, MediaClientError, RemoteAsset, VideoUpload,
};
pub use orchestrator::{CombineError, StitchOrchestrator};
