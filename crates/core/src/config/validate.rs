use super::{
    types::{Config, MediaBackend},
    ConfigError,
};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - The selected media backend has its config section and credentials
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    // Media backend validation
    match config.media.backend {
        MediaBackend::Cloudinary => {
            let cloudinary = config.media.cloudinary.as_ref().ok_or_else(|| {
                ConfigError::ValidationError(
                    "media.backend is \"cloudinary\" but [media.cloudinary] is missing".to_string(),
                )
            })?;

            if cloudinary.cloud_name.is_empty() {
                return Err(ConfigError::ValidationError(
                    "media.cloudinary.cloud_name cannot be empty".to_string(),
                ));
            }
            if cloudinary.api_key.is_empty() || cloudinary.api_secret.is_empty() {
                return Err(ConfigError::ValidationError(
                    "media.cloudinary credentials cannot be empty".to_string(),
                ));
            }
        }
    }

    Ok(())
}
