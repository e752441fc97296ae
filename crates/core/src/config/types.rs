use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub media: MediaConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory the upload UI is served from (default: "static")
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8080
}

fn default_static_dir() -> String {
    "static".to_string()
}

/// Media service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MediaConfig {
    /// Media service backend type
    pub backend: MediaBackend,
    /// Cloudinary-specific configuration (required when backend = "cloudinary")
    #[serde(default)]
    pub cloudinary: Option<CloudinaryConfig>,
}

/// Available media service backends
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MediaBackend {
    Cloudinary,
    // Future: self-hosted ffmpeg splicing over object storage
}

/// Cloudinary backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CloudinaryConfig {
    /// Cloud name (the account identifier in API URLs)
    pub cloud_name: String,
    /// API key
    pub api_key: String,
    /// API secret used for request signing
    pub api_secret: String,
    /// Remote folder that holds every asset this service creates (default: "videos")
    #[serde(default = "default_folder")]
    pub folder: String,
    /// Request timeout in seconds (default: 60, uploads can be slow)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_folder() -> String {
    "videos".to_string()
}

fn default_timeout() -> u32 {
    60
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub media: SanitizedMediaConfig,
}

/// Sanitized media config (API secret redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedMediaConfig {
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloudinary: Option<SanitizedCloudinaryConfig>,
}

/// Sanitized Cloudinary config (secret hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedCloudinaryConfig {
    pub cloud_name: String,
    pub folder: String,
    pub api_secret_configured: bool,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            media: SanitizedMediaConfig {
                backend: match config.media.backend {
                    MediaBackend::Cloudinary => "cloudinary".to_string(),
                },
                cloudinary: config.media.cloudinary.as_ref().map(|c| {
                    SanitizedCloudinaryConfig {
                        cloud_name: c.cloud_name.clone(),
                        folder: c.folder.clone(),
                        api_secret_configured: !c.api_secret.is_empty(),
                        timeout_secs: c.timeout_secs,
                    }
                }),
            },
        }
    }
}
