use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub auth: AuthConfig,
    #[serde(default)]
    pub server: ServerConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub extractor: ExtractorConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8080
}

/// Session authentication configuration.
///
/// When `enabled` is false the download endpoint is open and requests
/// run under an anonymous identity.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Secret used to sign session tokens. Required when enabled.
    #[serde(default)]
    pub session_secret: String,
    /// Session token lifetime in seconds (default: 24h)
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            session_secret: String::new(),
            token_ttl_secs: default_token_ttl(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_token_ttl() -> u64 {
    86_400
}

/// Object storage configuration.
///
/// Credentials are never read from this file; the AWS SDK default
/// provider chain (environment, profile, IMDS) supplies them.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Bucket holding both uploaded media and the user record document.
    pub bucket: String,
    #[serde(default = "default_region")]
    pub region: String,
    /// Custom endpoint for S3-compatible providers (MinIO, Spaces, ...).
    /// Implies path-style addressing.
    #[serde(default)]
    pub endpoint_url: Option<String>,
    /// When true, issue deterministic public URLs instead of presigned ones.
    #[serde(default)]
    pub public_links: bool,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

/// Extraction engine (yt-dlp) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtractorConfig {
    #[serde(default = "default_ytdlp_bin")]
    pub ytdlp_bin: String,
    /// Hard bound on a single extraction run, in seconds (default: 10min)
    #[serde(default = "default_extract_timeout")]
    pub timeout_secs: u64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            ytdlp_bin: default_ytdlp_bin(),
            timeout_secs: default_extract_timeout(),
        }
    }
}

fn default_ytdlp_bin() -> String {
    "yt-dlp".to_string()
}

fn default_extract_timeout() -> u64 {
    600
}

/// Download pipeline configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Object key prefix partitioning uploaded media from other data.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    /// Lifetime of issued download links in seconds (default: 1h)
    #[serde(default = "default_hour")]
    pub link_ttl_secs: u64,
    /// Age past which uploaded objects are swept, in seconds (default: 1h)
    #[serde(default = "default_hour")]
    pub retention_ttl_secs: u64,
    /// Sources reporting a larger size are rejected before download.
    #[serde(default = "default_max_source_bytes")]
    pub max_source_bytes: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            key_prefix: default_key_prefix(),
            link_ttl_secs: default_hour(),
            retention_ttl_secs: default_hour(),
            max_source_bytes: default_max_source_bytes(),
        }
    }
}

fn default_key_prefix() -> String {
    "videos/".to_string()
}

fn default_hour() -> u64 {
    3600
}

fn default_max_source_bytes() -> u64 {
    500_000_000
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub auth: SanitizedAuthConfig,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub extractor: ExtractorConfig,
    pub pipeline: PipelineConfig,
}

/// Sanitized auth config (session secret hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedAuthConfig {
    pub enabled: bool,
    pub session_secret_configured: bool,
    pub token_ttl_secs: u64,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            auth: SanitizedAuthConfig {
                enabled: config.auth.enabled,
                session_secret_configured: !config.auth.session_secret.is_empty(),
                token_ttl_secs: config.auth.token_ttl_secs,
            },
            server: config.server.clone(),
            storage: config.storage.clone(),
            extractor: config.extractor.clone(),
            pipeline: config.pipeline.clone(),
        }
    }
}
