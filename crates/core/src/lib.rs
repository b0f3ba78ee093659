pub mod auth;
pub mod config;
pub mod extractor;
pub mod metrics;
pub mod pipeline;
pub mod retention;
pub mod sanitize;
pub mod staging;
pub mod storage;
pub mod testing;
pub mod users;

pub use auth::{AuthError, Identity, SessionSigner};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use extractor::{ExtractionResult, Extractor, ExtractorError, MediaProbe, YtDlpExtractor};
pub use pipeline::{DownloadPipeline, PipelineError, PublishedDownload};
pub use retention::sweep;
pub use sanitize::sanitize_filename;
pub use staging::StagingArea;
pub use storage::{DownloadLink, ObjectStore, S3Store, StoreError, StoreHandle};
pub use users::{JsonUserStore, User, UserStoreError};
