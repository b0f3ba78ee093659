use grabdock_core::{
    Config, DownloadPipeline, JsonUserStore, SanitizedConfig, SessionSigner, StoreHandle,
};

/// Shared application state
pub struct AppState {
    config: Config,
    pipeline: DownloadPipeline,
    users: JsonUserStore,
    signer: SessionSigner,
}

impl AppState {
    pub fn new(
        config: Config,
        pipeline: DownloadPipeline,
        users: JsonUserStore,
        signer: SessionSigner,
    ) -> Self {
        Self {
            config,
            pipeline,
            users,
            signer,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn auth_enabled(&self) -> bool {
        self.config.auth.enabled
    }

    pub fn token_ttl_secs(&self) -> u64 {
        self.config.auth.token_ttl_secs
    }

    pub fn pipeline(&self) -> &DownloadPipeline {
        &self.pipeline
    }

    pub fn users(&self) -> &JsonUserStore {
        &self.users
    }

    pub fn signer(&self) -> &SessionSigner {
        &self.signer
    }

    pub fn store(&self) -> &StoreHandle {
        self.pipeline.store()
    }
}
