use thiserror::Error;

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("search backend setup failed: {message}")]
    SearchBackend { message: String },
    #[error("cache store setup failed: {message}")]
    CacheStore { message: String },
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
    #[error("configuration error: {message}")]
    Configuration { message: String },
}

impl InfraError {
    pub fn search_backend(message: impl Into<String>) -> Self {
        Self::SearchBackend {
            message: message.into(),
        }
    }

    pub fn cache_store(message: impl Into<String>) -> Self {
        Self::CacheStore {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn telemetry(message: impl Into<String>) -> Self {
        Self::Telemetry(message.into())
    }
}
