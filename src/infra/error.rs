use sqlx::migrate::MigrateError;
use thiserror::Error;

/// Failures raised while bootstrapping or talking to infrastructure.
#[derive(Debug, Error)]
pub enum InfraError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("database connection failed: {0}")]
    Database(#[from] sqlx::Error),
    #[error("applying migrations failed: {0}")]
    Migration(#[from] MigrateError),
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
    #[error("configuration error: {message}")]
    Configuration { message: String },
}

impl InfraError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn telemetry(message: impl Into<String>) -> Self {
        Self::Telemetry(message.into())
    }
}
