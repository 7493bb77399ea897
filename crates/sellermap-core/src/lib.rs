pub mod app_config;
pub mod config;
pub mod queries;
pub mod sellers;

use thiserror::Error;

pub use app_config::{AppConfig, CacheConfig};
pub use config::{load_app_config, load_app_config_from_env, load_cache_config};
pub use queries::{load_queries, QueriesFile, QueryProfile};
pub use sellers::{
    Address, Contact, ContactUrls, GeoLocation, PaginationSummary, Room, Scalar, SellerEntity,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read queries file {path}: {source}")]
    QueriesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse queries file: {0}")]
    QueriesFileParse(#[from] serde_yaml::Error),

    #[error("invalid query configuration: {0}")]
    Validation(String),
}
