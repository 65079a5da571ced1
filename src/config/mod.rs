//! Configuration module - settings loading and validation

pub mod settings;

pub use settings::{
    BrokerConfig, DatabaseConfig, LoggingConfig, ObjectStoreConfig, ProviderConfig, ServerConfig,
    Settings,
};
