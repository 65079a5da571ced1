//! Avatar Generation Service
//!
//! GraphQL backend for user-owned AI-generated avatar images: mutations
//! persist avatar rows and defer generation to a worker through a durable
//! broker queue; image files live in object storage and are mirrored into a
//! local cache on download.

pub mod api;
pub mod config;
pub mod error;
pub mod provider;
pub mod queue;
pub mod storage;
pub mod store;

pub use error::{AppError, Result};

use std::sync::Arc;

use provider::ImageGenerator;
use queue::JobQueue;
use storage::AvatarCache;
use store::AvatarStore;

/// Application state shared across all resolvers
pub struct AppState {
    pub store: Arc<dyn AvatarStore>,
    pub generator: Arc<dyn ImageGenerator>,
    pub queue: Arc<dyn JobQueue>,
    pub cache: Arc<AvatarCache>,
}
