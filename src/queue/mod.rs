//! Queue module - deferred generation jobs and the AMQP producer

pub mod amqp;
pub mod job;

pub use amqp::AmqpProducer;
pub use job::GenerationJob;

use async_trait::async_trait;

use crate::error::Result;

/// Trait for publishing generation jobs to the worker queue
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Publish one job; errors propagate to the caller
    async fn publish(&self, job: &GenerationJob) -> Result<()>;
}
