//! AMQP producer with a connection scoped to one publish call

use async_trait::async_trait;
use lapin::{
    options::{BasicPublishOptions, QueueDeclareOptions},
    types::FieldTable,
    BasicProperties, Connection, ConnectionProperties,
};
use tracing::{debug, warn};

use crate::config::BrokerConfig;
use crate::error::Result;
use crate::queue::{GenerationJob, JobQueue};

const PERSISTENT_DELIVERY: u8 = 2;

/// Publishes jobs to a durable queue on the broker
///
/// Scoped-resource lifecycle: every publish opens a fresh connection, declares
/// the queue (idempotent) and closes the connection on all exit paths.
pub struct AmqpProducer {
    amqp_url: String,
    queue_name: String,
}

impl AmqpProducer {
    /// Create a new producer from broker configuration
    pub fn new(config: &BrokerConfig) -> Self {
        Self {
            amqp_url: config.url.clone(),
            queue_name: config.queue_name.clone(),
        }
    }

    async fn publish_on(&self, connection: &Connection, job: &GenerationJob) -> Result<()> {
        let channel = connection.create_channel().await?;

        let declare_options = QueueDeclareOptions {
            durable: true,
            ..QueueDeclareOptions::default()
        };
        channel
            .queue_declare(&self.queue_name, declare_options, FieldTable::default())
            .await?;

        let payload = serde_json::to_vec(job)?;
        channel
            .basic_publish(
                "",
                &self.queue_name,
                BasicPublishOptions::default(),
                &payload,
                BasicProperties::default().with_delivery_mode(PERSISTENT_DELIVERY),
            )
            .await?
            .await?;

        debug!(queue = %self.queue_name, uuid = %job.uuid, "Published generation job");
        Ok(())
    }
}

#[async_trait]
impl JobQueue for AmqpProducer {
    async fn publish(&self, job: &GenerationJob) -> Result<()> {
        let connection = Connection::connect(&self.amqp_url, ConnectionProperties::default()).await?;

        let result = self.publish_on(&connection, job).await;

        // Release the connection even when the publish failed
        if let Err(e) = connection.close(200, "bye").await {
            warn!(error = %e, "Failed to close broker connection");
        }

        result
    }
}
