use anyhow::{Error, anyhow};
use async_trait::async_trait;
use tokio_postgres::{Client, NoTls};
use tracing::error;

use crate::models::delivery::DeliveryLogEntry;

#[async_trait]
pub trait DeliveryLogStore: Send + Sync {
    async fn record(&self, entry: &DeliveryLogEntry) -> Result<(), Error>;
}

pub struct PgDeliveryLogStore {
    client: Client,
}

impl PgDeliveryLogStore {
    pub async fn connect(database_url: &str) -> Result<Self, Error> {
        let (client, connection) = tokio_postgres::connect(database_url, NoTls)
            .await
            .map_err(|e| anyhow!("Failed to connect to database: {}", e))?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!(error = %e, "Database connection error");
            }
        });

        Ok(Self { client })
    }

    pub async fn health_check(&self) -> Result<(), Error> {
        self.client
            .query_one("SELECT 1", &[])
            .await
            .map_err(|e| anyhow!("Database health check failed: {}", e))?;
        Ok(())
    }
}

#[async_trait]
impl DeliveryLogStore for PgDeliveryLogStore {
    async fn record(&self, entry: &DeliveryLogEntry) -> Result<(), Error> {
        // The log table keys rows by the string form of the entry id.
        let id = entry.id.to_string();
        let template_type = entry.kind.as_str();

        self.client
            .execute(
                "INSERT INTO notification_logs \
                 (id, task_id, recipient_number, message, template_type, success, error_message, sent_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
                &[
                    &id,
                    &entry.task_id,
                    &entry.recipient_number,
                    &entry.message,
                    &template_type,
                    &entry.success,
                    &entry.error_message,
                    &entry.sent_at,
                ],
            )
            .await
            .map_err(|e| anyhow!("Failed to record notification log: {}", e))?;

        Ok(())
    }
}
