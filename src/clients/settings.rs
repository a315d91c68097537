use std::collections::HashMap;

use anyhow::{Error, anyhow};
use async_trait::async_trait;
use tokio_postgres::{Client, NoTls};
use tracing::{error, warn};

use crate::models::recipient::Recipient;

#[derive(Debug, Clone, Default)]
pub struct NotificationConfig {
    pub recipients: Vec<Recipient>,
    pub enabled: bool,
    pub templates: Option<HashMap<String, String>>,
}

#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn notification_config(&self) -> Result<NotificationConfig, Error>;
}

pub struct PgSettingsStore {
    client: Client,
}

impl PgSettingsStore {
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
}

#[async_trait]
impl SettingsStore for PgSettingsStore {
    async fn notification_config(&self) -> Result<NotificationConfig, Error> {
        let row = self
            .client
            .query_opt(
                "SELECT whatsapp_numbers, notifications_enabled, notification_templates \
                 FROM unified_settings WHERE id = 1",
                &[],
            )
            .await
            .map_err(|e| anyhow!("Failed to load notification settings: {}", e))?;

        let Some(row) = row else {
            warn!("No notification settings row found, notifications disabled");
            return Ok(NotificationConfig::default());
        };

        let recipients_json: Option<serde_json::Value> = row
            .try_get("whatsapp_numbers")
            .map_err(|e| anyhow!("Failed to read whatsapp_numbers: {}", e))?;
        let enabled: bool = row
            .try_get("notifications_enabled")
            .map_err(|e| anyhow!("Failed to read notifications_enabled: {}", e))?;
        let templates_json: Option<serde_json::Value> = row
            .try_get("notification_templates")
            .map_err(|e| anyhow!("Failed to read notification_templates: {}", e))?;

        let recipients = match recipients_json {
            Some(value) if !value.is_null() => serde_json::from_value(value)
                .map_err(|e| anyhow!("Invalid whatsapp_numbers payload: {}", e))?,
            _ => Vec::new(),
        };

        let templates = match templates_json {
            Some(value) => serde_json::from_value(value)
                .map_err(|e| anyhow!("Invalid notification_templates payload: {}", e))?,
            None => None,
        };

        Ok(NotificationConfig {
            recipients,
            enabled,
            templates,
        })
    }
}
