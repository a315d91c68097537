use std::sync::{Arc, Mutex};

use anyhow::{Error, anyhow};
use async_trait::async_trait;
use serde_json::Value;
use whatsapp_service::clients::callmebot::WhatsAppClient;
use whatsapp_service::clients::delivery_log::DeliveryLogStore;
use whatsapp_service::clients::settings::{NotificationConfig, SettingsStore};
use whatsapp_service::config::Config;
use whatsapp_service::dispatch::Dispatcher;
use whatsapp_service::models::delivery::DeliveryLogEntry;
use whatsapp_service::models::notification::Context;
use whatsapp_service::models::recipient::{Recipient, Role};

pub fn test_config(api_url: &str, max_retries: u32) -> Config {
    Config {
        database_url: "postgres://localhost:5432/whatsapp_test".to_string(),
        callmebot_api_url: api_url.to_string(),
        send_max_retries: max_retries,
        server_port: 8080,
    }
}

pub fn whatsapp_client(server_uri: &str, max_retries: u32) -> WhatsAppClient {
    let config = test_config(&format!("{server_uri}/whatsapp.php"), max_retries);
    WhatsAppClient::new(&config).unwrap()
}

pub fn recipient(phone: &str, role: Role) -> Recipient {
    Recipient {
        phone: phone.to_string(),
        number: String::new(),
        api_key: format!("key-{phone}"),
        role,
        user_id: None,
        preferences: None,
    }
}

pub fn enabled_config(recipients: Vec<Recipient>) -> NotificationConfig {
    NotificationConfig {
        recipients,
        enabled: true,
        templates: None,
    }
}

pub fn context_from(value: Value) -> Context {
    serde_json::from_value(value).unwrap()
}

pub struct MemorySettingsStore {
    config: NotificationConfig,
    fail: bool,
}

impl MemorySettingsStore {
    pub fn new(config: NotificationConfig) -> Self {
        Self {
            config,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            config: NotificationConfig::default(),
            fail: true,
        }
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn notification_config(&self) -> Result<NotificationConfig, Error> {
        if self.fail {
            return Err(anyhow!("settings store offline"));
        }
        Ok(self.config.clone())
    }
}

#[derive(Default)]
pub struct MemoryDeliveryLog {
    entries: Mutex<Vec<DeliveryLogEntry>>,
    fail: bool,
}

impl MemoryDeliveryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn entries(&self) -> Vec<DeliveryLogEntry> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeliveryLogStore for MemoryDeliveryLog {
    async fn record(&self, entry: &DeliveryLogEntry) -> Result<(), Error> {
        if self.fail {
            return Err(anyhow!("log store offline"));
        }
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }
}

pub fn dispatcher(
    server_uri: &str,
    settings: MemorySettingsStore,
    delivery_log: Arc<MemoryDeliveryLog>,
) -> Dispatcher {
    Dispatcher::new(
        Arc::new(settings),
        delivery_log,
        whatsapp_client(server_uri, 0),
    )
}
