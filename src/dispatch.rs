use std::sync::Arc;

use tracing::{error, info, warn};

use crate::clients::callmebot::WhatsAppClient;
use crate::clients::delivery_log::DeliveryLogStore;
use crate::clients::settings::SettingsStore;
use crate::filter::filter_recipients;
use crate::models::delivery::DeliveryLogEntry;
use crate::models::notification::{Context, NotificationKind};
use crate::templates;

#[derive(Clone)]
pub struct Dispatcher {
    settings: Arc<dyn SettingsStore>,
    delivery_log: Arc<dyn DeliveryLogStore>,
    client: WhatsAppClient,
}

impl Dispatcher {
    pub fn new(
        settings: Arc<dyn SettingsStore>,
        delivery_log: Arc<dyn DeliveryLogStore>,
        client: WhatsAppClient,
    ) -> Self {
        Self {
            settings,
            delivery_log,
            client,
        }
    }

    // Returns true when at least one recipient was reached. Every failure
    // mode short-circuits to false without surfacing an error; callers fire
    // notifications from task flows that must not be blocked by them.
    pub async fn dispatch(&self, kind: NotificationKind, task_id: &str, context: &Context) -> bool {
        info!(
            template_type = %kind,
            task_id = %task_id,
            "Starting notification dispatch"
        );

        let config = match self.settings.notification_config().await {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    template_type = %kind,
                    error = %e,
                    "Failed to load notification settings"
                );
                return false;
            }
        };

        if !config.enabled {
            info!(template_type = %kind, "Notifications disabled, skipping send");
            return false;
        }

        if config.recipients.is_empty() {
            warn!(template_type = %kind, "No recipients configured for notifications");
            return false;
        }

        let recipients = filter_recipients(kind, &config.recipients, context);
        if recipients.is_empty() {
            info!(
                template_type = %kind,
                configured = config.recipients.len(),
                "No recipients left after filtering"
            );
            return false;
        }

        info!(
            template_type = %kind,
            configured = config.recipients.len(),
            filtered = recipients.len(),
            "Recipients filtered"
        );

        let message = match templates::render(kind, context, config.templates.as_ref()) {
            Ok(message) => message,
            Err(e) => {
                error!(
                    template_type = %kind,
                    task_id = %task_id,
                    error = %e,
                    "Failed to render notification message"
                );
                return false;
            }
        };

        let results = self.client.send_batch(&recipients, &message).await;

        let mut any_success = false;
        for result in &results {
            if result.success {
                any_success = true;
            }

            let mut entry = DeliveryLogEntry::new(
                task_id.to_string(),
                result.recipient.clone(),
                message.clone(),
                kind,
                result.success,
            );
            if !result.success {
                entry = entry.with_error("Failed to send notification".to_string());
            }

            // A log write failure must not flip the delivery outcome.
            if let Err(e) = self.delivery_log.record(&entry).await {
                warn!(
                    template_type = %kind,
                    task_id = %task_id,
                    recipient = %result.recipient,
                    error = %e,
                    "Failed to record notification log"
                );
            }
        }

        info!(
            template_type = %kind,
            task_id = %task_id,
            recipients = results.len(),
            success = any_success,
            "Notification dispatch completed"
        );

        any_success
    }
}
