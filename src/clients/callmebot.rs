use std::time::Duration;

use anyhow::{Error, anyhow};
use reqwest::{Client, StatusCode};
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::models::delivery::DeliveryResult;
use crate::models::recipient::Recipient;

const SEND_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct WhatsAppClient {
    http_client: Client,
    api_url: String,
    max_retries: u32,
}

impl WhatsAppClient {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(SEND_TIMEOUT_SECS))
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            http_client,
            api_url: config.callmebot_api_url.clone(),
            max_retries: config.send_max_retries,
        })
    }

    pub async fn send(&self, phone: &str, api_key: &str, message: &str) -> bool {
        if phone.is_empty() || api_key.is_empty() || message.is_empty() {
            error!(recipient = %phone, "Missing required parameters for notification");
            return false;
        }

        let max_attempts = self.max_retries + 1;

        for attempt in 0..=self.max_retries {
            info!(
                recipient = %phone,
                attempt = attempt + 1,
                max_attempts,
                message_length = message.len(),
                "Attempting to send notification"
            );

            let request = self
                .http_client
                .get(&self.api_url)
                .query(&[("phone", phone), ("apikey", api_key), ("text", message)]);

            match request.send().await {
                Ok(response) if response.status() == StatusCode::OK => {
                    info!(
                        recipient = %phone,
                        attempt = attempt + 1,
                        "Notification sent successfully"
                    );
                    return true;
                }
                Ok(response) => {
                    let status = response.status();
                    let snippet: String = response
                        .text()
                        .await
                        .unwrap_or_default()
                        .chars()
                        .take(200)
                        .collect();
                    warn!(
                        recipient = %phone,
                        attempt = attempt + 1,
                        status_code = %status,
                        response_text = %snippet,
                        "Failed to send notification"
                    );
                }
                Err(e) if e.is_timeout() => {
                    error!(
                        recipient = %phone,
                        attempt = attempt + 1,
                        "Timeout sending notification"
                    );
                }
                Err(e) => {
                    error!(
                        recipient = %phone,
                        attempt = attempt + 1,
                        error = %e,
                        "Request error sending notification"
                    );
                }
            }

            // 1s, 2s, 4s...
            if attempt < self.max_retries {
                let wait = 1u64 << attempt;
                info!(wait_secs = wait, "Waiting before retry");
                sleep(Duration::from_secs(wait)).await;
            }
        }

        error!(
            recipient = %phone,
            total_attempts = max_attempts,
            "Failed to send notification after all retries"
        );
        false
    }

    pub async fn send_batch(&self, recipients: &[Recipient], message: &str) -> Vec<DeliveryResult> {
        if recipients.is_empty() || message.is_empty() {
            warn!(
                recipient_count = recipients.len(),
                "No recipients or message provided for notification"
            );
            return Vec::new();
        }

        info!(
            recipient_count = recipients.len(),
            message_length = message.len(),
            "Starting batch notification send"
        );

        let mut results = Vec::with_capacity(recipients.len());

        for recipient in recipients {
            let phone = recipient.identifier();

            if phone.is_empty() || recipient.api_key.is_empty() {
                warn!(
                    phone = %phone,
                    has_api_key = !recipient.api_key.is_empty(),
                    "Skipping recipient with missing phone or apiKey"
                );
                results.push(DeliveryResult {
                    recipient: phone.to_string(),
                    success: false,
                });
                continue;
            }

            let success = self.send(phone, &recipient.api_key, message).await;
            results.push(DeliveryResult {
                recipient: phone.to_string(),
                success,
            });
        }

        let successful = results.iter().filter(|result| result.success).count();
        let failed = results.len() - successful;

        info!(
            total_recipients = results.len(),
            successful,
            failed,
            success_rate = %format!("{:.1}%", successful as f64 / results.len() as f64 * 100.0),
            "Batch notification send completed"
        );

        results
    }
}
