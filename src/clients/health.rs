use std::{collections::HashMap, time::Duration, time::Instant};

use chrono::Utc;
use reqwest::Client;
use tracing::{debug, warn};

use crate::{
    clients::delivery_log::PgDeliveryLogStore,
    config::Config,
    models::health::{HealthCheckResponse, HealthStatus, ServiceHealth},
};

pub struct HealthChecker {
    config: Config,
}

impl HealthChecker {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn check_all(&self) -> HealthCheckResponse {
        let mut checks = HashMap::new();

        let db_health = self.check_database().await;
        checks.insert("database".to_string(), db_health);

        let delivery_health = self.check_delivery_endpoint().await;
        checks.insert("delivery_endpoint".to_string(), delivery_health);

        let overall_status = self.determine_overall_status(&checks);

        HealthCheckResponse {
            status: overall_status,
            timestamp: Utc::now(),
            checks,
        }
    }

    async fn check_database(&self) -> ServiceHealth {
        let start = Instant::now();

        match PgDeliveryLogStore::connect(&self.config.database_url).await {
            Ok(store) => match store.health_check().await {
                Ok(_) => {
                    let elapsed = start.elapsed().as_millis() as u64;
                    debug!(response_time_ms = elapsed, "Database health check passed");
                    ServiceHealth::healthy(elapsed)
                }
                Err(e) => {
                    warn!(error = %e, "Database health check failed");
                    ServiceHealth::unhealthy(format!("Health check query failed: {}", e))
                }
            },
            Err(e) => {
                warn!(error = %e, "Database connection failed");
                ServiceHealth::unhealthy(format!("Connection failed: {}", e))
            }
        }
    }

    // An unreachable delivery API degrades the service rather than taking it
    // down; sends retry on their own schedule anyway.
    async fn check_delivery_endpoint(&self) -> ServiceHealth {
        let start = Instant::now();

        let client = match Client::builder().timeout(Duration::from_secs(5)).build() {
            Ok(client) => client,
            Err(e) => {
                warn!(error = %e, "HTTP client creation failed");
                return ServiceHealth::degraded(format!("Client creation failed: {}", e));
            }
        };

        match client.get(&self.config.callmebot_api_url).send().await {
            Ok(_) => {
                let elapsed = start.elapsed().as_millis() as u64;
                debug!(response_time_ms = elapsed, "Delivery endpoint health check passed");
                ServiceHealth::healthy(elapsed)
            }
            Err(e) => {
                warn!(error = %e, "Delivery endpoint unreachable");
                ServiceHealth::degraded(format!("Request failed: {}", e))
            }
        }
    }

    fn determine_overall_status(&self, checks: &HashMap<String, ServiceHealth>) -> HealthStatus {
        let has_unhealthy = checks
            .values()
            .any(|health| health.status == HealthStatus::Unhealthy);

        let has_degraded = checks
            .values()
            .any(|health| health.status == HealthStatus::Degraded);

        if has_unhealthy {
            HealthStatus::Unhealthy
        } else if has_degraded {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        }
    }
}
