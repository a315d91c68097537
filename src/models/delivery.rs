use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::notification::NotificationKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryResult {
    pub recipient: String,
    pub success: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeliveryLogEntry {
    pub id: Uuid,
    pub task_id: String,
    pub recipient_number: String,
    pub message: String,
    pub kind: NotificationKind,
    pub success: bool,
    pub error_message: Option<String>,
    pub sent_at: DateTime<Utc>,
}

impl DeliveryLogEntry {
    pub fn new(
        task_id: String,
        recipient_number: String,
        message: String,
        kind: NotificationKind,
        success: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            task_id,
            recipient_number,
            message,
            kind,
            success,
            error_message: None,
            sent_at: Utc::now(),
        }
    }

    pub fn with_error(mut self, error: String) -> Self {
        self.error_message = Some(error);
        self
    }
}
