use std::collections::HashMap;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::templates::TemplateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    NewProject,
    NewSubtask,
    SubtaskUpdate,
    SubtaskSpecsUpdate,
    StatusChange,
    CommentAdded,
    ReplyAdded,
    CommentResolved,
    AttachmentAdded,
}

impl NotificationKind {
    pub const ALL: [NotificationKind; 9] = [
        NotificationKind::NewProject,
        NotificationKind::NewSubtask,
        NotificationKind::SubtaskUpdate,
        NotificationKind::SubtaskSpecsUpdate,
        NotificationKind::StatusChange,
        NotificationKind::CommentAdded,
        NotificationKind::ReplyAdded,
        NotificationKind::CommentResolved,
        NotificationKind::AttachmentAdded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::NewProject => "NEW_PROJECT",
            NotificationKind::NewSubtask => "NEW_SUBTASK",
            NotificationKind::SubtaskUpdate => "SUBTASK_UPDATE",
            NotificationKind::SubtaskSpecsUpdate => "SUBTASK_SPECS_UPDATE",
            NotificationKind::StatusChange => "STATUS_CHANGE",
            NotificationKind::CommentAdded => "COMMENT_ADDED",
            NotificationKind::ReplyAdded => "REPLY_ADDED",
            NotificationKind::CommentResolved => "COMMENT_RESOLVED",
            NotificationKind::AttachmentAdded => "ATTACHMENT_ADDED",
        }
    }
}

impl Display for NotificationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NotificationKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| TemplateError::UnknownType(s.to_string()))
    }
}

/// Placeholder values for one notification event, keyed by placeholder name.
pub type Context = HashMap<String, Value>;

pub(crate) fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}

pub(crate) fn context_str(context: &Context, key: &str) -> Option<String> {
    context
        .get(key)
        .and_then(value_as_string)
        .filter(|s| !s.is_empty())
}
