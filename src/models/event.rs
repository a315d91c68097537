//! Immutable snapshots of domain state handed to the event triggers.
//!
//! The owning system builds these from its own transaction (including the
//! before-image where a trigger needs one) so the notifier never reaches
//! back into live domain storage.

#[derive(Debug, Clone, Default)]
pub struct ActorRef {
    pub user_id: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ClientRef {
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRef {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct TaskSnapshot {
    pub id: String,
    pub title: String,
    pub parent_id: Option<String>,
    pub client: Option<ClientRef>,
    pub status: Option<StatusRef>,
    pub urgency: Option<String>,
    pub size: Option<String>,
    pub printing_type: Option<String>,
    pub actor: Option<ActorRef>,
}

impl TaskSnapshot {
    pub fn is_subtask(&self) -> bool {
        self.parent_id.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct CommentSnapshot {
    pub id: String,
    pub task: TaskSnapshot,
    pub parent_comment_id: Option<String>,
    pub text: String,
    pub is_resolved: bool,
    /// Running number of comments on the task, this one included.
    pub comment_count: u64,
    pub author: Option<ActorRef>,
}

#[derive(Debug, Clone)]
pub struct AttachmentSnapshot {
    pub id: String,
    pub task: TaskSnapshot,
    pub file_name: String,
    pub size_bytes: u64,
    /// Running number of attachments on the task, this one included.
    pub attachment_count: u64,
    pub uploaded_by: Option<ActorRef>,
}
