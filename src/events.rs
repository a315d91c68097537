use serde_json::Value;
use tracing::debug;

use crate::dispatch::Dispatcher;
use crate::models::event::{ActorRef, AttachmentSnapshot, CommentSnapshot, StatusRef, TaskSnapshot};
use crate::models::notification::{Context, NotificationKind};

// Fallback label for fields the task record leaves blank.
pub const UNSPECIFIED: &str = "غير محدد";

const STATUS_UPDATED_MESSAGE: &str = "تم تحديث الحالة";
const PARENT_TASK_LABEL: &str = "المشروع";
const SUBTASK_LABEL: &str = "البند";
const COMMENT_PREVIEW_CHARS: usize = 100;

pub struct EventNotifier {
    dispatcher: Dispatcher,
}

impl EventNotifier {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    // Only parent tasks announce their creation; a subtask goes out through
    // subtask_created instead.
    pub async fn task_created(&self, task: &TaskSnapshot) -> bool {
        if task.is_subtask() {
            debug!(task_id = %task.id, "Skipping creation notification for subtask");
            return false;
        }

        let mut context = base_task_context(task);
        context.insert("status".to_string(), Value::from(status_label(task)));
        context.insert(
            "urgency".to_string(),
            Value::from(
                task.urgency
                    .clone()
                    .filter(|urgency| !urgency.is_empty())
                    .unwrap_or_else(|| "Normal".to_string()),
            ),
        );
        add_actor(&mut context, task.actor.as_ref());

        self.dispatcher
            .dispatch(NotificationKind::NewProject, &task.id, &context)
            .await
    }

    pub async fn subtask_created(&self, task: &TaskSnapshot) -> bool {
        if !task.is_subtask() {
            debug!(task_id = %task.id, "Skipping subtask notification for parent task");
            return false;
        }

        let mut context = base_task_context(task);
        context.insert("status".to_string(), Value::from(status_label(task)));
        add_actor(&mut context, task.actor.as_ref());

        self.dispatcher
            .dispatch(NotificationKind::NewSubtask, &task.id, &context)
            .await
    }

    pub async fn task_status_changed(
        &self,
        task: &TaskSnapshot,
        old_status: &StatusRef,
        new_status: &StatusRef,
    ) -> bool {
        if task.is_subtask() {
            debug!(task_id = %task.id, "Skipping status change notification for subtask");
            return false;
        }

        if old_status.id == new_status.id {
            debug!(task_id = %task.id, "Status unchanged, nothing to announce");
            return false;
        }

        let mut context = base_task_context(task);
        context.insert(
            "statusMessage".to_string(),
            Value::from(STATUS_UPDATED_MESSAGE),
        );
        context.insert("oldStatus".to_string(), Value::from(old_status.label.clone()));
        context.insert("newStatus".to_string(), Value::from(new_status.label.clone()));
        add_actor(&mut context, task.actor.as_ref());

        self.dispatcher
            .dispatch(NotificationKind::StatusChange, &task.id, &context)
            .await
    }

    // A comment with a parent goes out as a reply, a top-level comment as a
    // new note. Both carry the running comment count for the task.
    pub async fn comment_added(&self, comment: &CommentSnapshot) -> bool {
        let kind = if comment.parent_comment_id.is_some() {
            NotificationKind::ReplyAdded
        } else {
            NotificationKind::CommentAdded
        };
        debug!(
            comment_id = %comment.id,
            template_type = %kind,
            "Routing comment notification"
        );

        let mut context = base_task_context(&comment.task);
        context.insert(
            "taskLabel".to_string(),
            Value::from(task_label(&comment.task)),
        );
        context.insert(
            "commentText".to_string(),
            Value::from(comment_preview(&comment.text)),
        );
        context.insert(
            "commentCount".to_string(),
            Value::from(comment.comment_count),
        );
        add_actor(&mut context, comment.author.as_ref());

        self.dispatcher
            .dispatch(kind, &comment.task.id, &context)
            .await
    }

    // Fires only on the false -> true edge; was_resolved is the flag as it
    // stood before this save.
    pub async fn comment_resolved(&self, comment: &CommentSnapshot, was_resolved: bool) -> bool {
        if was_resolved || !comment.is_resolved {
            debug!(comment_id = %comment.id, "Resolution unchanged, nothing to announce");
            return false;
        }

        let mut context = base_task_context(&comment.task);
        context.insert(
            "taskLabel".to_string(),
            Value::from(task_label(&comment.task)),
        );
        context.insert(
            "commentText".to_string(),
            Value::from(comment_preview(&comment.text)),
        );
        add_actor(&mut context, comment.author.as_ref());

        self.dispatcher
            .dispatch(NotificationKind::CommentResolved, &comment.task.id, &context)
            .await
    }

    pub async fn attachment_added(&self, attachment: &AttachmentSnapshot) -> bool {
        debug!(
            attachment_id = %attachment.id,
            file_name = %attachment.file_name,
            "Announcing new attachment"
        );

        let mut context = base_task_context(&attachment.task);
        context.insert(
            "taskLabel".to_string(),
            Value::from(task_label(&attachment.task)),
        );
        context.insert(
            "attachmentCount".to_string(),
            Value::from(attachment.attachment_count),
        );
        context.insert(
            "attachmentNames".to_string(),
            Value::from(attachment.file_name.clone()),
        );
        context.insert(
            "fileName".to_string(),
            Value::from(attachment.file_name.clone()),
        );
        context.insert(
            "fileSize".to_string(),
            Value::from(format_file_size(attachment.size_bytes)),
        );
        add_actor(&mut context, attachment.uploaded_by.as_ref());

        self.dispatcher
            .dispatch(
                NotificationKind::AttachmentAdded,
                &attachment.task.id,
                &context,
            )
            .await
    }

    pub async fn subtask_updated(&self, task: &TaskSnapshot) -> bool {
        self.subtask_change(task, NotificationKind::SubtaskUpdate)
            .await
    }

    pub async fn subtask_specs_updated(&self, task: &TaskSnapshot) -> bool {
        self.subtask_change(task, NotificationKind::SubtaskSpecsUpdate)
            .await
    }

    async fn subtask_change(&self, task: &TaskSnapshot, kind: NotificationKind) -> bool {
        if !task.is_subtask() {
            debug!(task_id = %task.id, "Skipping subtask notification for parent task");
            return false;
        }

        let mut context = base_task_context(task);
        context.insert(
            "size".to_string(),
            Value::from(
                task.size
                    .clone()
                    .filter(|size| !size.is_empty())
                    .unwrap_or_else(|| UNSPECIFIED.to_string()),
            ),
        );
        context.insert(
            "printingType".to_string(),
            Value::from(
                task.printing_type
                    .clone()
                    .filter(|printing_type| !printing_type.is_empty())
                    .unwrap_or_else(|| UNSPECIFIED.to_string()),
            ),
        );
        add_actor(&mut context, task.actor.as_ref());

        self.dispatcher.dispatch(kind, &task.id, &context).await
    }
}

fn base_task_context(task: &TaskSnapshot) -> Context {
    let mut context = Context::new();
    context.insert("taskTitle".to_string(), Value::from(task.title.clone()));
    context.insert("clientName".to_string(), Value::from(client_name(task)));
    context.insert("clientCode".to_string(), Value::from(client_code(task)));
    context
}

fn client_name(task: &TaskSnapshot) -> String {
    task.client
        .as_ref()
        .map(|client| client.name.clone())
        .unwrap_or_else(|| UNSPECIFIED.to_string())
}

fn client_code(task: &TaskSnapshot) -> String {
    task.client
        .as_ref()
        .map(|client| client.code.clone())
        .unwrap_or_else(|| UNSPECIFIED.to_string())
}

fn status_label(task: &TaskSnapshot) -> String {
    task.status
        .as_ref()
        .map(|status| status.label.clone())
        .unwrap_or_else(|| UNSPECIFIED.to_string())
}

fn task_label(task: &TaskSnapshot) -> &'static str {
    if task.is_subtask() {
        SUBTASK_LABEL
    } else {
        PARENT_TASK_LABEL
    }
}

fn add_actor(context: &mut Context, actor: Option<&ActorRef>) {
    let Some(actor) = actor else {
        return;
    };

    if let Some(user_id) = &actor.user_id {
        context.insert(
            "created_by_user_id".to_string(),
            Value::from(user_id.clone()),
        );
    }
    if let Some(phone) = &actor.phone {
        context.insert("created_by_phone".to_string(), Value::from(phone.clone()));
    }
}

pub fn comment_preview(text: &str) -> String {
    let mut preview: String = text.chars().take(COMMENT_PREVIEW_CHARS).collect();
    if text.chars().count() > COMMENT_PREVIEW_CHARS {
        preview.push_str("...");
    }
    preview
}

pub fn format_file_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} بايت")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} كيلوبايت", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} ميجابايت", bytes as f64 / (1024.0 * 1024.0))
    }
}
