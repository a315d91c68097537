use tracing::debug;

use crate::models::notification::{Context, NotificationKind, context_str};
use crate::models::recipient::{Recipient, Role};

pub fn role_interests(role: Role) -> &'static [NotificationKind] {
    match role {
        Role::Designer => &[
            NotificationKind::NewProject,
            NotificationKind::NewSubtask,
            NotificationKind::StatusChange,
            NotificationKind::CommentAdded,
            NotificationKind::ReplyAdded,
            NotificationKind::CommentResolved,
            NotificationKind::AttachmentAdded,
        ],
        Role::PrintManager => &[
            NotificationKind::StatusChange,
            NotificationKind::SubtaskUpdate,
            NotificationKind::SubtaskSpecsUpdate,
            NotificationKind::CommentAdded,
            NotificationKind::AttachmentAdded,
        ],
        Role::Admin => &[
            NotificationKind::NewProject,
            NotificationKind::NewSubtask,
            NotificationKind::StatusChange,
            NotificationKind::CommentAdded,
            NotificationKind::SubtaskUpdate,
            NotificationKind::AttachmentAdded,
        ],
        Role::Unknown => &[],
    }
}

// Status labels each role cares about when a STATUS_CHANGE fires. Admins are
// not gated on this table; they receive every status change they are
// interested in.
pub fn relevant_statuses(role: Role) -> &'static [&'static str] {
    match role {
        Role::Designer => &["Has Comments", "Awaiting Materials", "On Hold", "Cancelled"],
        Role::PrintManager => &[
            "Design Completed",
            "Ready for Montage",
            "In Montage",
            "Montage Completed",
            "In Printing",
            "Ready for Delivery",
        ],
        Role::Admin => &["Ready for Delivery", "Delivered", "Cancelled", "On Hold"],
        Role::Unknown => &[],
    }
}

pub fn filter_recipients(
    kind: NotificationKind,
    recipients: &[Recipient],
    context: &Context,
) -> Vec<Recipient> {
    let mut filtered = Vec::new();

    for recipient in recipients {
        if !is_role_relevant(kind, recipient.role, context) {
            debug!(
                template_type = %kind,
                role = ?recipient.role,
                phone = %recipient.identifier(),
                "Excluding recipient, role not relevant"
            );
            continue;
        }

        if is_action_creator(recipient, context) {
            debug!(
                template_type = %kind,
                phone = %recipient.identifier(),
                "Excluding recipient, action creator"
            );
            continue;
        }

        if !preferences_allow(recipient, kind, context) {
            debug!(
                template_type = %kind,
                phone = %recipient.identifier(),
                "Excluding recipient, disabled in preferences"
            );
            continue;
        }

        debug!(
            template_type = %kind,
            role = ?recipient.role,
            phone = %recipient.identifier(),
            "Including recipient"
        );
        filtered.push(recipient.clone());
    }

    filtered
}

fn is_role_relevant(kind: NotificationKind, role: Role, context: &Context) -> bool {
    if !role_interests(role).contains(&kind) {
        return false;
    }

    if kind != NotificationKind::StatusChange {
        return true;
    }

    match role {
        // Designers and print managers only hear about statuses on their
        // list. A status change without a readable new status reaches no one
        // in these roles.
        Role::Designer | Role::PrintManager => match context_str(context, "newStatus") {
            Some(new_status) => relevant_statuses(role).contains(&new_status.as_str()),
            None => false,
        },
        _ => true,
    }
}

fn is_action_creator(recipient: &Recipient, context: &Context) -> bool {
    let creator_user_id = context_str(context, "created_by_user_id");
    let creator_phone = context_str(context, "created_by_phone");

    if let (Some(creator_user_id), Some(user_id)) = (&creator_user_id, &recipient.user_id) {
        if creator_user_id == user_id {
            return true;
        }
    }

    if let Some(creator_phone) = creator_phone {
        if normalize_phone(&creator_phone) == normalize_phone(recipient.identifier()) {
            return true;
        }
    }

    false
}

fn preferences_allow(recipient: &Recipient, kind: NotificationKind, context: &Context) -> bool {
    let Some(preferences) = recipient.preferences.as_ref().filter(|p| !p.is_empty()) else {
        return true;
    };

    if kind == NotificationKind::StatusChange {
        if let Some(new_status) = context_str(context, "newStatus") {
            if let Some(enabled) = preferences.get(&format!("STATUS_{new_status}")) {
                return *enabled;
            }
        }
    }

    preferences.get(kind.as_str()).copied().unwrap_or(true)
}

fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(|c| *c != ' ' && *c != '+').collect()
}
