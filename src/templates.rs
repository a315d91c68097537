use std::collections::HashMap;
use std::str::FromStr;

use thiserror::Error;
use tracing::{error, warn};

use crate::models::notification::{Context, NotificationKind, value_as_string};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unknown notification type: {0}")]
    UnknownType(String),

    #[error("missing required placeholders for {kind}: {}", .keys.join(", "))]
    MissingPlaceholders {
        kind: NotificationKind,
        keys: Vec<String>,
    },

    #[error("placeholder {{{0}}} has no value in context")]
    UnresolvedPlaceholder(String),

    #[error("malformed template: {0}")]
    MalformedTemplate(&'static str),
}

pub fn default_template(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::NewProject => {
            "🆕 *مشروع جديد*\n\n📌 المشروع: {taskTitle}\n👤 العميل: {clientName}\n🔢 كود العميل: {clientCode}\n📊 الحالة: {status}\n⚡ الأولوية: {urgency}"
        }
        NotificationKind::NewSubtask => {
            "➕ *بند جديد*\n\n📋 البند: {taskTitle}\n👤 العميل: {clientName}\n🔢 كود العميل: {clientCode}\n📊 الحالة: {status}"
        }
        NotificationKind::SubtaskUpdate => {
            "✏️ *تعديل بند*\n\n📋 البند: {taskTitle}\n👤 العميل: {clientName}\n🔢 كود العميل: {clientCode}\n📏 المقاس: {size}\n🖨️ نوع الطباعة: {printingType}"
        }
        NotificationKind::SubtaskSpecsUpdate => {
            "⚙️ *تعديل مواصفات*\n\n📋 البند: {taskTitle}\n👤 العميل: {clientName}\n🔢 كود العميل: {clientCode}\n📏 المقاس: {size}\n🖨️ نوع الطباعة: {printingType}"
        }
        NotificationKind::StatusChange => {
            "🔄 *تحديث الحالة*\n\n📋 البند: {taskTitle}\n👤 العميل: {clientName}\n🔢 كود العميل: {clientCode}\n✅ {statusMessage}\n📊 الحالة السابقة: {oldStatus}\n📊 الحالة الجديدة: {newStatus}"
        }
        NotificationKind::CommentAdded => {
            "💬 *ملاحظة جديدة*\n\n📋 {taskLabel}: {taskTitle}\n👤 العميل: {clientName}\n🔢 كود العميل: {clientCode}\n📝 الملاحظة: {commentText}\n🔢 عدد الملاحظات: {commentCount}"
        }
        NotificationKind::ReplyAdded => {
            "↩️ *رد جديد*\n\n📋 {taskLabel}: {taskTitle}\n👤 العميل: {clientName}\n🔢 كود العميل: {clientCode}\n💬 الرد: {commentText}"
        }
        NotificationKind::CommentResolved => {
            "✅ *تم حل الملاحظة*\n\n📋 {taskLabel}: {taskTitle}\n👤 العميل: {clientName}\n🔢 كود العميل: {clientCode}\n🎉 تم حل الملاحظة بنجاح"
        }
        NotificationKind::AttachmentAdded => {
            "📎 *مرفقات جديدة*\n\n📋 {taskLabel}: {taskTitle}\n👤 العميل: {clientName}\n🔢 كود العميل: {clientCode}\n📁 عدد المرفقات: {attachmentCount}\n📄 الملفات: {attachmentNames}"
        }
    }
}

pub fn required_placeholders(kind: NotificationKind) -> &'static [&'static str] {
    match kind {
        NotificationKind::NewProject => {
            &["taskTitle", "clientName", "clientCode", "status", "urgency"]
        }
        NotificationKind::NewSubtask => &["taskTitle", "clientName", "clientCode", "status"],
        NotificationKind::SubtaskUpdate | NotificationKind::SubtaskSpecsUpdate => {
            &["taskTitle", "clientName", "clientCode", "size", "printingType"]
        }
        NotificationKind::StatusChange => &[
            "taskTitle",
            "clientName",
            "clientCode",
            "statusMessage",
            "oldStatus",
            "newStatus",
        ],
        NotificationKind::CommentAdded => &[
            "taskTitle",
            "clientName",
            "clientCode",
            "taskLabel",
            "commentText",
            "commentCount",
        ],
        NotificationKind::ReplyAdded => &[
            "taskTitle",
            "clientName",
            "clientCode",
            "taskLabel",
            "commentText",
        ],
        NotificationKind::CommentResolved => &["taskTitle", "clientName", "clientCode", "taskLabel"],
        NotificationKind::AttachmentAdded => &[
            "taskTitle",
            "clientName",
            "clientCode",
            "taskLabel",
            "attachmentCount",
            "attachmentNames",
        ],
    }
}

pub fn render(
    kind: NotificationKind,
    context: &Context,
    custom_templates: Option<&HashMap<String, String>>,
) -> Result<String, TemplateError> {
    let template = custom_templates
        .and_then(|templates| templates.get(kind.as_str()))
        .map(String::as_str)
        .filter(|template| !template.trim().is_empty())
        .unwrap_or_else(|| default_template(kind));

    let missing: Vec<String> = required_placeholders(kind)
        .iter()
        .filter(|key| !context.contains_key(**key))
        .map(|key| key.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(TemplateError::MissingPlaceholders {
            kind,
            keys: missing,
        });
    }

    substitute(template, context)
}

pub fn validate(template: &str, kind: NotificationKind) -> bool {
    let missing: Vec<&str> = required_placeholders(kind)
        .iter()
        .copied()
        .filter(|key| !template.contains(&format!("{{{key}}}")))
        .collect();

    if missing.is_empty() {
        return true;
    }

    error!(
        template_type = %kind,
        missing = %missing.join(", "),
        "Template is missing required placeholders"
    );
    false
}

pub fn validate_for_code(template: &str, code: &str) -> bool {
    match NotificationKind::from_str(code) {
        Ok(kind) => validate(template, kind),
        Err(error) => {
            warn!(template_type = %code, error = %error, "Cannot validate template");
            false
        }
    }
}

// Single-pass replacement of `{key}` tokens. `{{` and `}}` escape to
// literal braces; any other unpaired brace or an empty `{}` is malformed.
fn substitute(template: &str, context: &Context) -> Result<String, TemplateError> {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find(['{', '}']) {
        rendered.push_str(&rest[..pos]);
        let brace = rest.as_bytes()[pos];
        let after = &rest[pos + 1..];

        if after.as_bytes().first() == Some(&brace) {
            rendered.push(brace as char);
            rest = &after[1..];
            continue;
        }

        if brace == b'}' {
            return Err(TemplateError::MalformedTemplate("single '}' in template"));
        }

        let close = match after.find(['{', '}']) {
            Some(close) if after.as_bytes()[close] == b'}' => close,
            _ => return Err(TemplateError::MalformedTemplate("single '{' in template")),
        };
        let key = &after[..close];
        if key.is_empty() {
            return Err(TemplateError::MalformedTemplate("empty placeholder"));
        }

        match context.get(key) {
            Some(value) => {
                let text = value_as_string(value).unwrap_or_else(|| value.to_string());
                rendered.push_str(&text);
            }
            None => return Err(TemplateError::UnresolvedPlaceholder(key.to_string())),
        }
        rest = &after[close + 1..];
    }

    rendered.push_str(rest);
    Ok(rendered)
}
