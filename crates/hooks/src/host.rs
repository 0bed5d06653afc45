//! Seams implemented by the hosting chat runtime.

use {anyhow::Result, async_trait::async_trait, serde::Serialize};

/// Read-only view of a host-owned chat message.
///
/// `id` is absent until the host has persisted the message, so pre-send
/// hooks usually see `None`. `text` is absent for non-text payloads.
#[derive(Debug, Clone, Default)]
pub struct ChatMessage {
    pub id: Option<String>,
    pub sender: String,
    pub text: Option<String>,
}

/// Host settings store, keyed by setting id.
#[async_trait]
pub trait SettingsReader: Send + Sync {
    /// The configured value for `id`, or `None` when unset.
    async fn value_by_id(&self, id: &str) -> Result<Option<String>>;
}

/// Pre-send message builder; receives the rewritten body.
pub trait MessageBuilder: Send {
    fn set_text(&mut self, text: String);
}

/// Post-send message extension.
///
/// Appends one batch of attachments to an already-sent message and commits
/// the modification in a single step, so readers never observe a partially
/// attached batch.
#[async_trait]
pub trait MessageExtender: Send + Sync {
    async fn append_attachments(
        &self,
        message_id: &str,
        sender: &str,
        attachments: Vec<MessageAttachment>,
    ) -> Result<()>;
}

/// Linked title line of a preview attachment.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AttachmentTitle {
    pub value: String,
    pub link: String,
}

/// Preview attachment in the host's attachment schema.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MessageAttachment {
    pub title: AttachmentTitle,
    pub text: String,
    /// Rendered collapsed; the reader expands the preview on demand.
    pub collapsed: bool,
}
