//! Post-send stage: resolve embeddable references and attach previews.

use {
    anyhow::{Context, Result},
    phablink_conduit::{ConduitClient, Preview, resolve_references},
    phablink_refs::RefClass,
    tracing::{debug, info, warn},
};

use crate::{
    host::{AttachmentTitle, ChatMessage, MessageAttachment, MessageExtender, SettingsReader},
    settings::load_tracker_config,
};

/// Stateless post-send hook service.
///
/// Holds the host-supplied HTTP connector; everything else is read fresh
/// per message.
#[derive(Debug, Clone)]
pub struct PostSendEnricher {
    http: reqwest::Client,
}

impl PostSendEnricher {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Whether this sent message references any embeddable object.
    pub fn applies(&self, message: &ChatMessage) -> bool {
        message
            .text
            .as_deref()
            .is_some_and(|text| RefClass::Embeddable.is_match(text))
    }

    /// Resolve embeddable references and attach their previews.
    ///
    /// Tracker trouble never fails the host pipeline: a missing message id
    /// or an unconfigured tracker is a logged no-op, and individual lookup
    /// failures only shrink the preview batch. Extender failures do
    /// propagate, since at that point the previews exist and the host
    /// refused them.
    pub async fn execute(
        &self,
        message: &ChatMessage,
        settings: &dyn SettingsReader,
        extender: &dyn MessageExtender,
    ) -> Result<()> {
        if message.id.as_deref().is_none_or(str::is_empty) {
            debug!("message has no id; skipping preview enrichment");
            return Ok(());
        }
        let Some(text) = message.text.as_deref() else {
            return Ok(());
        };
        let config = match load_tracker_config(settings).await {
            Ok(config) => config,
            Err(error) => {
                warn!(error = %error, "tracker not configured; skipping preview enrichment");
                return Ok(());
            },
        };

        let refs = RefClass::Embeddable.find_all(text);
        let client = ConduitClient::new(self.http.clone(), config);
        let previews = resolve_references(&client, &refs).await;
        publish(extender, message, previews).await
    }
}

impl Default for PostSendEnricher {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

/// Publish resolved previews as one committed attachment batch.
///
/// No-op when the message has no id or when nothing resolved. Publishing
/// happens only after every resolution finished, so the host never sees a
/// partial batch.
pub async fn publish(
    extender: &dyn MessageExtender,
    message: &ChatMessage,
    previews: Vec<Preview>,
) -> Result<()> {
    let Some(message_id) = message.id.as_deref().filter(|id| !id.is_empty()) else {
        debug!("message has no id; dropping resolved previews");
        return Ok(());
    };
    if previews.is_empty() {
        debug!(message_id, "no previews resolved; nothing to attach");
        return Ok(());
    }

    let attachments: Vec<MessageAttachment> = previews.into_iter().map(attachment_for).collect();
    let count = attachments.len();
    extender
        .append_attachments(message_id, &message.sender, attachments)
        .await
        .context("failed to attach tracker previews")?;
    info!(message_id, previews = count, "attached tracker previews");
    Ok(())
}

fn attachment_for(preview: Preview) -> MessageAttachment {
    MessageAttachment {
        title: AttachmentTitle {
            value: format!("{} {}", preview.object_name, preview.title),
            link: preview.uri,
        },
        text: preview.description,
        collapsed: true,
    }
}
