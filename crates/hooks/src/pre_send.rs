//! Pre-send stage: gate on rewritable references and rewrite the body.

use {
    anyhow::Result,
    phablink_refs::{RefClass, rewrite_refs},
};

use crate::{
    host::{ChatMessage, MessageBuilder, SettingsReader},
    settings::load_server_url,
};

/// Stateless pre-send hook service.
///
/// Rewrites link-only (file/paste) and commit references into markdown
/// links before the message first persists. Task and revision references
/// are deliberately left as plain text; they get rich previews after send
/// instead of an inline link.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreSendLinker;

impl PreSendLinker {
    /// Whether this message needs a pre-send rewrite at all.
    ///
    /// Embeddable-only messages answer `false`, so the host skips the
    /// rewrite machinery for them entirely.
    pub fn applies(&self, message: &ChatMessage) -> bool {
        let Some(text) = message.text.as_deref() else {
            return false;
        };
        RefClass::LinkOnly.is_match(text) || RefClass::Commit.is_match(text)
    }

    /// Rewrite the message body and hand it to the host's builder.
    ///
    /// Runs exactly once per message, before it persists. An unset server
    /// setting is not an error; links are built against an empty base.
    pub async fn apply(
        &self,
        message: &ChatMessage,
        settings: &dyn SettingsReader,
        builder: &mut dyn MessageBuilder,
    ) -> Result<()> {
        let text = message.text.as_deref().unwrap_or_default();
        let server_url = load_server_url(settings).await;
        builder.set_text(rewrite_refs(text, &server_url));
        Ok(())
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use {async_trait::async_trait, rstest::rstest};

    use {super::*, crate::settings::SETTING_SERVER_URL};

    struct MemorySettings(HashMap<&'static str, String>);

    #[async_trait]
    impl SettingsReader for MemorySettings {
        async fn value_by_id(&self, id: &str) -> Result<Option<String>> {
            Ok(self.0.get(id).cloned())
        }
    }

    #[derive(Default)]
    struct RecordingBuilder {
        text: Option<String>,
    }

    impl MessageBuilder for RecordingBuilder {
        fn set_text(&mut self, text: String) {
            self.text = Some(text);
        }
    }

    fn message(text: &str) -> ChatMessage {
        ChatMessage {
            id: None,
            sender: "alice".to_string(),
            text: Some(text.to_string()),
        }
    }

    #[rstest]
    #[case("plain chatter", false)]
    #[case("see F99", true)]
    #[case("paste P1234", true)]
    #[case("deploy rBdeadbeef11223", true)]
    #[case("bare deadbeef11223 works too", true)]
    #[case("T1234 alone", false)]
    #[case("D8 alone", false)]
    fn gate_fires_only_for_rewritable_classes(#[case] text: &str, #[case] expected: bool) {
        assert_eq!(PreSendLinker.applies(&message(text)), expected);
    }

    #[test]
    fn gate_ignores_messages_without_text() {
        let message = ChatMessage {
            id: None,
            sender: "alice".to_string(),
            text: None,
        };
        assert!(!PreSendLinker.applies(&message));
    }

    #[tokio::test]
    async fn apply_rewrites_through_the_builder() {
        let settings = MemorySettings(HashMap::from([(
            SETTING_SERVER_URL,
            "https://phab.example.org".to_string(),
        )]));
        let mut builder = RecordingBuilder::default();

        PreSendLinker
            .apply(&message("see F99 and T3"), &settings, &mut builder)
            .await
            .unwrap();

        assert_eq!(
            builder.text.as_deref(),
            Some("see [F99](https://phab.example.org/F99) and T3")
        );
    }

    #[tokio::test]
    async fn apply_without_a_server_setting_uses_an_empty_base() {
        let settings = MemorySettings(HashMap::new());
        let mut builder = RecordingBuilder::default();

        PreSendLinker
            .apply(&message("see F99"), &settings, &mut builder)
            .await
            .unwrap();

        assert_eq!(builder.text.as_deref(), Some("see [F99](/F99)"));
    }
}
