//! Tracker settings: ids, registration metadata and per-operation loading.

use {
    anyhow::{Context, Result, bail},
    phablink_conduit::TrackerConfig,
    serde::Serialize,
    tracing::warn,
};

use crate::host::SettingsReader;

/// Setting id for the tracker base URL.
pub const SETTING_SERVER_URL: &str = "phabricator_server";

/// Setting id for the Conduit API token.
pub const SETTING_API_TOKEN: &str = "phabricator_apikey";

/// Registration metadata for one host-managed setting.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SettingDefinition {
    pub id: &'static str,
    pub required: bool,
    pub public: bool,
    pub default_value: &'static str,
    pub i18n_label: &'static str,
    pub i18n_description: &'static str,
}

/// The settings the host must register at install time.
///
/// Both are required and non-public. Defaults ship empty so every install
/// supplies its own tracker location and credential.
pub fn setting_definitions() -> [SettingDefinition; 2] {
    [
        SettingDefinition {
            id: SETTING_SERVER_URL,
            required: true,
            public: false,
            default_value: "",
            i18n_label: "phabricator_serverurl",
            i18n_description: "phabricator_serverurl_description",
        },
        SettingDefinition {
            id: SETTING_API_TOKEN,
            required: true,
            public: false,
            default_value: "",
            i18n_label: "phabricator_apikey",
            i18n_description: "phabricator_apikey_description",
        },
    ]
}

/// Load the full tracker configuration from the host store.
///
/// Missing or blank values are an error; callers decide whether that
/// degrades to a no-op or propagates.
pub async fn load_tracker_config(settings: &dyn SettingsReader) -> Result<TrackerConfig> {
    let server_url = require(settings, SETTING_SERVER_URL).await?;
    let api_token = require(settings, SETTING_API_TOKEN).await?;
    Ok(TrackerConfig::new(server_url, api_token))
}

/// Load the server base URL for pre-send rewriting.
///
/// An unset or unreadable value resolves to an empty base so rewriting
/// still succeeds; links then point at the tracker-relative path.
pub async fn load_server_url(settings: &dyn SettingsReader) -> String {
    match settings.value_by_id(SETTING_SERVER_URL).await {
        Ok(Some(value)) => value.trim().to_string(),
        Ok(None) => String::new(),
        Err(error) => {
            warn!(error = %error, "failed to read the tracker server url");
            String::new()
        },
    }
}

async fn require(settings: &dyn SettingsReader, id: &str) -> Result<String> {
    let value = settings
        .value_by_id(id)
        .await
        .with_context(|| format!("failed to read setting `{id}`"))?;
    match value.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => bail!("required setting `{id}` is not configured"),
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use super::*;

    struct MemorySettings(HashMap<&'static str, String>);

    #[async_trait]
    impl SettingsReader for MemorySettings {
        async fn value_by_id(&self, id: &str) -> Result<Option<String>> {
            Ok(self.0.get(id).cloned())
        }
    }

    fn configured() -> MemorySettings {
        MemorySettings(HashMap::from([
            (SETTING_SERVER_URL, "https://phab.example.org".to_string()),
            (SETTING_API_TOKEN, "api-test-token".to_string()),
        ]))
    }

    #[tokio::test]
    async fn load_tracker_config_reads_both_settings() {
        let config = load_tracker_config(&configured()).await.unwrap();
        assert_eq!(config.server_url, "https://phab.example.org");
    }

    #[tokio::test]
    async fn load_tracker_config_rejects_blank_values() {
        let settings = MemorySettings(HashMap::from([
            (SETTING_SERVER_URL, "https://phab.example.org".to_string()),
            (SETTING_API_TOKEN, "   ".to_string()),
        ]));
        let err = load_tracker_config(&settings).await.unwrap_err();
        assert!(err.to_string().contains(SETTING_API_TOKEN));
    }

    #[tokio::test]
    async fn load_server_url_defaults_to_empty() {
        let settings = MemorySettings(HashMap::new());
        assert_eq!(load_server_url(&settings).await, "");
    }

    #[tokio::test]
    async fn loaded_values_are_trimmed() {
        let settings = MemorySettings(HashMap::from([
            (SETTING_SERVER_URL, "  https://phab.example.org/ ".to_string()),
            (SETTING_API_TOKEN, " api-test-token ".to_string()),
        ]));
        let config = load_tracker_config(&settings).await.unwrap();
        assert_eq!(config.server_url, "https://phab.example.org/");
        assert_eq!(load_server_url(&settings).await, "https://phab.example.org/");
    }

    #[test]
    fn definitions_cover_both_settings_with_empty_defaults() {
        let definitions = setting_definitions();
        assert_eq!(definitions.len(), 2);
        assert!(definitions.iter().all(|def| def.required && !def.public));
        assert!(definitions.iter().all(|def| def.default_value.is_empty()));
        assert_eq!(definitions[0].id, SETTING_SERVER_URL);
        assert_eq!(definitions[1].id, SETTING_API_TOKEN);
    }
}
