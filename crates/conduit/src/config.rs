//! Connection settings for the configured Phabricator instance.

use secrecy::Secret;

/// Server location and credential for Conduit calls.
///
/// Loaded fresh from the host's settings store for every operation; nothing
/// here is cached across messages, so setting changes take effect on the
/// next message.
#[derive(Clone)]
pub struct TrackerConfig {
    /// Base URL of the tracker, e.g. `https://phab.example.org`.
    pub server_url: String,

    /// Conduit API token used to authenticate every call.
    pub api_token: Secret<String>,
}

impl TrackerConfig {
    pub fn new(server_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            api_token: Secret::new(api_token.into()),
        }
    }

    /// Base URL with trailing slashes removed.
    pub(crate) fn base(&self) -> &str {
        self.server_url.trim_end_matches('/')
    }
}

impl std::fmt::Debug for TrackerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackerConfig")
            .field("server_url", &self.server_url)
            .field("api_token", &"[REDACTED]")
            .finish()
    }
}
