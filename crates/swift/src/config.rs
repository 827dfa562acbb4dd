//! HTTP client configuration

use std::time::Duration;

use swift_core::{Error, Profile, Result};

/// Settings for the underlying HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Whole-request timeout, `None` to wait indefinitely
    pub timeout: Option<Duration>,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// Accept invalid TLS certificates (testing only)
    pub insecure: bool,

    /// User-Agent header value
    pub user_agent: String,

    /// Trace every request at info level instead of debug
    pub debug: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(300)),
            connect_timeout: Duration::from_secs(10),
            insecure: false,
            user_agent: format!("swift-client/{}", env!("CARGO_PKG_VERSION")),
            debug: false,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive settings from a stored profile
    pub fn from_profile(profile: &Profile) -> Self {
        let timeouts = profile.timeout_config();
        Self {
            timeout: Some(Duration::from_millis(timeouts.request_ms)),
            connect_timeout: Duration::from_millis(timeouts.connect_ms),
            insecure: profile.insecure,
            debug: profile.debug,
            ..Self::default()
        }
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub(crate) fn build_http(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .user_agent(&self.user_agent)
            .danger_accept_invalid_certs(self.insecure);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        builder
            .build()
            .map_err(|e| Error::Transport(format!("Failed to create HTTP client: {e}")))
    }
}
