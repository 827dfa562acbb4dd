//! Connection profiles
//!
//! A profile names a Swift-compatible auth endpoint together with its
//! credentials and connection settings. Loading and storing profiles is left
//! to the caller; the serde derives let it pick any format.

use serde::{Deserialize, Serialize};

/// Timeout configuration for a profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Connection timeout in milliseconds
    #[serde(default = "default_connect_timeout")]
    pub connect_ms: u64,

    /// Whole-request timeout in milliseconds
    #[serde(default = "default_request_timeout")]
    pub request_ms: u64,
}

fn default_connect_timeout() -> u64 {
    10_000
}

fn default_request_timeout() -> u64 {
    300_000
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_ms: default_connect_timeout(),
            request_ms: default_request_timeout(),
        }
    }
}

/// A profile represents a named Swift auth endpoint and its credentials
#[derive(Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Unique name for this profile
    pub name: String,

    /// Auth endpoint, e.g. `https://swift.example.com/auth/`
    pub auth_endpoint: String,

    /// API version appended to the auth endpoint
    #[serde(default = "default_api_version")]
    pub api_version: String,

    pub username: String,

    pub password: String,

    /// Allow insecure TLS connections
    #[serde(default)]
    pub insecure: bool,

    /// Trace every request at info level
    #[serde(default)]
    pub debug: bool,

    /// Timeout configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<TimeoutConfig>,
}

fn default_api_version() -> String {
    "v1.0".to_string()
}

impl Profile {
    /// Create a new profile with required fields
    pub fn new(
        name: impl Into<String>,
        auth_endpoint: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            auth_endpoint: auth_endpoint.into(),
            api_version: default_api_version(),
            username: username.into(),
            password: password.into(),
            insecure: false,
            debug: false,
            timeout: None,
        }
    }

    /// Get the effective timeout configuration
    pub fn timeout_config(&self) -> TimeoutConfig {
        self.timeout.clone().unwrap_or_default()
    }
}

impl std::fmt::Debug for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Profile")
            .field("name", &self.name)
            .field("auth_endpoint", &self.auth_endpoint)
            .field("api_version", &self.api_version)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("insecure", &self.insecure)
            .field("debug", &self.debug)
            .field("timeout", &self.timeout)
            .finish()
    }
}
