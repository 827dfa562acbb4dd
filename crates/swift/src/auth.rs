//! Authentication against the Swift auth endpoint
//!
//! A successful exchange yields an immutable [`Session`]: the token to send
//! on every storage request and the per-account storage URL.

use reqwest::Client;
use reqwest::header::HeaderMap;
use swift_core::{Error, Profile, Result};

/// Credential header names sent to the auth endpoint
pub const AUTH_USER_HEADER: &str = "X-Auth-User";
pub const AUTH_KEY_HEADER: &str = "X-Auth-Key";

/// Token header sent on every storage request, also returned by auth
pub const STORAGE_TOKEN_HEADER: &str = "X-Storage-Token";

/// Storage URL header returned by auth
pub const STORAGE_URL_HEADER: &str = "X-Storage-Url";

/// Auth endpoint and credentials
#[derive(Clone)]
pub struct Credentials {
    pub auth_endpoint: String,
    pub api_version: String,
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(
        auth_endpoint: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            auth_endpoint: auth_endpoint.into(),
            api_version: "v1.0".to_string(),
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            auth_endpoint: profile.auth_endpoint.clone(),
            api_version: profile.api_version.clone(),
            username: profile.username.clone(),
            password: profile.password.clone(),
        }
    }

    /// Endpoint and version concatenated as-is
    pub fn auth_url(&self) -> String {
        format!("{}{}", self.auth_endpoint, self.api_version)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("auth_endpoint", &self.auth_endpoint)
            .field("api_version", &self.api_version)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// An authenticated session
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    storage_url: String,
}

impl Session {
    /// Build a session from a token and storage URL
    ///
    /// The storage URL must be absolute; a trailing slash is dropped.
    pub fn new(token: impl Into<String>, storage_url: impl Into<String>) -> Result<Self> {
        let token = token.into();
        let storage_url = storage_url.into();

        if token.is_empty() {
            return Err(Error::Auth("empty storage token".into()));
        }
        url::Url::parse(&storage_url)?;

        Ok(Self {
            token,
            storage_url: storage_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn storage_url(&self) -> &str {
        &self.storage_url
    }

    pub(crate) fn container_url(&self, container: &str) -> String {
        format!("{}/{}", self.storage_url, urlencoding::encode(container))
    }

    pub(crate) fn object_url(&self, path: &swift_core::ObjectPath) -> String {
        format!("{}/{}", self.storage_url, encode_object_path(path))
    }
}

/// Percent-encode `container/object`, keeping the slashes inside object names
pub(crate) fn encode_object_path(path: &swift_core::ObjectPath) -> String {
    let object = path
        .object()
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");
    format!("{}/{}", urlencoding::encode(path.container()), object)
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("storage_url", &self.storage_url)
            .finish()
    }
}

/// Exchange credentials for a session, single attempt
pub(crate) async fn authenticate(http: &Client, credentials: &Credentials) -> Result<Session> {
    let url = credentials.auth_url();
    tracing::debug!(url = %url, user = %credentials.username, "authenticating");

    let response = http
        .get(&url)
        .header(AUTH_USER_HEADER, &credentials.username)
        .header(AUTH_KEY_HEADER, &credentials.password)
        .send()
        .await
        .map_err(|e| Error::Transport(format!("Request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(Error::RequestFailed {
            status: status.as_u16(),
            message: if message.is_empty() {
                status.canonical_reason().unwrap_or("auth rejected").to_string()
            } else {
                message
            },
        });
    }

    session_from_headers(response.headers())
}

fn session_from_headers(headers: &HeaderMap) -> Result<Session> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::Auth(format!("response is missing {name}")))
    };

    let token = header(STORAGE_TOKEN_HEADER)?;
    let storage_url = header(STORAGE_URL_HEADER)?;
    Session::new(token, storage_url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;
    use swift_core::ObjectPath;

    #[test]
    fn test_auth_url_is_plain_concatenation() {
        let creds = Credentials::new("http://127.0.0.1:8080/auth/", "test:tester", "testing");
        assert_eq!(creds.auth_url(), "http://127.0.0.1:8080/auth/v1.0");

        let creds = creds.with_api_version("v2");
        assert_eq!(creds.auth_url(), "http://127.0.0.1:8080/auth/v2");
    }

    #[test]
    fn test_credentials_from_profile() {
        let mut profile = Profile::new("p", "https://swift/auth/", "u", "pw");
        profile.api_version = "v1".into();
        let creds = Credentials::from_profile(&profile);
        assert_eq!(creds.auth_url(), "https://swift/auth/v1");
        assert_eq!(creds.password, "pw");
    }

    #[test]
    fn test_debug_hides_secrets() {
        let creds = Credentials::new("http://a/", "user", "s3cret");
        assert!(!format!("{creds:?}").contains("s3cret"));

        let session = Session::new("AUTH_tk123", "http://a/v1/AUTH_x").unwrap();
        assert!(!format!("{session:?}").contains("AUTH_tk123"));
    }

    #[test]
    fn test_session_urls() {
        let session = Session::new("tk", "http://swift:8080/v1/AUTH_test/").unwrap();
        assert_eq!(session.storage_url(), "http://swift:8080/v1/AUTH_test");
        assert_eq!(
            session.container_url("photos"),
            "http://swift:8080/v1/AUTH_test/photos"
        );

        let path = ObjectPath::new("photos", "2024/cat.jpg").unwrap();
        assert_eq!(
            session.object_url(&path),
            "http://swift:8080/v1/AUTH_test/photos/2024/cat.jpg"
        );
    }

    #[test]
    fn test_urls_escape_reserved_characters() {
        let session = Session::new("tk", "http://swift:8080/v1/AUTH_test").unwrap();
        assert_eq!(
            session.container_url("my box"),
            "http://swift:8080/v1/AUTH_test/my%20box"
        );

        let path = ObjectPath::new("my box", "a b/report#1?x=50%").unwrap();
        assert_eq!(
            encode_object_path(&path),
            "my%20box/a%20b/report%231%3Fx%3D50%25"
        );
        assert_eq!(
            session.object_url(&path),
            "http://swift:8080/v1/AUTH_test/my%20box/a%20b/report%231%3Fx%3D50%25"
        );
    }

    #[test]
    fn test_session_rejects_bad_input() {
        assert!(matches!(
            Session::new("", "http://a/v1"),
            Err(Error::Auth(_))
        ));
        assert!(matches!(
            Session::new("tk", "not a url"),
            Err(Error::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_session_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-storage-token", HeaderValue::from_static("AUTH_tk"));
        headers.insert(
            "x-storage-url",
            HeaderValue::from_static("http://swift/v1/AUTH_test"),
        );

        let session = session_from_headers(&headers).unwrap();
        assert_eq!(session.token(), "AUTH_tk");
        assert_eq!(session.storage_url(), "http://swift/v1/AUTH_test");

        headers.remove("x-storage-url");
        assert!(matches!(
            session_from_headers(&headers),
            Err(Error::Auth(_))
        ));
    }
}
