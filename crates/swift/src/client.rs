//! Swift client implementation
//!
//! Wraps reqwest and implements the ObjectStore trait from swift-core.
//! Every operation issues plain HTTP requests against the storage URL of the
//! current session; nothing is retried.

use std::path::Path;

use async_trait::async_trait;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderMap};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use swift_core::{
    ByteSink, Error, ListOptions, ObjectInfo, ObjectPath, ObjectStore, Profile, Result,
    UsageStats, WriterSink, validate_container,
};

use crate::auth::{self, Credentials, STORAGE_TOKEN_HEADER, Session, encode_object_path};
use crate::config::ClientConfig;
use crate::transfer::{chunk_stream, pump_response};

/// Content type used when the caller gives none
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Swift storage client
///
/// Created disconnected; [`connect`](SwiftClient::connect) or
/// [`with_session`](SwiftClient::with_session) supplies the session that
/// every storage operation needs.
pub struct SwiftClient {
    http: reqwest::Client,
    credentials: Credentials,
    config: ClientConfig,
    session: Option<Session>,
}

impl SwiftClient {
    /// Create a disconnected client
    pub fn new(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        let http = config.build_http()?;
        Ok(Self {
            http,
            credentials,
            config,
            session: None,
        })
    }

    /// Create a disconnected client from a stored profile
    pub fn from_profile(profile: &Profile) -> Result<Self> {
        Self::new(
            Credentials::from_profile(profile),
            ClientConfig::from_profile(profile),
        )
    }

    /// Use an existing session instead of authenticating
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    /// Authenticate and store the resulting session
    ///
    /// On failure any previous session is kept as it was.
    pub async fn connect(&mut self) -> Result<&Session> {
        let session = auth::authenticate(&self.http, &self.credentials).await?;
        tracing::debug!(storage_url = %session.storage_url(), "connected");
        Ok(&*self.session.insert(session))
    }

    /// Current session, if connected
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    fn require_session(&self) -> Result<&Session> {
        self.session.as_ref().ok_or(Error::NotConnected)
    }

    fn request(&self, session: &Session, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header(STORAGE_TOKEN_HEADER, session.token())
    }

    /// Send a request, turning transport errors and non-2xx statuses into errors
    async fn send(&self, method: &Method, url: &str, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await.map_err(|e| {
            self.trace(method, url, None);
            Error::Transport(format!("Request failed: {e}"))
        })?;

        let status = response.status();
        self.trace(method, url, Some(status));

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::RequestFailed {
                status: status.as_u16(),
                message: if body.is_empty() {
                    status.canonical_reason().unwrap_or("request failed").to_string()
                } else {
                    body
                },
            });
        }

        Ok(response)
    }

    fn trace(&self, method: &Method, url: &str, status: Option<StatusCode>) {
        let status = status.map(|s| s.as_u16());
        if self.config.debug {
            tracing::info!(%method, url, ?status, "swift request");
        } else {
            tracing::debug!(%method, url, ?status, "swift request");
        }
    }

    async fn download(
        &self,
        session: &Session,
        path: &ObjectPath,
        sink: &mut dyn ByteSink,
    ) -> Result<u64> {
        let url = session.object_url(path);
        let response = self
            .send(&Method::GET, &url, self.request(session, Method::GET, &url))
            .await?;
        pump_response(response, sink).await
    }
}

impl std::fmt::Debug for SwiftClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwiftClient")
            .field("credentials", &self.credentials)
            .field("config", &self.config)
            .field("session", &self.session)
            .finish()
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn header_u64(headers: &HeaderMap, name: &str) -> u64 {
    header_str(headers, name)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0)
}

fn copy_method() -> Result<Method> {
    Method::from_bytes(b"COPY").map_err(|e| Error::General(format!("Invalid method: {e}")))
}

#[async_trait]
impl ObjectStore for SwiftClient {
    async fn list(&self, container: Option<&str>, options: &ListOptions) -> Result<Vec<String>> {
        let session = self.require_session()?;

        let mut url = match container.filter(|c| !c.is_empty()) {
            Some(c) => session.container_url(c),
            None => session.storage_url().to_string(),
        };

        if options.is_paginated() {
            let limit = options.limit.map(|l| l.to_string()).unwrap_or_default();
            let marker = options.marker.as_deref().unwrap_or_default();
            url.push_str(&format!(
                "?limit={limit}&marker={}",
                urlencoding::encode(marker)
            ));
        }

        let response = self
            .send(&Method::GET, &url, self.request(session, Method::GET, &url))
            .await?;
        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(format!("Failed to read response: {e}")))?;

        Ok(body
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    async fn stat_object(&self, path: &ObjectPath) -> Result<ObjectInfo> {
        let session = self.require_session()?;
        let url = session.object_url(path);

        let response = self
            .send(&Method::HEAD, &url, self.request(session, Method::HEAD, &url))
            .await?;
        let headers = response.headers();

        let mut info = ObjectInfo::new(path.object());
        info.size_bytes = header_str(headers, "content-length").and_then(|v| v.parse().ok());
        info.last_modified = header_str(headers, "last-modified").map(str::to_string);
        info.etag = header_str(headers, "etag").map(str::to_string);
        info.content_type = header_str(headers, "content-type").map(str::to_string);

        Ok(info)
    }

    async fn copy_object(&self, src: &ObjectPath, dst: &ObjectPath) -> Result<()> {
        let session = self.require_session()?;

        // COPY must carry the source content type
        let info = self.stat_object(src).await?;
        let content_type = info
            .content_type
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        let url = session.object_url(src);
        let method = copy_method()?;
        let builder = self
            .request(session, method.clone(), &url)
            .header("Destination", encode_object_path(dst))
            .header(CONTENT_TYPE, content_type);

        self.send(&method, &url, builder).await?;
        Ok(())
    }

    async fn move_object(&self, src: &ObjectPath, dst: &ObjectPath) -> Result<()> {
        self.require_session()?;

        if src == dst {
            tracing::debug!(path = %src, "move onto itself, nothing to do");
            return Ok(());
        }

        self.copy_object(src, dst).await?;

        if let Err(cause) = self.remove_object(src).await {
            tracing::warn!(from = %src, to = %dst, error = %cause, "copied but could not remove source");
            return Err(Error::MoveIncomplete {
                from: src.to_string(),
                to: dst.to_string(),
                cause: Box::new(cause),
            });
        }

        Ok(())
    }

    async fn create_container(&self, container: &str) -> Result<()> {
        let session = self.require_session()?;
        validate_container(container)?;

        let url = session.container_url(container);
        let builder = self
            .request(session, Method::PUT, &url)
            .header(CONTENT_LENGTH, 0);

        self.send(&Method::PUT, &url, builder).await?;
        Ok(())
    }

    async fn remove_container(&self, container: &str) -> Result<()> {
        let session = self.require_session()?;
        validate_container(container)?;

        let url = session.container_url(container);
        self.send(
            &Method::DELETE,
            &url,
            self.request(session, Method::DELETE, &url),
        )
        .await?;
        Ok(())
    }

    async fn usage(&self, container: Option<&str>) -> Result<UsageStats> {
        let session = self.require_session()?;
        let container = container.filter(|c| !c.is_empty());

        let url = match container {
            Some(c) => session.container_url(c),
            None => session.storage_url().to_string(),
        };

        let response = self
            .send(&Method::HEAD, &url, self.request(session, Method::HEAD, &url))
            .await?;
        let headers = response.headers();

        let stats = match container {
            Some(_) => UsageStats {
                bytes_used: header_u64(headers, "x-container-bytes-used"),
                object_count: header_u64(headers, "x-container-object-count"),
                container_count: None,
            },
            None => UsageStats {
                bytes_used: header_u64(headers, "x-account-bytes-used"),
                object_count: header_u64(headers, "x-account-object-count"),
                container_count: Some(header_u64(headers, "x-account-container-count")),
            },
        };

        Ok(stats)
    }

    async fn get_object(&self, path: &ObjectPath) -> Result<Vec<u8>> {
        let session = self.require_session()?;
        let url = session.object_url(path);

        let response = self
            .send(&Method::GET, &url, self.request(session, Method::GET, &url))
            .await?;
        let data = response
            .bytes()
            .await
            .map_err(|e| Error::Transport(format!("Failed to read response: {e}")))?;

        Ok(data.to_vec())
    }

    async fn put_object(
        &self,
        path: &ObjectPath,
        data: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<()> {
        let session = self.require_session()?;
        if data.is_empty() {
            return Err(Error::InvalidArgument("No data to upload".into()));
        }

        let url = session.object_url(path);
        let builder = self
            .request(session, Method::PUT, &url)
            .header(CONTENT_TYPE, content_type.unwrap_or(DEFAULT_CONTENT_TYPE))
            .body(data);

        self.send(&Method::PUT, &url, builder).await?;
        Ok(())
    }

    async fn get_file(&self, path: &ObjectPath, dest: &Path) -> Result<u64> {
        let session = self.require_session()?;
        if dest.as_os_str().is_empty() {
            return Err(Error::InvalidArgument(
                "Destination path cannot be empty".into(),
            ));
        }

        let file = tokio::fs::File::create(dest).await?;
        let mut sink = WriterSink::new(file);
        self.download(session, path, &mut sink).await
    }

    async fn put_file(
        &self,
        path: &ObjectPath,
        src: &Path,
        content_type: Option<&str>,
    ) -> Result<u64> {
        let session = self.require_session()?;
        let size = match tokio::fs::metadata(src).await {
            Ok(meta) if meta.is_file() => meta.len(),
            _ => {
                return Err(Error::InvalidArgument(format!(
                    "Source file not found: {}",
                    src.display()
                )));
            }
        };

        let file = tokio::fs::File::open(src).await?;

        let url = session.object_url(path);
        let builder = self
            .request(session, Method::PUT, &url)
            .header(CONTENT_TYPE, content_type.unwrap_or(DEFAULT_CONTENT_TYPE))
            .header(CONTENT_LENGTH, size)
            .body(reqwest::Body::wrap_stream(chunk_stream(file, size)));

        self.send(&Method::PUT, &url, builder).await?;
        Ok(size)
    }

    async fn stream_object(&self, path: &ObjectPath, sink: &mut dyn ByteSink) -> Result<u64> {
        let session = self.require_session()?;
        sink.check()?;
        self.download(session, path, sink).await
    }

    async fn remove_object(&self, path: &ObjectPath) -> Result<()> {
        let session = self.require_session()?;
        let url = session.object_url(path);

        let builder = self
            .request(session, Method::DELETE, &url)
            .header(CONTENT_LENGTH, 0);

        self.send(&Method::DELETE, &url, builder).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> SwiftClient {
        SwiftClient::new(
            Credentials::new("http://127.0.0.1:8080/auth/", "test:tester", "testing"),
            ClientConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_new_client_is_disconnected() {
        let client = client();
        assert!(!client.is_connected());
        assert!(client.session().is_none());
        assert!(matches!(client.require_session(), Err(Error::NotConnected)));
    }

    #[test]
    fn test_with_session() {
        let session = Session::new("tk", "http://127.0.0.1:8080/v1/AUTH_test").unwrap();
        let client = client().with_session(session.clone());
        assert!(client.is_connected());
        assert_eq!(client.session(), Some(&session));
    }

    #[test]
    fn test_from_profile() {
        let profile = Profile::new("saio", "http://127.0.0.1:8080/auth/", "test:tester", "testing");
        let client = SwiftClient::from_profile(&profile).unwrap();
        assert_eq!(
            client.credentials().auth_url(),
            "http://127.0.0.1:8080/auth/v1.0"
        );
        assert!(!client.is_connected());
    }

    #[test]
    fn test_header_u64() {
        let mut headers = HeaderMap::new();
        headers.insert("x-account-bytes-used", "1024".parse().unwrap());
        headers.insert("x-account-object-count", "many".parse().unwrap());

        assert_eq!(header_u64(&headers, "x-account-bytes-used"), 1024);
        assert_eq!(header_u64(&headers, "x-account-object-count"), 0);
        assert_eq!(header_u64(&headers, "x-account-container-count"), 0);
    }

    #[test]
    fn test_copy_method() {
        assert_eq!(copy_method().unwrap().as_str(), "COPY");
    }
}
