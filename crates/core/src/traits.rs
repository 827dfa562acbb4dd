//! ObjectStore trait definition
//!
//! This trait defines the interface for Swift-compatible storage operations.
//! It allows callers to be decoupled from the HTTP implementation.

use std::path::Path;

use async_trait::async_trait;
use jiff::Timestamp;
use jiff::fmt::rfc2822::DateTimeParser;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::path::ObjectPath;
use crate::sink::ByteSink;

static HTTP_DATE: DateTimeParser = DateTimeParser::new();

/// Metadata for an object, as returned by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectInfo {
    /// Object name
    pub key: String,

    /// Size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,

    /// Last-Modified header value, verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,

    /// Entity tag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,

    /// Content type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl ObjectInfo {
    /// Create a new ObjectInfo with only a key
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            size_bytes: None,
            last_modified: None,
            etag: None,
            content_type: None,
        }
    }

    /// Human-readable size
    pub fn size_human(&self) -> Option<String> {
        self.size_bytes
            .map(|size| humansize::format_size(size, humansize::BINARY))
    }

    /// Parse the Last-Modified header as an HTTP date
    pub fn last_modified_at(&self) -> Option<Timestamp> {
        let raw = self.last_modified.as_deref()?;
        HTTP_DATE.parse_timestamp(raw).ok()
    }
}

/// Byte and object counters for an account or a container
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageStats {
    pub bytes_used: u64,
    pub object_count: u64,

    /// Only reported for account-level queries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_count: Option<u64>,
}

/// Pagination for listings
///
/// When either field is set, both `limit` and `marker` are sent, the
/// missing one as an empty value.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Maximum number of names to return
    pub limit: Option<u32>,

    /// Return names after this one
    pub marker: Option<String>,
}

impl ListOptions {
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    /// Whether any pagination parameter is present
    pub fn is_paginated(&self) -> bool {
        self.limit.is_some() || self.marker.is_some()
    }
}

/// Trait for Swift-compatible storage operations
///
/// Every operation requires an established session and fails with
/// [`Error::NotConnected`](crate::Error::NotConnected) otherwise, without
/// touching the network.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List container names, or object names when `container` is given
    async fn list(&self, container: Option<&str>, options: &ListOptions) -> Result<Vec<String>>;

    /// Get object metadata
    async fn stat_object(&self, path: &ObjectPath) -> Result<ObjectInfo>;

    /// Server-side copy, preserving the source content type
    async fn copy_object(&self, src: &ObjectPath, dst: &ObjectPath) -> Result<()>;

    /// Copy then remove the source
    ///
    /// If the copy succeeds and the removal fails, the result is
    /// [`Error::MoveIncomplete`](crate::Error::MoveIncomplete) and both
    /// objects exist.
    async fn move_object(&self, src: &ObjectPath, dst: &ObjectPath) -> Result<()>;

    /// Create a container
    async fn create_container(&self, container: &str) -> Result<()>;

    /// Delete a container
    async fn remove_container(&self, container: &str) -> Result<()>;

    /// Account usage, or container usage when `container` is given
    async fn usage(&self, container: Option<&str>) -> Result<UsageStats>;

    /// Get object content as bytes
    async fn get_object(&self, path: &ObjectPath) -> Result<Vec<u8>>;

    /// Upload an in-memory payload
    async fn put_object(
        &self,
        path: &ObjectPath,
        data: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<()>;

    /// Download an object into a local file, returning bytes written
    async fn get_file(&self, path: &ObjectPath, dest: &Path) -> Result<u64>;

    /// Upload a local file in fixed-size chunks, returning bytes sent
    async fn put_file(&self, path: &ObjectPath, src: &Path, content_type: Option<&str>)
    -> Result<u64>;

    /// Stream an object into a sink chunk by chunk, returning bytes written
    async fn stream_object(&self, path: &ObjectPath, sink: &mut dyn ByteSink) -> Result<u64>;

    /// Delete an object
    async fn remove_object(&self, path: &ObjectPath) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_info_new() {
        let info = ObjectInfo::new("a.txt");
        assert_eq!(info.key, "a.txt");
        assert!(info.size_bytes.is_none());
        assert!(info.size_human().is_none());
    }

    #[test]
    fn test_size_human() {
        let mut info = ObjectInfo::new("a.bin");
        info.size_bytes = Some(2048);
        assert_eq!(info.size_human().as_deref(), Some("2 KiB"));
    }

    #[test]
    fn test_last_modified_at() {
        let mut info = ObjectInfo::new("a.txt");
        info.last_modified = Some("Tue, 15 Nov 1994 08:12:31 GMT".into());
        let ts = info.last_modified_at().unwrap();
        assert_eq!(ts.as_second(), 784_887_151);

        info.last_modified = Some("yesterday".into());
        assert!(info.last_modified_at().is_none());
    }

    #[test]
    fn test_list_options() {
        assert!(!ListOptions::default().is_paginated());
        assert!(ListOptions::default().limit(5).is_paginated());
        assert!(ListOptions::default().marker("m").is_paginated());
    }
}
