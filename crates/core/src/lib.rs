//! swift-core: Core library for the Swift object storage client
//!
//! This crate provides the backend-independent pieces of the client:
//! - Error taxonomy shared by every operation
//! - Object addressing and name validation
//! - Object metadata, usage and listing types
//! - The ObjectStore trait and the ByteSink streaming capability
//! - Connection profiles
//!
//! It does not depend on any HTTP stack, so the ObjectStore trait can be
//! implemented by test doubles.

pub mod error;
pub mod path;
pub mod profile;
pub mod sink;
pub mod traits;

pub use error::{Error, ErrorKind, Result};
pub use path::{ObjectPath, validate_container};
pub use profile::{Profile, TimeoutConfig};
pub use sink::{ByteSink, WriterSink};
pub use traits::{ListOptions, ObjectInfo, ObjectStore, UsageStats};
