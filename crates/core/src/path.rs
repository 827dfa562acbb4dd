//! Object addressing
//!
//! Objects are addressed by a (container, object) pair. Object names may
//! contain `/`, containers may not be empty.

use crate::error::{Error, Result};

/// A validated (container, object) pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectPath {
    container: String,
    object: String,
}

impl ObjectPath {
    /// Create a new ObjectPath, rejecting empty parts
    pub fn new(container: impl Into<String>, object: impl Into<String>) -> Result<Self> {
        let container = container.into();
        let object = object.into();

        validate_container(&container)?;
        if object.is_empty() {
            return Err(Error::InvalidArgument("Object name cannot be empty".into()));
        }

        Ok(Self { container, object })
    }

    /// Parse `container/object`, splitting on the first slash
    pub fn parse(path: &str) -> Result<Self> {
        match path.split_once('/') {
            Some((container, object)) => Self::new(container, object),
            None => Err(Error::InvalidArgument(format!(
                "Path '{path}' is incomplete. Use format: container/object"
            ))),
        }
    }

    /// Container name
    pub fn container(&self) -> &str {
        &self.container
    }

    /// Object name within the container
    pub fn object(&self) -> &str {
        &self.object
    }
}

impl std::fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.container, self.object)
    }
}

/// Reject empty container names
pub fn validate_container(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidArgument(
            "Container name cannot be empty".into(),
        ));
    }
    Ok(())
}
