// ABOUTME: Opaque image name used as the cluster-wide image key.
// ABOUTME: Only rejects empty names and names with whitespace or control chars.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseImageNameError {
    #[error("image name cannot be empty")]
    Empty,

    #[error("invalid character in image name: {0:?}")]
    InvalidChar(char),
}

/// Name of an image as known to the cluster.
///
/// The dispatcher never looks inside it: `registry/repo:tag`, a bare id and a
/// digest reference are all just keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageName(String);

impl ImageName {
    pub fn new(value: &str) -> Result<Self, ParseImageNameError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ParseImageNameError::Empty);
        }

        if let Some(c) = trimmed
            .chars()
            .find(|c| c.is_whitespace() || c.is_control())
        {
            return Err(ParseImageNameError::InvalidChar(c));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ImageName {
    type Err = ParseImageNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
