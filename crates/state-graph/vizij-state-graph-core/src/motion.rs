//! Opaque references to host-owned assets.
//!
//! The core never dereferences these; they are compared and copied into the IR
//! as-is. Hosts typically use an asset path or GUID.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to a motion (animation clip) asset.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MotionRef(String);

impl MotionRef {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MotionRef {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for MotionRef {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl fmt::Display for MotionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference to an avatar mask asset restricting which bones a layer drives.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvatarMaskRef(String);

impl AvatarMaskRef {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AvatarMaskRef {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for AvatarMaskRef {
    fn from(key: String) -> Self {
        Self(key)
    }
}
