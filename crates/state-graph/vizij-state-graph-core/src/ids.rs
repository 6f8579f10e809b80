//! Scoped identifiers for layers, state machines, states and parameters.
//!
//! Paths are `/`-joined from the owning layer down to the item:
//!   "Base"               -> the scope of layer `Base`
//!   "Base/OnGround"      -> state machine `OnGround` inside layer `Base`
//!   "Base/OnGround/Run"  -> state `Run` inside `OnGround`
//!
//! Both types serialize as their string form so the IR stays readable when it
//! is handed to a backend as JSON.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::parameters::ParameterKind;

/// Separator between path segments.
pub const PATH_SEPARATOR: char = '/';

/// Path of a scope (layer or state machine), starting with the layer name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopePath {
    segments: Vec<String>,
}

impl ScopePath {
    /// Scope of a top-level layer.
    pub fn root(layer: impl Into<String>) -> Self {
        Self {
            segments: vec![layer.into()],
        }
    }

    /// Path of a nested scope named `name` directly under `self`.
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.into());
        Self { segments }
    }

    /// Parse a `/`-joined path. Empty segments are rejected.
    pub fn parse(s: &str) -> Result<Self, String> {
        if s.is_empty() {
            return Err("empty scope path".to_string());
        }
        let segments: Vec<String> = s.split(PATH_SEPARATOR).map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(format!("invalid scope path '{s}': empty segment"));
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Name of the owning layer.
    pub fn layer(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }

    /// Name of the innermost scope.
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// True when the trailing segments equal `suffix`.
    pub fn ends_with(&self, suffix: &[&str]) -> bool {
        suffix_matches(self.segments.iter().map(String::as_str), suffix)
    }
}

impl fmt::Display for ScopePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

impl FromStr for ScopePath {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScopePath::parse(s)
    }
}

impl Serialize for ScopePath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ScopePath {
    fn deserialize<D>(deserializer: D) -> Result<ScopePath, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ScopePath::parse(&s).map_err(de::Error::custom)
    }
}

/// Identity of a concrete state: the owning scope plus the state's name.
///
/// Two states with the same name in different scopes are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId {
    pub scope: ScopePath,
    pub name: String,
}

impl StateId {
    pub fn new(scope: ScopePath, name: impl Into<String>) -> Self {
        Self {
            scope,
            name: name.into(),
        }
    }

    /// Parse `layer/.../state`. At least a layer and a state name are required.
    pub fn parse(s: &str) -> Result<Self, String> {
        let (scope, name) = s
            .rsplit_once(PATH_SEPARATOR)
            .ok_or_else(|| format!("invalid state id '{s}': missing owning layer"))?;
        if name.is_empty() {
            return Err(format!("invalid state id '{s}': empty state name"));
        }
        Ok(Self {
            scope: ScopePath::parse(scope)?,
            name: name.to_string(),
        })
    }

    /// Name of the layer that owns this state.
    pub fn layer(&self) -> Option<&str> {
        self.scope.layer()
    }

    /// True when the trailing segments of the full path equal `suffix`.
    pub fn ends_with(&self, suffix: &[&str]) -> bool {
        suffix_matches(
            self.scope.segments().chain(std::iter::once(self.name.as_str())),
            suffix,
        )
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.scope, PATH_SEPARATOR, self.name)
    }
}

impl FromStr for StateId {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StateId::parse(s)
    }
}

impl Serialize for StateId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for StateId {
    fn deserialize<D>(deserializer: D) -> Result<StateId, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        StateId::parse(&s).map_err(de::Error::custom)
    }
}

fn suffix_matches<'a>(segments: impl DoubleEndedIterator<Item = &'a str>, suffix: &[&str]) -> bool {
    if suffix.is_empty() {
        return false;
    }
    let mut rev = segments.rev();
    for want in suffix.iter().rev() {
        match rev.next() {
            Some(seg) if seg == *want => {}
            _ => return false,
        }
    }
    true
}

/// Handle returned by [`crate::ParameterRegistry::declare`].
///
/// Carries the parameter's name and kind so conditions and blend trees can be
/// built from the handle alone. Stable for the lifetime of its registry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParameterHandle {
    pub(crate) index: u32,
    pub(crate) name: String,
    pub(crate) kind: ParameterKind,
}

impl ParameterHandle {
    /// Position of the parameter in declaration order.
    pub fn index(&self) -> usize {
        self.index as usize
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ParameterKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_id_round_trips_through_display() {
        let id = StateId::new(ScopePath::root("Base").child("OnGround"), "Run");
        assert_eq!(id.to_string(), "Base/OnGround/Run");
        assert_eq!(StateId::parse("Base/OnGround/Run").unwrap(), id);
        assert_eq!(id.layer(), Some("Base"));
    }

    #[test]
    fn state_id_requires_layer() {
        assert!(StateId::parse("Idle").is_err());
        assert!(StateId::parse("Base/").is_err());
        assert!(StateId::parse("/Idle").is_err());
    }

    #[test]
    fn suffix_matching_is_segment_aligned() {
        let id = StateId::parse("Base/OnGround/Run").unwrap();
        assert!(id.ends_with(&["Run"]));
        assert!(id.ends_with(&["OnGround", "Run"]));
        assert!(id.ends_with(&["Base", "OnGround", "Run"]));
        assert!(!id.ends_with(&["Ground", "Run"]));
        assert!(!id.ends_with(&["Other", "Base", "OnGround", "Run"]));
        assert!(!id.ends_with(&[]));
    }

    #[test]
    fn segments_walk_from_either_end() {
        let path = ScopePath::parse("Base/OnGround/Crouched").unwrap();
        assert_eq!(path.segments().rev().collect::<Vec<_>>(), ["Crouched", "OnGround", "Base"]);
        assert_eq!(path.segments().next_back(), path.name());
    }

    #[test]
    fn scope_path_serializes_as_string() {
        let path = ScopePath::root("Base").child("Crouched");
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, "\"Base/Crouched\"");
        let back: ScopePath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
        assert_eq!(back.name(), Some("Crouched"));
    }
}
