//! Dotted key paths into JSON resource trees
//!
//! A [`KeyPath`] such as `state.brightness` addresses a leaf inside the
//! serialized form of a bridge resource. Reads and writes walk nested
//! objects one segment at a time; writes only ever replace the addressed
//! leaf and never create new keys.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("key path is empty")]
    Empty,

    #[error("key path \"{path}\" has an empty segment")]
    EmptySegment { path: String },

    #[error("no key \"{segment}\" along \"{path}\"")]
    MissingKey { path: String, segment: String },

    #[error("cannot look up \"{segment}\" along \"{path}\": parent is not an object")]
    NotAnObject { path: String, segment: String },
}

/// A validated, dot-separated path into a JSON object tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath {
    raw: String,
    segments: Vec<String>,
}

impl KeyPath {
    pub fn parse(path: &str) -> Result<Self, PathError> {
        if path.is_empty() {
            return Err(PathError::Empty);
        }

        let segments: Vec<String> = path.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(PathError::EmptySegment {
                path: path.to_string(),
            });
        }

        Ok(Self {
            raw: path.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; parsing rejects empty paths
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Read the value this path addresses
    pub fn get<'a>(&self, root: &'a Value) -> Result<&'a Value, PathError> {
        let mut current = root;
        for segment in &self.segments {
            let object = current
                .as_object()
                .ok_or_else(|| self.not_an_object(segment))?;
            current = object
                .get(segment)
                .ok_or_else(|| self.missing_key(segment))?;
        }
        Ok(current)
    }

    /// Replace the leaf this path addresses, returning the previous value
    pub fn set(&self, root: &mut Value, value: Value) -> Result<Value, PathError> {
        let (leaf, parents) = self.segments.split_last().ok_or(PathError::Empty)?;

        let mut current = root;
        for segment in parents {
            current = current
                .as_object_mut()
                .ok_or_else(|| self.not_an_object(segment))?
                .get_mut(segment)
                .ok_or_else(|| self.missing_key(segment))?;
        }

        let slot = current
            .as_object_mut()
            .ok_or_else(|| self.not_an_object(leaf))?
            .get_mut(leaf)
            .ok_or_else(|| self.missing_key(leaf))?;

        Ok(std::mem::replace(slot, value))
    }

    fn missing_key(&self, segment: &str) -> PathError {
        PathError::MissingKey {
            path: self.raw.clone(),
            segment: segment.to_string(),
        }
    }

    fn not_an_object(&self, segment: &str) -> PathError {
        PathError::NotAnObject {
            path: self.raw.clone(),
            segment: segment.to_string(),
        }
    }
}

impl FromStr for KeyPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
