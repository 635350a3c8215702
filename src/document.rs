// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Structured document handling.
//!
//! A __document__ is a parsed YAML configuration file whose top-level is a
//! mapping. Values nested inside the document can be scalars, further
//! mappings, or sequences of values.
//!
//! # Merge Policy
//!
//! Documents can be layered on top of each other through [`merge`]. The
//! document being layered is called the __overlay__, and the document it is
//! layered onto is called the __master__. For every key of the overlay:
//!
//! 1. If both sides hold a mapping, then the two mappings are merged
//!    recursively with the same policy.
//! 2. If both sides hold a sequence, then the overlay's sequence is appended
//!    to the master's sequence. Duplicates are kept.
//! 3. Otherwise the overlay's value replaces the master's value outright.
//!    Type mismatches are never coerced.
//!
//! Keys only present in the master are kept as is. Merging always builds a
//! fresh document, so the same master can be layered with any number of
//! overlays without one overlay leaking into the result of another.

use serde_yaml::{Mapping, Value};
use std::{
    fmt::{Display, Error as FmtError, Formatter, Result as FmtResult},
    str::FromStr,
};

/// Parsed configuration document.
///
/// # Invariant
///
/// - Top-level is always a mapping.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Document(Mapping);

impl Document {
    /// Check if document has no top-level keys.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Serialize document to YAML.
    ///
    /// Nested mappings are indented by two spaces.
    ///
    /// # Errors
    ///
    /// - Return [`DocumentError::Serialize`] if serialization fails.
    pub fn to_yaml(&self) -> Result<String, DocumentError> {
        serde_yaml::to_string(&self.0).map_err(DocumentError::Serialize)
    }

    /// Layer overlay document on top of this one.
    ///
    /// Produces a new document following the merge policy described in the
    /// module documentation. Neither input is modified.
    pub fn merge(&self, overlay: &Document) -> Document {
        Document(merge_mapping(&self.0, &overlay.0))
    }
}

impl FromStr for Document {
    type Err = DocumentError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let mut value: Value = serde_yaml::from_str(data).map_err(DocumentError::Deserialize)?;

        // INVARIANT: Resolve merge keys (`<<: *anchor`) before any layering.
        value.apply_merge().map_err(DocumentError::Deserialize)?;

        match value {
            // INVARIANT: An empty file is an empty document.
            Value::Null => Ok(Self::default()),
            Value::Mapping(mapping) => Ok(Self(mapping)),
            other => Err(DocumentError::NotMapping {
                found: value_kind(&other),
            }),
        }
    }
}

impl Display for Document {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(self.to_yaml()?.as_str())
    }
}

/// Merge optional overlay onto master document.
///
/// A missing overlay yields the master unchanged.
pub fn merge(master: &Document, overlay: Option<&Document>) -> Document {
    match overlay {
        Some(overlay) => master.merge(overlay),
        None => master.clone(),
    }
}

fn merge_mapping(master: &Mapping, overlay: &Mapping) -> Mapping {
    let mut merged = master.clone();
    for (key, value) in overlay {
        let value = match master.get(key) {
            Some(existing) => merge_value(existing, value),
            None => value.clone(),
        };

        // INVARIANT: Existing keys keep their position in the master.
        merged.insert(key.clone(), value);
    }

    merged
}

fn merge_value(master: &Value, overlay: &Value) -> Value {
    match (master, overlay) {
        (Value::Mapping(master), Value::Mapping(overlay)) => {
            Value::Mapping(merge_mapping(master, overlay))
        }
        (Value::Sequence(master), Value::Sequence(overlay)) => {
            Value::Sequence(master.iter().chain(overlay).cloned().collect())
        }
        (_, overlay) => overlay.clone(),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

/// Document error types.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Failed to deserialize document.
    #[error("malformed YAML document")]
    Deserialize(#[source] serde_yaml::Error),

    /// Failed to serialize document.
    #[error("cannot serialize YAML document")]
    Serialize(#[source] serde_yaml::Error),

    /// Top-level of document is not a mapping.
    #[error("expected mapping at top-level of document, found {found}")]
    NotMapping { found: &'static str },
}

impl From<DocumentError> for FmtError {
    fn from(_: DocumentError) -> Self {
        FmtError
    }
}
