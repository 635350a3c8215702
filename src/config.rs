// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Configuration layout.
//!
//! Specify the layout for the settings file that repo-sync uses to simplify
//! the process of serialization and deserialization. File I/O is left to the
//! caller to figure out.

use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    str::FromStr,
};

/// Settings file layout.
///
/// The settings file lists every repository checkout that participates in
/// sync operations. It is a YAML document with a single field:
///
/// ```yaml
/// repos:
/// - /home/blah/src/foo
/// - ~/src/bar
/// ```
///
/// Repository paths are kept exactly as written, so `~` and environment
/// variables survive a rewrite of the settings file. Use
/// [`RepoPath::expand`] to obtain the path to operate on.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct Settings {
    /// Repositories to sync, in the order they will be visited.
    #[serde(default)]
    pub repos: Vec<RepoPath>,
}

impl Settings {
    /// Register repository path.
    ///
    /// Returns false if the path was already registered, either verbatim or
    /// through an entry that expands to it. Insertion order is preserved.
    pub fn add_repo(&mut self, path: impl Into<PathBuf>) -> bool {
        let repo = RepoPath::new(path);
        let registered = self.repos.iter().any(|existing| {
            existing == &repo
                || existing
                    .expand()
                    .is_ok_and(|expanded| expanded == repo.as_path())
        });
        if registered {
            return false;
        }

        self.repos.push(repo);
        true
    }

    /// Serialize settings to YAML.
    ///
    /// # Errors
    ///
    /// - Return [`ConfigError::Serialize`] if serialization fails.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(ConfigError::Serialize)
    }
}

impl FromStr for Settings {
    type Err = ConfigError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        if data.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(data).map_err(ConfigError::Deserialize)
    }
}

/// Path to a repository checkout, as written in the settings file.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct RepoPath(PathBuf);

impl RepoPath {
    /// Construct new repository path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// Treat repository path as [`Path`] slice.
    pub fn as_path(&self) -> &Path {
        self.0.as_path()
    }

    /// Perform shell expansion on repository path.
    ///
    /// # Errors
    ///
    /// - Return [`ConfigError::ShellExpansion`] if a referenced variable is
    ///   not set.
    pub fn expand(&self) -> Result<PathBuf, ConfigError> {
        Ok(PathBuf::from(
            shellexpand::full(self.to_string().as_str())?.into_owned(),
        ))
    }
}

impl Display for RepoPath {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(self.as_path().to_string_lossy().as_ref())
    }
}

impl AsRef<Path> for RepoPath {
    fn as_ref(&self) -> &Path {
        self.as_path()
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("malformed settings file")]
    Deserialize(#[source] serde_yaml::Error),

    /// Failed to serialize configuration.
    #[error("cannot serialize settings")]
    Serialize(#[source] serde_yaml::Error),

    /// Failed to perform shell expansion on configuration.
    #[error(transparent)]
    ShellExpansion(#[from] shellexpand::LookupError<std::env::VarError>),
}
