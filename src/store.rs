// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Settings store management and manipulation.
//!
//! repo-sync keeps everything it needs in one place called the
//! __settings store__. The settings store houses the listing of repository
//! checkouts that take part in sync operations, along with the shared
//! templates that get distributed to them.
//!
//! # Settings Store Layout
//!
//! The settings store can generally be placed anywhere on the user's file
//! system. However, the default location is `$HOME/.repo`. The store holds
//! the following files at its top-level:
//!
//! - `repo.yml`: listing of repository paths, see [`Settings`].
//! - `.golangci.yml`: shared golangci-lint configuration template.
//!
//! The store must be initialized before it can be read. Initialization only
//! creates the directory and a default `repo.yml`. Shared templates are
//! placed into the store by the user.

use crate::{
    config::{ConfigError, RepoPath, Settings},
    path::{default_settings_dir, NoWayHome},
};

use std::{
    fs::{canonicalize, read_to_string, write},
    path::{Path, PathBuf},
};
use tracing::{debug, info, instrument};

/// Name of settings file at the top-level of settings store.
pub const SETTINGS_FILE_NAME: &str = "repo.yml";

/// Name of shared golangci-lint template at the top-level of settings store.
pub const GOLANGCI_TEMPLATE_NAME: &str = ".golangci.yml";

/// Per-user settings store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsStore {
    store_path: PathBuf,
}

impl SettingsStore {
    /// Construct new settings store handle at target directory.
    ///
    /// Does not touch the file system.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store_path: path.into(),
        }
    }

    /// Locate settings store at its default location.
    ///
    /// # Errors
    ///
    /// - Return [`StoreError::NoWayHome`] if home directory cannot be
    ///   determined.
    pub fn locate() -> Result<Self> {
        Ok(Self::new(default_settings_dir()?))
    }

    /// Path to settings store directory.
    pub fn path(&self) -> &Path {
        self.store_path.as_path()
    }

    /// Path to settings file.
    pub fn settings_path(&self) -> PathBuf {
        self.store_path.join(SETTINGS_FILE_NAME)
    }

    /// Path to shared golangci-lint template.
    pub fn golangci_template_path(&self) -> PathBuf {
        self.store_path.join(GOLANGCI_TEMPLATE_NAME)
    }

    /// Check if settings store directory exists.
    pub fn is_initialized(&self) -> bool {
        self.store_path.is_dir()
    }

    /// Initialize settings store.
    ///
    /// Creates the settings store directory along with a default settings
    /// file that lists no repositories. An existing settings file is left
    /// as is, so calling this more than once is harmless.
    ///
    /// # Errors
    ///
    /// - Return [`StoreError::CreateStoreDir`] if settings store directory
    ///   cannot be created.
    /// - Return [`StoreError::WriteSettings`] if default settings file cannot
    ///   be written.
    #[instrument(skip(self), level = "debug")]
    pub fn initialize(&self) -> Result<()> {
        mkdirp::mkdirp(&self.store_path).map_err(|err| StoreError::CreateStoreDir {
            source: err,
            store_path: self.store_path.clone(),
        })?;

        let settings_path = self.settings_path();
        if settings_path.exists() {
            debug!("settings file already exists: {:?}", settings_path.display());
            return Ok(());
        }

        info!("initialize settings store: {:?}", self.store_path.display());
        self.write(&Settings::default())
    }

    /// Read settings file.
    ///
    /// # Errors
    ///
    /// - Return [`StoreError::NotInitialized`] if settings store directory
    ///   does not exist.
    /// - Return [`StoreError::ReadSettings`] if settings file cannot be read.
    /// - Return [`StoreError::Config`] if settings file is malformed.
    pub fn read(&self) -> Result<Settings> {
        if !self.is_initialized() {
            return Err(StoreError::NotInitialized {
                store_path: self.store_path.clone(),
            });
        }

        let settings_path = self.settings_path();
        let content = read_to_string(&settings_path).map_err(|err| StoreError::ReadSettings {
            source: err,
            settings_path: settings_path.clone(),
        })?;

        content.parse().map_err(|err| StoreError::Config {
            source: err,
            settings_path,
        })
    }

    /// Write settings file, replacing whatever was there.
    ///
    /// # Errors
    ///
    /// - Return [`StoreError::Config`] if settings cannot be serialized.
    /// - Return [`StoreError::WriteSettings`] if settings file cannot be
    ///   written.
    pub fn write(&self, settings: &Settings) -> Result<()> {
        let settings_path = self.settings_path();
        let content = settings.to_yaml().map_err(|err| StoreError::Config {
            source: err,
            settings_path: settings_path.clone(),
        })?;

        write(&settings_path, content.as_bytes()).map_err(|err| StoreError::WriteSettings {
            source: err,
            settings_path,
        })
    }

    /// Register repository checkouts into settings file.
    ///
    /// Each path is resolved to its canonical absolute form before being
    /// registered. Paths that are already registered are skipped. Existing
    /// entries are written back exactly as the user wrote them. Returns the
    /// listing of newly registered repositories.
    ///
    /// # Errors
    ///
    /// - Return [`StoreError::ResolveRepo`] if repository path cannot be
    ///   resolved.
    /// - Return any error from [`SettingsStore::read`] or
    ///   [`SettingsStore::write`].
    #[instrument(skip(self, paths), level = "debug")]
    pub fn add_repos(
        &self,
        paths: impl IntoIterator<Item = impl AsRef<Path>>,
    ) -> Result<Vec<RepoPath>> {
        let mut settings = self.read()?;
        let mut added = Vec::new();

        for path in paths {
            let path = canonicalize(path.as_ref()).map_err(|err| StoreError::ResolveRepo {
                source: err,
                repo_path: path.as_ref().to_path_buf(),
            })?;

            if settings.add_repo(&path) {
                info!("register repository: {:?}", path.display());
                added.push(RepoPath::new(path));
            } else {
                debug!("repository already registered: {:?}", path.display());
            }
        }

        if !added.is_empty() {
            self.write(&settings)?;
        }

        Ok(added)
    }
}

/// All possible error types for settings store interaction.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Home directory cannot be determined for default store location.
    #[error(transparent)]
    NoWayHome(#[from] NoWayHome),

    /// Settings store has not been initialized yet.
    #[error("settings store {:?} does not exist, please run repo init", store_path.display())]
    NotInitialized { store_path: PathBuf },

    /// Settings store directory cannot be created.
    #[error("failed to create settings store at {:?}", store_path.display())]
    CreateStoreDir {
        #[source]
        source: std::io::Error,
        store_path: PathBuf,
    },

    /// Settings file cannot be read from.
    #[error("failed to read settings file at {:?}", settings_path.display())]
    ReadSettings {
        #[source]
        source: std::io::Error,
        settings_path: PathBuf,
    },

    /// Settings file cannot be written to.
    #[error("failed to write settings file at {:?}", settings_path.display())]
    WriteSettings {
        #[source]
        source: std::io::Error,
        settings_path: PathBuf,
    },

    /// Settings file cannot be parsed or serialized.
    #[error("invalid settings file at {:?}", settings_path.display())]
    Config {
        #[source]
        source: ConfigError,
        settings_path: PathBuf,
    },

    /// Repository path cannot be resolved.
    #[error("cannot resolve repository path {:?}", repo_path.display())]
    ResolveRepo {
        #[source]
        source: std::io::Error,
        repo_path: PathBuf,
    },
}

/// Friendly result alias :3
pub type Result<T, E = StoreError> = std::result::Result<T, E>;
