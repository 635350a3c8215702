// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Shared configuration synchronization.
//!
//! Distribute the shared golangci-lint template from the settings store to
//! every registered repository checkout. Each repository may carry its own
//! `.golangci.override.yml` file that gets layered on top of the shared
//! template through [`merge`]. The result is written to the repository's
//! `.golangci.yml` file, replacing whatever was there before.
//!
//! Repositories are visited in the order they are listed in the settings
//! file. The first failure aborts the run, so repositories listed after a
//! failing one are left untouched.

use crate::{
    config::{ConfigError, RepoPath},
    document::{merge, Document, DocumentError},
    store::{SettingsStore, StoreError},
};

use std::{
    fs::{read_to_string, write},
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tracing::{debug, info, instrument};

/// Name of golangci-lint configuration file written into each repository.
pub const GOLANGCI_FILE_NAME: &str = ".golangci.yml";

/// Name of optional per-repository golangci-lint override file.
pub const GOLANGCI_OVERRIDE_FILE_NAME: &str = ".golangci.override.yml";

/// Outcome of syncing one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Repository that was synced.
    pub repo: RepoPath,

    /// Whether an override file was layered on top of the shared template.
    pub overridden: bool,
}

/// Sync shared golangci-lint template to all registered repositories.
///
/// # Errors
///
/// - Return [`SyncError::Store`] if settings cannot be read.
/// - Return [`SyncError::TemplateMissing`] if shared template does not exist.
///   No repository is touched in this case.
/// - Return [`SyncError::ExpandRepo`] if repository path cannot be shell
///   expanded.
/// - Return [`SyncError::ReadFile`] or [`SyncError::WriteFile`] if file I/O
///   fails.
/// - Return [`SyncError::Document`] if template or override is malformed.
#[instrument(skip(store), level = "debug")]
pub fn sync_golangci_lint(store: &SettingsStore) -> Result<Vec<SyncOutcome>> {
    let settings = store.read()?;
    let master = read_template(&store.golangci_template_path())?;

    let mut outcomes = Vec::with_capacity(settings.repos.len());
    for repo in settings.repos {
        let path = repo.expand().map_err(|err| SyncError::ExpandRepo {
            source: err,
            repo: repo.clone(),
        })?;
        info!(repo = %path.display(), "sync golangci-lint configuration");
        let overridden = sync_repo(&master, &path)?;
        outcomes.push(SyncOutcome { repo, overridden });
    }

    Ok(outcomes)
}

/// Layer repository's override onto master, and write the result into it.
///
/// Returns true if an override file was found.
///
/// # Errors
///
/// - Return [`SyncError::ReadFile`] if override file exists but cannot be
///   read.
/// - Return [`SyncError::Document`] if override file is malformed.
/// - Return [`SyncError::WriteFile`] if output cannot be written.
pub fn sync_repo(master: &Document, repo: impl AsRef<Path>) -> Result<bool> {
    let overlay = read_override(&repo.as_ref().join(GOLANGCI_OVERRIDE_FILE_NAME))?;
    let merged = merge(master, overlay.as_ref());

    let output_path = repo.as_ref().join(GOLANGCI_FILE_NAME);
    let content = merged.to_yaml().map_err(|err| SyncError::Document {
        source: err,
        path: output_path.clone(),
    })?;
    write(&output_path, content.as_bytes()).map_err(|err| SyncError::WriteFile {
        source: err,
        path: output_path.clone(),
    })?;
    debug!("wrote {:?}", output_path.display());

    Ok(overlay.is_some())
}

fn read_template(path: &Path) -> Result<Document> {
    let content = match read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(SyncError::TemplateMissing {
                path: path.to_path_buf(),
            })
        }
        Err(err) => {
            return Err(SyncError::ReadFile {
                source: err,
                path: path.to_path_buf(),
            })
        }
    };

    parse_document(&content, path)
}

fn read_override(path: &Path) -> Result<Option<Document>> {
    match read_to_string(path) {
        Ok(content) => {
            debug!("found override {:?}", path.display());
            parse_document(&content, path).map(Some)
        }
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(SyncError::ReadFile {
            source: err,
            path: path.to_path_buf(),
        }),
    }
}

fn parse_document(content: &str, path: &Path) -> Result<Document> {
    content.parse().map_err(|err| SyncError::Document {
        source: err,
        path: path.to_path_buf(),
    })
}

/// All possible error types for sync operations.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Settings store cannot be read.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Shared template has not been placed into settings store.
    #[error("template file {:?} does not exist", path.display())]
    TemplateMissing { path: PathBuf },

    /// Repository path cannot be shell expanded.
    #[error("cannot expand repository path {repo}")]
    ExpandRepo {
        #[source]
        source: ConfigError,
        repo: RepoPath,
    },

    /// File cannot be read from.
    #[error("failed to read {:?}", path.display())]
    ReadFile {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// File cannot be written to.
    #[error("failed to write {:?}", path.display())]
    WriteFile {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Document cannot be parsed or serialized.
    #[error("invalid document {:?}", path.display())]
    Document {
        #[source]
        source: DocumentError,
        path: PathBuf,
    },
}

/// Friendly result alias :3
pub type Result<T, E = SyncError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use sealed_test::prelude::*;
    use std::{env::current_dir, fs::create_dir_all};

    fn setup_store(root: &Path, repos: &[&str]) -> anyhow::Result<SettingsStore> {
        let store = SettingsStore::new(root.join(".repo"));
        store.initialize()?;
        for repo in repos {
            create_dir_all(root.join(repo))?;
        }
        store.add_repos(repos.iter().map(|repo| root.join(repo)))?;

        Ok(store)
    }

    #[sealed_test]
    fn missing_template_touches_nothing() -> anyhow::Result<()> {
        let root = current_dir()?;
        let store = setup_store(&root, &["foo"])?;

        let result = sync_golangci_lint(&store);
        assert!(matches!(result, Err(SyncError::TemplateMissing { .. })));
        assert!(!root.join("foo").join(GOLANGCI_FILE_NAME).exists());

        Ok(())
    }

    #[sealed_test]
    fn malformed_template() -> anyhow::Result<()> {
        let root = current_dir()?;
        let store = setup_store(&root, &["foo"])?;
        write(store.golangci_template_path(), "- not\n- a mapping\n")?;

        let result = sync_golangci_lint(&store);
        assert!(matches!(
            result,
            Err(SyncError::Document {
                source: DocumentError::NotMapping { .. },
                ..
            })
        ));

        Ok(())
    }

    #[sealed_test]
    fn uninitialized_store() -> anyhow::Result<()> {
        let store = SettingsStore::new(current_dir()?.join(".repo"));
        let result = sync_golangci_lint(&store);
        assert!(matches!(
            result,
            Err(SyncError::Store(StoreError::NotInitialized { .. }))
        ));

        Ok(())
    }

    #[sealed_test]
    fn failure_aborts_remaining_repos() -> anyhow::Result<()> {
        let root = current_dir()?;
        let store = setup_store(&root, &["foo", "bar", "baz"])?;
        write(store.golangci_template_path(), "run: {timeout: 5m}\n")?;
        write(
            root.join("bar").join(GOLANGCI_OVERRIDE_FILE_NAME),
            "run: [",
        )?;

        let result = sync_golangci_lint(&store);
        assert!(matches!(result, Err(SyncError::Document { .. })));
        assert!(root.join("foo").join(GOLANGCI_FILE_NAME).exists());
        assert!(!root.join("bar").join(GOLANGCI_FILE_NAME).exists());
        assert!(!root.join("baz").join(GOLANGCI_FILE_NAME).exists());

        Ok(())
    }

    #[sealed_test]
    fn sync_expands_registered_paths() -> anyhow::Result<()> {
        let root = current_dir()?;
        std::env::set_var("REPO_SYNC_ROOT", &root);
        let store = SettingsStore::new(root.join(".repo"));
        store.initialize()?;
        create_dir_all(root.join("foo"))?;
        write(store.settings_path(), "repos:\n- $REPO_SYNC_ROOT/foo\n")?;
        write(store.golangci_template_path(), "run: {timeout: 5m}\n")?;

        let outcomes = sync_golangci_lint(&store)?;
        assert_eq!(outcomes[0].repo, RepoPath::new("$REPO_SYNC_ROOT/foo"));
        assert!(root.join("foo").join(GOLANGCI_FILE_NAME).exists());

        Ok(())
    }

    #[sealed_test]
    fn sync_with_unset_variable() -> anyhow::Result<()> {
        let root = current_dir()?;
        std::env::remove_var("REPO_SYNC_UNSET");
        let store = SettingsStore::new(root.join(".repo"));
        store.initialize()?;
        write(store.settings_path(), "repos:\n- $REPO_SYNC_UNSET/foo\n")?;
        write(store.golangci_template_path(), "run: {timeout: 5m}\n")?;

        let result = sync_golangci_lint(&store);
        assert!(matches!(result, Err(SyncError::ExpandRepo { .. })));

        Ok(())
    }

    #[sealed_test]
    fn sync_repo_overwrites_output() -> anyhow::Result<()> {
        let root = current_dir()?;
        let master: Document = "run: {timeout: 5m}".parse()?;
        write(root.join(GOLANGCI_FILE_NAME), "stale: true\n")?;
        write(
            root.join(GOLANGCI_OVERRIDE_FILE_NAME),
            "run: {tests: false}\n",
        )?;

        let overridden = sync_repo(&master, &root)?;
        assert!(overridden);

        let result = read_to_string(root.join(GOLANGCI_FILE_NAME))?;
        let expect = indoc! {r#"
            run:
              timeout: 5m
              tests: false
        "#};
        assert_eq!(result, expect);

        Ok(())
    }
}
