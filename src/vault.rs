//! Storage and workspace surfaces the note flow runs against.
//!
//! Paths handed to these traits are vault-relative and `/`-separated.

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::notes::normalize_path;

#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    #[error("'{0}' already exists")]
    AlreadyExists(String),
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to open '{path}': {message}")]
    Open { path: String, message: String },
    #[error("'{}' is not inside the vault at '{}'", .document.display(), .root.display())]
    OutsideVault { document: PathBuf, root: PathBuf },
}

#[async_trait]
pub trait Vault: Send + Sync {
    /// Whether a file or folder exists at `path`.
    async fn exists(&self, path: &str) -> bool;

    async fn create_folder(&self, path: &str) -> Result<(), VaultError>;

    /// Creates a new file; fails if anything already exists at `path`.
    async fn create_file(&self, path: &str, content: &str) -> Result<(), VaultError>;
}

/// Displays vault files to the user.
pub trait Workspace: Send + Sync {
    /// Opens `path` in a new view; `origin` is the document the request came
    /// from.
    fn open(&self, path: &str, origin: &str) -> Result<(), VaultError>;
}

/// Vault backed by a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        resolve_in(&self.root, path)
    }
}

fn resolve_in(root: &Path, path: &str) -> PathBuf {
    let normalized = normalize_path(path);
    let mut out = root.to_path_buf();
    for segment in normalized.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            continue;
        }
        out.push(segment);
    }
    out
}

#[async_trait]
impl Vault for FsVault {
    async fn exists(&self, path: &str) -> bool {
        tokio::fs::try_exists(self.resolve(path))
            .await
            .unwrap_or(false)
    }

    async fn create_folder(&self, path: &str) -> Result<(), VaultError> {
        tokio::fs::create_dir_all(self.resolve(path))
            .await
            .map_err(|source| VaultError::Io {
                path: path.to_string(),
                source,
            })
    }

    async fn create_file(&self, path: &str, content: &str) -> Result<(), VaultError> {
        let io_err = |source: std::io::Error| {
            if source.kind() == std::io::ErrorKind::AlreadyExists {
                VaultError::AlreadyExists(path.to_string())
            } else {
                VaultError::Io {
                    path: path.to_string(),
                    source,
                }
            }
        };
        let target = self.resolve(path);
        let file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
            .await
            .map_err(io_err)?;
        write_or_discard(&target, file, content.as_bytes())
            .await
            .map_err(io_err)
    }
}

/// Writes `content` and removes `target` again if the write fails, so a
/// partial file never passes for a finished one.
async fn write_or_discard<W>(target: &Path, mut writer: W, content: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let written = match writer.write_all(content).await {
        Ok(()) => writer.flush().await,
        Err(err) => Err(err),
    };
    if let Err(err) = written {
        drop(writer);
        if let Err(cleanup) = tokio::fs::remove_file(target).await {
            tracing::warn!(path = %target.display(), error = %cleanup, "failed to remove partial file");
        }
        return Err(err);
    }
    Ok(())
}

/// Opens vault files with the operating system's default handler.
#[derive(Debug, Clone)]
pub struct SystemWorkspace {
    root: PathBuf,
}

impl SystemWorkspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Workspace for SystemWorkspace {
    fn open(&self, path: &str, origin: &str) -> Result<(), VaultError> {
        let target = resolve_in(&self.root, path);
        tracing::debug!(path, origin, target = %target.display(), "opening note");
        open::that(&target).map_err(|err| VaultError::Open {
            path: path.to_string(),
            message: err.to_string(),
        })
    }
}

/// Where a document sits: the vault root and its vault-relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLocation {
    pub root: PathBuf,
    pub source_path: String,
}

/// Resolves `document` against `explicit_root`, or against the nearest
/// ancestor holding a `.obsidian` folder, or the current directory when the
/// document lies below it, or else the document's own folder.
pub fn locate_document(
    document: &Path,
    explicit_root: Option<&Path>,
) -> Result<DocumentLocation, VaultError> {
    let canonical = |p: &Path| {
        std::fs::canonicalize(p).map_err(|source| VaultError::Io {
            path: p.display().to_string(),
            source,
        })
    };
    let document = canonical(document)?;
    let root = match explicit_root {
        Some(root) => canonical(root)?,
        None => default_root(&document),
    };
    let source_path = relative_source_path(&document, &root)?;
    Ok(DocumentLocation { root, source_path })
}

fn default_root(document: &Path) -> PathBuf {
    let parent = document.parent().unwrap_or(Path::new("/"));
    if let Some(found) = parent.ancestors().find(|dir| dir.join(".obsidian").is_dir()) {
        return found.to_path_buf();
    }
    if let Ok(cwd) = std::env::current_dir().and_then(std::fs::canonicalize) {
        if document.starts_with(&cwd) {
            return cwd;
        }
    }
    parent.to_path_buf()
}

fn relative_source_path(document: &Path, root: &Path) -> Result<String, VaultError> {
    let relative = document
        .strip_prefix(root)
        .map_err(|_| VaultError::OutsideVault {
            document: document.to_path_buf(),
            root: root.to_path_buf(),
        })?;
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    Ok(parts.join("/"))
}
