//! Project root detection and asset path resolution.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::schema::AssetsConfig;

#[derive(Debug, Error)]
pub enum PathError {
    #[error("failed to get current working directory: {0}")]
    CurrentDir(io::Error),

    #[error("{marker} not found starting from directory: {}", start.display())]
    RootNotFound { marker: String, start: PathBuf },

    #[error("error accessing {}: {source}", path.display())]
    Access { path: PathBuf, source: io::Error },

    #[error("{kind} directory does not exist: {}", path.display())]
    MissingDir { kind: &'static str, path: PathBuf },
}

/// Resolved asset directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPaths {
    pub root: PathBuf,
    pub templates: PathBuf,
    pub static_files: PathBuf,
}

impl AssetPaths {
    /// Resolve asset directories from the working directory.
    pub fn resolve(config: &AssetsConfig) -> Result<Self, PathError> {
        let cwd = std::env::current_dir().map_err(PathError::CurrentDir)?;
        Self::resolve_from(config, &cwd)
    }

    /// Resolve asset directories, searching for the project root upward from `start`.
    pub fn resolve_from(config: &AssetsConfig, start: &Path) -> Result<Self, PathError> {
        let root = match &config.project_root {
            Some(root) => root.clone(),
            None => locate_project_root(start, &config.root_marker)?,
        };

        let templates = root.join(&config.templates_dir);
        let static_files = root.join(&config.static_dir);

        ensure_dir("templates", &templates)?;
        ensure_dir("static", &static_files)?;

        Ok(Self {
            root,
            templates,
            static_files,
        })
    }
}

/// Walk up from `start` until a directory containing `marker` is found.
pub fn locate_project_root(start: &Path, marker: &str) -> Result<PathBuf, PathError> {
    let mut dir = start;
    loop {
        let candidate = dir.join(marker);
        match candidate.try_exists() {
            Ok(true) => return Ok(dir.to_path_buf()),
            Ok(false) => match dir.parent() {
                Some(parent) => dir = parent,
                None => {
                    return Err(PathError::RootNotFound {
                        marker: marker.to_string(),
                        start: start.to_path_buf(),
                    })
                }
            },
            Err(source) => {
                return Err(PathError::Access {
                    path: candidate,
                    source,
                })
            }
        }
    }
}

fn ensure_dir(kind: &'static str, path: &Path) -> Result<(), PathError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(PathError::MissingDir {
            kind,
            path: path.to_path_buf(),
        })
    }
}
