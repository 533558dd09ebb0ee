//! Template cache with atomic snapshot replacement.
//!
//! # Design Decisions
//! - A cache snapshot is immutable once built
//! - `reload()` builds a complete new snapshot off to the side, then swaps it in
//! - Readers never lock; they pin whichever snapshot is current when they start
//! - Only one reload runs at a time

use arc_swap::ArcSwap;
use minijinja::{Environment, ErrorKind, UndefinedBehavior};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::observability::metrics;
use crate::templates::renderer::{RenderError, TemplateRenderer};

/// Suffix of renderable page templates.
pub const PAGE_SUFFIX: &str = ".page.html";

/// Suffix of shared layout templates merged into every page.
pub const LAYOUT_SUFFIX: &str = ".layout.html";

/// Errors raised while building a cache snapshot.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("error reading templates from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error parsing template {name}: {source}")]
    Parse {
        name: String,
        #[source]
        source: minijinja::Error,
    },
}

/// One complete, immutable set of compiled templates.
pub struct TemplateCache {
    env: Environment<'static>,
    pages: BTreeSet<String>,
    generation: u64,
}

impl TemplateCache {
    /// Parse every page and layout template in `dir`.
    pub fn build(dir: &Path, generation: u64) -> Result<Self, TemplateError> {
        let io_err = |source| TemplateError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut names = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_err)? {
            let entry = entry.map_err(io_err)?;
            if !entry.file_type().map_err(io_err)?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if name.ends_with(PAGE_SUFFIX) || name.ends_with(LAYOUT_SUFFIX) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();

        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);

        let mut pages = BTreeSet::new();
        for name in names {
            let path = dir.join(&name);
            let source = fs::read_to_string(&path)
                .map_err(|source| TemplateError::Io { path, source })?;

            env.add_template_owned(name.clone(), source)
                .map_err(|source| TemplateError::Parse {
                    name: name.clone(),
                    source,
                })?;

            if name.ends_with(PAGE_SUFFIX) {
                tracing::debug!(template = %name, "Loaded template");
                pages.insert(name);
            }
        }

        Ok(Self {
            env,
            pages,
            generation,
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.pages.contains(name)
    }

    /// Names of renderable pages, sorted.
    pub fn page_names(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Monotonic version of this snapshot, starting at 1.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn render(&self, name: &str, data: &Value) -> Result<String, RenderError> {
        if !self.contains(name) {
            return Err(RenderError::NotFound(name.to_string()));
        }

        let template = self.env.get_template(name).map_err(|e| match e.kind() {
            ErrorKind::TemplateNotFound => RenderError::NotFound(name.to_string()),
            _ => RenderError::Failed {
                name: name.to_string(),
                reason: e.to_string(),
            },
        })?;

        template.render(data).map_err(|e| RenderError::Failed {
            name: name.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Process-wide template cache.
pub struct TemplateStore {
    dir: PathBuf,
    current: ArcSwap<TemplateCache>,
    writer: Mutex<()>,
}

impl TemplateStore {
    /// Build the initial snapshot from `dir`. Fails if any template is unreadable or invalid.
    pub fn load(dir: impl Into<PathBuf>) -> Result<Self, TemplateError> {
        let dir = dir.into();
        let cache = TemplateCache::build(&dir, 1)?;

        tracing::info!(
            dir = %dir.display(),
            pages = cache.len(),
            "Templates loaded"
        );
        metrics::record_template_reload(true, cache.len());

        Ok(Self {
            dir,
            current: ArcSwap::from_pointee(cache),
            writer: Mutex::new(()),
        })
    }

    /// Rebuild the cache from disk and swap it in as one unit.
    ///
    /// On error the current snapshot stays in place.
    pub fn reload(&self) -> Result<Arc<TemplateCache>, TemplateError> {
        let _writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        let next_generation = self.current.load().generation() + 1;

        match TemplateCache::build(&self.dir, next_generation) {
            Ok(cache) => {
                let cache = Arc::new(cache);
                self.current.store(cache.clone());
                tracing::info!(
                    generation = next_generation,
                    pages = cache.len(),
                    "Templates reloaded"
                );
                metrics::record_template_reload(true, cache.len());
                Ok(cache)
            }
            Err(e) => {
                tracing::error!(error = %e, "Template reload failed, keeping current templates");
                metrics::record_template_reload(false, self.current.load().len());
                Err(e)
            }
        }
    }

    /// The snapshot current at the time of the call.
    pub fn snapshot(&self) -> Arc<TemplateCache> {
        self.current.load_full()
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl TemplateRenderer for TemplateStore {
    fn render(&self, name: &str, data: &Value) -> Result<String, RenderError> {
        self.current.load().render(name, data)
    }
}
