//! View resolution chains.
//!
//! # Responsibilities
//! - Order a route's candidate view directories, most specific first
//! - Drop duplicates while keeping first-seen order
//! - Give each chain a unique identity for lookup caching

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::validation::{ValidatedConfig, ValidatedRoute};

/// Global counter for chain IDs.
/// Relaxed ordering is enough since only uniqueness matters.
static CHAIN_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(u64);

impl ChainId {
    fn next() -> Self {
        Self(CHAIN_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "views-{}", self.0)
    }
}

/// One entry of a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewDir {
    /// A directory on disk.
    Path(PathBuf),
    /// The partials compiled into this library.
    Builtin,
}

impl fmt::Display for ViewDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewDir::Path(p) => write!(f, "{}", p.display()),
            ViewDir::Builtin => write!(f, "<built-in partials>"),
        }
    }
}

/// Ordered, immutable list of view directories for one route.
#[derive(Debug)]
pub struct ViewResolutionChain {
    id: ChainId,
    dirs: Vec<ViewDir>,
}

impl ViewResolutionChain {
    /// Build a chain from explicit directories, followed by either the
    /// theme directories or the built-in partials.
    pub fn new<'a>(
        dirs: impl IntoIterator<Item = &'a Path>,
        theme_views: &[PathBuf],
    ) -> Self {
        let mut chain: Vec<ViewDir> = Vec::new();
        let mut push = |dir: ViewDir| {
            if !chain.contains(&dir) {
                chain.push(dir);
            }
        };

        for dir in dirs {
            push(ViewDir::Path(dir.to_path_buf()));
        }
        if theme_views.is_empty() {
            push(ViewDir::Builtin);
        } else {
            for dir in theme_views {
                push(ViewDir::Path(dir.clone()));
            }
        }

        Self {
            id: ChainId::next(),
            dirs: chain,
        }
    }

    /// `[route.views?, app.views?, theme | built-in]`.
    pub fn for_route(route: &ValidatedRoute, app: &ValidatedConfig) -> Self {
        let dirs = route.views.iter().chain(app.views.iter()).map(PathBuf::as_path);
        Self::new(dirs, &app.theme_views)
    }

    /// `[app.views?, theme | built-in]`, for pages outside any route.
    pub fn for_app(app: &ValidatedConfig) -> Self {
        Self::new(app.views.iter().map(PathBuf::as_path), &app.theme_views)
    }

    pub fn id(&self) -> ChainId {
        self.id
    }

    pub fn dirs(&self) -> &[ViewDir] {
        &self.dirs
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }
}

impl fmt::Display for ViewResolutionChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, dir) in self.dirs.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}", dir)?;
        }
        Ok(())
    }
}
