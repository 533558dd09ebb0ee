//! Route table and static asset policy.
//!
//! # Responsibilities
//! - Hold every page route with its access level
//! - Classify a request path as static, public, protected or unknown
//! - Gate static assets on an extension allowlist
//!
//! # Design Decisions
//! - Exact matches win; subtree entries (path ending in `/`) catch the rest of their prefix,
//!   longest prefix first
//! - Immutable after construction (thread-safe without locks)
//! - The same table builds the handler mux, so the two cannot drift

use std::collections::HashMap;
use thiserror::Error;

use crate::handlers::Page;

/// Prefix under which static assets are served.
pub const STATIC_PREFIX: &str = "/static/";

/// File extensions that may be served from the static directory.
pub const ALLOWED_STATIC_EXTENSIONS: &[&str] = &["css", "js", "jpg", "png", "gif", "svg"];

/// Who may reach a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Protected,
}

/// How a route's path is compared with the request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matching {
    Exact,
    /// Every path under this prefix. The prefix ends with `/`.
    Subtree,
}

/// A registered page route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub access: Access,
    pub matching: Matching,
    pub page: Page,
}

impl Route {
    pub const fn public(path: &'static str, page: Page) -> Self {
        Self {
            path,
            access: Access::Public,
            matching: Matching::Exact,
            page,
        }
    }

    pub const fn protected(path: &'static str, page: Page) -> Self {
        Self {
            path,
            access: Access::Protected,
            matching: Matching::Exact,
            page,
        }
    }

    /// Protect everything under `prefix`, rendering `page` where no exact route matches.
    pub const fn protected_subtree(prefix: &'static str, page: Page) -> Self {
        Self {
            path: prefix,
            access: Access::Protected,
            matching: Matching::Subtree,
            page,
        }
    }

    pub fn is_subtree(&self) -> bool {
        self.matching == Matching::Subtree
    }

    pub fn requires_auth(&self) -> bool {
        self.access == Access::Protected
    }
}

/// The fixed application routes.
pub const ROUTES: &[Route] = &[
    Route::public("/", Page::Home),
    Route::public("/about", Page::About),
    Route::public("/login", Page::Login),
    Route::public("/signup", Page::Signup),
    Route::protected("/dashboard", Page::Dashboard),
    Route::protected("/dashboard/schedule-pickup", Page::SchedulePickup),
    Route::protected_subtree("/dashboard/", Page::Dashboard),
];

/// Result of classifying a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification<'a> {
    /// Under the static prefix. `permitted` is false for disallowed file types.
    Static { permitted: bool },
    Public(&'a Route),
    Protected(&'a Route),
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteTableError {
    #[error("duplicate route: {0}")]
    Duplicate(&'static str),

    #[error("route path must start with '/': {0}")]
    NotAbsolute(&'static str),

    #[error("route {0} overlaps the static asset prefix")]
    StaticOverlap(&'static str),

    #[error("subtree route must end with '/': {0}")]
    SubtreeWithoutSlash(&'static str),
}

/// Immutable lookup from path to route.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
    by_path: HashMap<&'static str, usize>,
    /// Indices of subtree routes, longest prefix first.
    subtrees: Vec<usize>,
}

impl RouteTable {
    /// Build a table, rejecting duplicate or malformed paths.
    pub fn new(routes: &[Route]) -> Result<Self, RouteTableError> {
        let mut by_path = HashMap::with_capacity(routes.len());
        let mut subtrees = Vec::new();
        for (index, route) in routes.iter().enumerate() {
            if !route.path.starts_with('/') {
                return Err(RouteTableError::NotAbsolute(route.path));
            }
            let covers_static = route.is_subtree() && STATIC_PREFIX.starts_with(route.path);
            if route.path.starts_with(STATIC_PREFIX) || covers_static {
                return Err(RouteTableError::StaticOverlap(route.path));
            }
            if route.is_subtree() && !route.path.ends_with('/') {
                return Err(RouteTableError::SubtreeWithoutSlash(route.path));
            }
            if by_path.insert(route.path, index).is_some() {
                return Err(RouteTableError::Duplicate(route.path));
            }
            if route.is_subtree() {
                subtrees.push(index);
            }
        }
        subtrees.sort_by_key(|&i| std::cmp::Reverse(routes[i].path.len()));

        Ok(Self {
            routes: routes.to_vec(),
            by_path,
            subtrees,
        })
    }

    /// The application's fixed route table.
    pub fn standard() -> Result<Self, RouteTableError> {
        Self::new(ROUTES)
    }

    pub fn classify(&self, path: &str) -> Classification<'_> {
        if path.starts_with(STATIC_PREFIX) {
            return Classification::Static {
                permitted: is_allowed_extension(path),
            };
        }

        match self.resolve(path) {
            Some(route) if route.requires_auth() => Classification::Protected(route),
            Some(route) => Classification::Public(route),
            None => Classification::Unknown,
        }
    }

    /// The route serving `path`: an exact entry, else the longest enclosing subtree.
    pub fn resolve(&self, path: &str) -> Option<&Route> {
        if let Some(&i) = self.by_path.get(path) {
            let route = &self.routes[i];
            if !route.is_subtree() {
                return Some(route);
            }
        }
        self.subtrees
            .iter()
            .map(|&i| &self.routes[i])
            .find(|route| path.starts_with(route.path))
    }

    /// The exact route registered for `path`.
    pub fn get(&self, path: &str) -> Option<&Route> {
        self.by_path
            .get(path)
            .map(|&i| &self.routes[i])
            .filter(|route| !route.is_subtree())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Whether the last path segment carries an allowed extension. Case-sensitive.
pub fn is_allowed_extension(path: &str) -> bool {
    let file = path.rsplit('/').next().unwrap_or(path);
    match file.rsplit_once('.') {
        Some((_, ext)) => ALLOWED_STATIC_EXTENSIONS.contains(&ext),
        None => false,
    }
}
