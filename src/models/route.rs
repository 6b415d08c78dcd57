// ABOUTME: Route data models describing view definitions and concrete navigation targets
// These are the payloads exchanged with the router collaborator

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Symbolic identifier of a view definition, independent of path parameters.
pub type RouteKey = String;

/// Top-level functional grouping of views; each module owns its own tab collection.
pub type ModuleKey = String;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteMeta {
    pub title: String,
    pub i18n_key: Option<String>,
    pub module: Option<ModuleKey>,
    /// Distinct query strings open distinct tabs for this route
    pub multi_tab: bool,
    /// The tab for this route opens already pinned at this position
    pub fixed_index_in_tab: Option<usize>,
}

/// A route definition as enumerated by the router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRecord {
    pub key: RouteKey,
    /// Path pattern, `:name` segments are parameters
    pub path: String,
    #[serde(flatten)]
    pub meta: RouteMeta,
}

impl RouteRecord {
    pub fn new(key: impl Into<String>, path: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            path: path.into(),
            meta: RouteMeta {
                title: title.into(),
                ..RouteMeta::default()
            },
        }
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.meta.module = Some(module.into());
        self
    }

    pub fn with_i18n_key(mut self, key: impl Into<String>) -> Self {
        self.meta.i18n_key = Some(key.into());
        self
    }

    pub fn multi_tab(mut self) -> Self {
        self.meta.multi_tab = true;
        self
    }

    pub fn fixed_at(mut self, index: usize) -> Self {
        self.meta.fixed_index_in_tab = Some(index);
        self
    }

    pub fn has_params(&self) -> bool {
        self.path.split('/').any(|segment| segment.starts_with(':'))
    }

    /// Build the concrete route for this definition. Patterns with
    /// parameters need [`PushOptions::params`] to be resolved first.
    pub fn to_route(&self, query: BTreeMap<String, String>) -> TabRoute {
        TabRoute::new(self.key.clone(), self.path.clone(), query, self.meta.clone())
    }
}

/// A resolved navigation target: what the router reports as the current route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabRoute {
    pub name: RouteKey,
    pub path: String,
    pub full_path: String,
    pub query: BTreeMap<String, String>,
    pub meta: RouteMeta,
}

impl TabRoute {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        query: BTreeMap<String, String>,
        meta: RouteMeta,
    ) -> Self {
        let path = path.into();
        let full_path = join_query(&path, &query);
        Self {
            name: name.into(),
            path,
            full_path,
            query,
            meta,
        }
    }
}

/// Options for navigating by route key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushOptions {
    pub params: BTreeMap<String, String>,
    pub query: BTreeMap<String, String>,
}

/// Append `query` to `path` as `?k=v&...` in key order. Keys and values are
/// percent-encoded so reserved characters cannot split a pair.
pub fn join_query(path: &str, query: &BTreeMap<String, String>) -> String {
    if query.is_empty() {
        return path.to_string();
    }
    let pairs: Vec<String> = query
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect();
    format!("{}?{}", path, pairs.join("&"))
}

fn decode_component(raw: &str) -> String {
    urlencoding::decode(raw).map_or_else(|_| raw.to_string(), |decoded| decoded.into_owned())
}

/// Split a full path back into its path and decoded query map.
pub fn split_full_path(full_path: &str) -> (String, BTreeMap<String, String>) {
    let Some((path, query)) = full_path.split_once('?') else {
        return (full_path.to_string(), BTreeMap::new());
    };
    let query = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (decode_component(k), decode_component(v)),
            None => (decode_component(pair), String::new()),
        })
        .collect();
    (path.to_string(), query)
}

/// Match a concrete path against a route pattern segment by segment.
pub fn path_matches(pattern: &str, path: &str) -> bool {
    let pattern: Vec<&str> = pattern.trim_end_matches('/').split('/').collect();
    let path: Vec<&str> = path.trim_end_matches('/').split('/').collect();
    pattern.len() == path.len()
        && pattern
            .iter()
            .zip(&path)
            .all(|(p, s)| (p.starts_with(':') && !s.is_empty()) || p == s)
}
