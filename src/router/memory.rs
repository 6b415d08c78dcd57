// ABOUTME: In-memory router and route cache backing the terminal console and the tests
// Routes come from configuration; navigation resolves paths against the route table

use async_trait::async_trait;
use std::collections::{BTreeSet, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

use super::{NavigationError, RouteCache, Router};
use crate::models::{path_matches, split_full_path, ModuleKey, RouteRecord, TabRoute};

#[derive(Debug, Default)]
struct RouterState {
    current: Option<TabRoute>,
    history: Vec<String>,
    guarded: HashSet<String>,
}

/// Router over a fixed route table with a navigation history. Paths can be
/// guarded to make navigation to them fail.
#[derive(Debug)]
pub struct MemoryRouter {
    routes: Vec<RouteRecord>,
    default_module: ModuleKey,
    state: Mutex<RouterState>,
}

impl MemoryRouter {
    pub fn new(routes: Vec<RouteRecord>, default_module: impl Into<String>) -> Self {
        Self {
            routes,
            default_module: default_module.into(),
            state: Mutex::new(RouterState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, RouterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Resolve a full path against the route table.
    pub fn resolve(&self, full_path: &str) -> Option<TabRoute> {
        let (path, query) = split_full_path(full_path);
        let record = self.routes.iter().find(|route| path_matches(&route.path, &path))?;
        Some(TabRoute::new(record.key.clone(), path, query, record.meta.clone()))
    }

    /// Make navigation to `path` (ignoring the query) fail until unguarded.
    pub fn guard(&self, path: &str) {
        self.state().guarded.insert(path.to_string());
    }

    pub fn unguard(&self, path: &str) {
        self.state().guarded.remove(path);
    }

    pub fn is_guarded(&self, path: &str) -> bool {
        self.state().guarded.contains(path)
    }

    /// Every full path successfully navigated to, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.state().history.clone()
    }

    /// Modules present in the route table, sorted.
    pub fn module_keys(&self) -> Vec<ModuleKey> {
        self.routes
            .iter()
            .map(|route| route.meta.module.clone().unwrap_or_else(|| self.default_module.clone()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[async_trait]
impl Router for MemoryRouter {
    fn current_module(&self) -> ModuleKey {
        self.state()
            .current
            .as_ref()
            .and_then(|route| route.meta.module.clone())
            .unwrap_or_else(|| self.default_module.clone())
    }

    fn current_route(&self) -> Option<TabRoute> {
        self.state().current.clone()
    }

    fn routes(&self) -> Vec<RouteRecord> {
        self.routes.clone()
    }

    async fn navigate(&self, full_path: &str) -> Result<(), NavigationError> {
        tokio::task::yield_now().await;

        let route = self
            .resolve(full_path)
            .ok_or_else(|| NavigationError::NoMatch(full_path.to_string()))?;

        let mut state = self.state();
        if state.guarded.contains(&route.path) {
            debug!("Navigation to {} rejected by guard", full_path);
            return Err(NavigationError::Guarded(full_path.to_string()));
        }

        info!("Navigated to {}", route.full_path);
        state.history.push(route.full_path.clone());
        state.current = Some(route);
        Ok(())
    }
}

/// Route cache that records which routes are alive. Invalidation drops the
/// key and counts it.
#[derive(Debug, Default)]
pub struct MemoryRouteCache {
    alive: Mutex<BTreeSet<String>>,
    invalidated: Mutex<Vec<String>>,
}

impl MemoryRouteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a route's output as cached.
    pub fn keep_alive(&self, route_key: &str) {
        self.alive
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(route_key.to_string());
    }

    pub fn is_cached(&self, route_key: &str) -> bool {
        self.alive
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(route_key)
    }

    /// Route keys invalidated so far, in call order.
    pub fn invalidated(&self) -> Vec<String> {
        self.invalidated
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl RouteCache for MemoryRouteCache {
    fn invalidate(&self, route_key: &str) {
        self.alive
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(route_key);
        self.invalidated
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(route_key.to_string());
    }
}
