// ABOUTME: Tab session controller orchestrating open views per module, the home tab and persistence
// Navigation goes through the router collaborator; tab state only commits what navigation allows

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::policy;
use super::store::ModuleTabStore;
use crate::config::TabConfig;
use crate::locale::{LocaleResolver, NoopResolver};
use crate::models::{
    path_matches, split_full_path, ModuleKey, PushOptions, RouteRecord, Tab, TabRoute, TabsView,
};
use crate::router::{RouteCache, Router};
use crate::storage::TabStorage;

pub struct TabSession {
    config: TabConfig,
    router: Arc<dyn Router>,
    cache: Arc<dyn RouteCache>,
    storage: Arc<dyn TabStorage>,
    locale: Arc<dyn LocaleResolver>,
    store: ModuleTabStore,
    home_tab: Option<Tab>,
    active_tab_id: String,
    initialized: bool,
}

impl TabSession {
    pub fn new(
        config: TabConfig,
        router: Arc<dyn Router>,
        cache: Arc<dyn RouteCache>,
        storage: Arc<dyn TabStorage>,
    ) -> Self {
        Self {
            config,
            router,
            cache,
            storage,
            locale: Arc::new(NoopResolver),
            store: ModuleTabStore::new(),
            home_tab: None,
            active_tab_id: String::new(),
            initialized: false,
        }
    }

    pub fn with_locale(mut self, locale: Arc<dyn LocaleResolver>) -> Self {
        self.locale = locale;
        self
    }

    pub fn config(&self) -> &TabConfig {
        &self.config
    }

    pub fn store(&self) -> &ModuleTabStore {
        &self.store
    }

    pub fn home_tab(&self) -> Option<&Tab> {
        self.home_tab.as_ref()
    }

    pub fn active_tab_id(&self) -> &str {
        &self.active_tab_id
    }

    pub fn set_active_tab_id(&mut self, id: impl Into<String>) {
        self.active_tab_id = id.into();
    }

    pub fn current_module(&self) -> ModuleKey {
        self.router.current_module()
    }

    /// The stored tabs of the current module, without the home tab.
    pub fn current_module_tabs(&self) -> &[Tab] {
        self.store.tabs(&self.router.current_module())
    }

    /// Module the home route belongs to.
    pub fn home_module(&self) -> ModuleKey {
        self.home_tab
            .as_ref()
            .and_then(|home| self.router.route(&home.route_key))
            .and_then(|route| route.meta.module)
            .unwrap_or_else(|| self.config.default_module.clone())
    }

    /// Visible tabs of the current module, home tab first when it belongs here.
    pub fn tabs(&self) -> Vec<Tab> {
        let module = self.router.current_module();
        policy::visible_tabs(
            self.store.tabs(&module),
            self.home_tab.as_ref(),
            &module,
            &self.home_module(),
        )
    }

    pub fn snapshot(&self) -> TabsView {
        TabsView {
            tabs: self.tabs(),
            active_tab_id: self.active_tab_id.clone(),
        }
    }

    pub fn get_tab_id_by_route(&self, route: &TabRoute) -> String {
        policy::derive_id(route)
    }

    /// Synthesize the home tab from the configured home route.
    pub fn init_home_tab(&mut self) {
        let key = self.config.home_route.clone();
        let home = match self.router.route(&key) {
            Some(record) if !record.has_params() => policy::tab_from_route(
                &record.to_route(BTreeMap::new()),
                &self.config.default_module,
                self.locale.as_ref(),
            ),
            _ => {
                let path = policy::route_path_from_key(&key);
                let i18n_key = format!("route.{key}");
                let label = self.locale.translate(&i18n_key).unwrap_or_else(|| key.clone());
                Tab {
                    id: path.clone(),
                    route_key: key,
                    route_path: path.clone(),
                    full_path: path,
                    module: self.config.default_module.clone(),
                    label,
                    new_label: None,
                    old_label: None,
                    i18n_key: Some(i18n_key),
                    fixed_index: None,
                }
            }
        };
        debug!("Home tab is {}", home.id);
        self.home_tab = Some(home);
    }

    /// One-time setup: home tab, rehydration from storage, then activation of
    /// `current_route`. Later calls only re-resolve the active tab.
    pub fn init_session(&mut self, current_route: &TabRoute) {
        if !self.initialized {
            self.init_home_tab();
            self.rehydrate();
            self.initialized = true;
            info!(
                "Tab session initialized with {} restored tabs",
                self.store.len()
            );
        }
        self.add_tab(current_route, true);
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn is_home(&self, tab: &Tab) -> bool {
        self.home_tab
            .as_ref()
            .is_some_and(|home| policy::is_same_tab(home, tab) || home.route_path == tab.route_path)
    }

    fn rehydrate(&mut self) {
        if !self.config.cache {
            return;
        }

        let blob = match self.storage.load(&self.config.storage_key) {
            Ok(Some(blob)) => blob,
            Ok(None) => return,
            Err(e) => {
                warn!("Failed to load persisted tabs: {}", e);
                return;
            }
        };

        let entries: Vec<serde_json::Value> = match serde_json::from_str(&blob) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Discarding unreadable persisted tabs: {}", e);
                return;
            }
        };

        let routes = self.router.routes();
        let total = entries.len();
        let mut partitioned: BTreeMap<ModuleKey, Vec<Tab>> = BTreeMap::new();
        for entry in entries {
            let Some(tab) = self.restore_tab(entry, &routes) else {
                continue;
            };
            if self.is_home(&tab) {
                continue;
            }
            partitioned.entry(tab.module.clone()).or_default().push(tab);
        }

        let restored: usize = partitioned.values().map(Vec::len).sum();
        if restored < total {
            warn!("Dropped {} stale persisted tabs", total - restored);
        }
        for (module, tabs) in partitioned {
            self.store.replace(&module, tabs);
        }
    }

    /// Rebuild a persisted entry against the current route table. `None` when
    /// the entry is malformed or its route no longer exists.
    fn restore_tab(&self, entry: serde_json::Value, routes: &[RouteRecord]) -> Option<Tab> {
        let persisted: Tab = match serde_json::from_value(entry) {
            Ok(tab) => tab,
            Err(e) => {
                debug!("Skipping malformed persisted tab: {}", e);
                return None;
            }
        };

        let record = routes.iter().find(|route| route.key == persisted.route_key)?;
        let (path, query) = split_full_path(&persisted.full_path);
        if !path_matches(&record.path, &path) {
            debug!("Persisted tab {} no longer matches route {}", persisted.id, record.key);
            return None;
        }

        let route = TabRoute::new(record.key.clone(), path, query, record.meta.clone());
        let mut tab = policy::tab_from_route(&route, &self.config.default_module, self.locale.as_ref());
        tab.new_label = persisted.new_label;
        tab.old_label = persisted.old_label;
        tab.fixed_index = persisted.fixed_index;
        Some(tab)
    }

    /// Open (or re-focus) the tab for `route`. The home route is never
    /// stored, only activated.
    pub fn add_tab(&mut self, route: &TabRoute, activate: bool) {
        let tab = policy::tab_from_route(route, &self.config.default_module, self.locale.as_ref());

        let target = if self.is_home(&tab) {
            self.home_tab.as_ref().map_or(tab.id, |home| home.id.clone())
        } else {
            let id = tab.id.clone();
            self.store.insert_if_absent(tab);
            id
        };

        if activate {
            self.set_active_tab_id(target);
        }
    }

    /// React to the router's current route. Returns false if there is none.
    pub fn sync_with_router(&mut self) -> bool {
        match self.router.current_route() {
            Some(route) => {
                self.add_tab(&route, true);
                true
            }
            None => false,
        }
    }

    /// Navigate to `tab`; the active id only moves if navigation succeeds.
    pub async fn switch_route_by_tab(&mut self, tab: &Tab) -> bool {
        match self.router.navigate(&tab.full_path).await {
            Ok(()) => {
                self.set_active_tab_id(tab.id.clone());
                true
            }
            Err(e) => {
                warn!("Navigation to tab {} failed: {}", tab.id, e);
                false
            }
        }
    }

    /// Close a tab of the current module. When it was active, focus moves to
    /// its right neighbour, else its left neighbour, else home. Removal and
    /// cache invalidation happen whether or not that switch succeeds.
    pub async fn remove_tab(&mut self, id: &str) {
        let module = self.router.current_module();
        let tabs = self.store.tabs(&module);
        let Some(index) = tabs.iter().position(|tab| tab.id == id) else {
            return;
        };

        let is_active = self.active_tab_id == id;
        let next = tabs
            .get(index + 1)
            .or_else(|| index.checked_sub(1).and_then(|i| tabs.get(i)))
            .or(self.home_tab.as_ref())
            .cloned();

        let Some((_, removed)) = self.store.remove(&module, id) else {
            return;
        };

        if is_active {
            if let Some(next) = next {
                self.switch_route_by_tab(&next).await;
            }
        }

        self.cache.invalidate(&removed.route_key);
    }

    pub async fn remove_active_tab(&mut self) {
        let id = self.active_tab_id.clone();
        self.remove_tab(&id).await;
    }

    pub async fn remove_tab_by_route_name(&mut self, name: &str) {
        let module = self.router.current_module();
        let Some(id) = self.store.find_by_route_key(&module, name).map(|tab| tab.id.clone()) else {
            return;
        };
        self.remove_tab(&id).await;
    }

    /// Close every tab of the current module that is neither fixed nor in
    /// `excludes`. If the active tab goes, focus moves to the last survivor
    /// (or home) before the collection is committed.
    pub async fn clear_tabs(&mut self, excludes: &[String]) {
        let module = self.router.current_module();
        let mut retained = self.store.fixed_ids(&module);
        retained.extend(excludes.iter().cloned());

        let tabs = self.store.tabs(&module);
        let removed: Vec<Tab> = tabs
            .iter()
            .filter(|tab| !retained.contains(&tab.id))
            .cloned()
            .collect();
        if removed.is_empty() {
            return;
        }

        let removed_ids: Vec<String> = removed.iter().map(|tab| tab.id.clone()).collect();
        let survivors = policy::filter_tabs_by_ids(&removed_ids, tabs);

        if removed_ids.contains(&self.active_tab_id) {
            let candidate = survivors.last().cloned().or_else(|| self.home_tab.clone());
            if let Some(candidate) = candidate {
                self.switch_route_by_tab(&candidate).await;
            }
        }

        debug!("Clearing {} tabs in module {}", removed.len(), module);
        self.store.replace(&module, survivors);

        for tab in &removed {
            self.cache.invalidate(&tab.route_key);
        }
    }

    /// Close everything left of `id` that is not fixed.
    pub async fn clear_left_tabs(&mut self, id: &str) {
        let tabs = self.current_module_tabs();
        let Some(index) = tabs.iter().position(|tab| tab.id == id) else {
            return;
        };
        let excludes: Vec<String> = tabs[index..].iter().map(|tab| tab.id.clone()).collect();
        self.clear_tabs(&excludes).await;
    }

    /// Close everything right of `id` that is not fixed. On the home tab this
    /// clears every unfixed tab.
    pub async fn clear_right_tabs(&mut self, id: &str) {
        if self.home_tab.as_ref().is_some_and(|home| home.id == id) {
            self.clear_tabs(&[]).await;
            return;
        }

        let tabs = self.current_module_tabs();
        let Some(index) = tabs.iter().position(|tab| tab.id == id) else {
            return;
        };
        let excludes: Vec<String> = tabs[..=index].iter().map(|tab| tab.id.clone()).collect();
        self.clear_tabs(&excludes).await;
    }

    /// Navigate to `key`, then close the previously active tab unless it is
    /// retained. A failed navigation changes nothing.
    pub async fn replace_tab(&mut self, key: &str, options: &PushOptions) -> bool {
        let old_id = self.active_tab_id.clone();

        if let Err(e) = self.router.navigate_by_key(key, options).await {
            warn!("Failed to replace tab {} with route {}: {}", old_id, key, e);
            return false;
        }
        self.sync_with_router();

        if old_id != self.active_tab_id && !self.is_tab_retained(&old_id) {
            self.remove_tab(&old_id).await;
        }
        true
    }

    pub fn fix_tab(&mut self, id: &str) -> bool {
        let module = self.router.current_module();
        self.store.fix(&module, id)
    }

    pub fn unfix_tab(&mut self, id: &str) -> bool {
        let module = self.router.current_module();
        self.store.unfix(&module, id)
    }

    /// Override the label of `id` (default: the active tab).
    pub fn set_tab_label(&mut self, label: &str, id: Option<&str>) {
        let id = id.map_or_else(|| self.active_tab_id.clone(), str::to_string);
        let module = self.router.current_module();
        let Some(tab) = self.store.find_mut(&module, &id) else {
            return;
        };
        tab.old_label = Some(tab.label.clone());
        tab.new_label = Some(label.to_string());
    }

    /// Drop the label override of `id` (default: the active tab). The label
    /// it replaced stays in `old_label`.
    pub fn reset_tab_label(&mut self, id: Option<&str>) {
        let id = id.map_or_else(|| self.active_tab_id.clone(), str::to_string);
        let module = self.router.current_module();
        let Some(tab) = self.store.find_mut(&module, &id) else {
            return;
        };
        tab.new_label = None;
    }

    /// Home and fixed tabs survive bulk clears and replacement.
    pub fn is_tab_retained(&self, id: &str) -> bool {
        if self.home_tab.as_ref().is_some_and(|home| home.id == id) {
            return true;
        }
        self.store
            .fixed_ids(&self.router.current_module())
            .iter()
            .any(|fixed| fixed == id)
    }

    /// Re-resolve every base label, in every module and on the home tab.
    pub fn update_tabs_by_locale(&mut self) {
        let locale = Arc::clone(&self.locale);
        self.store.for_each_mut(|tab| policy::relabel(tab, locale.as_ref()));
        if let Some(home) = self.home_tab.as_mut() {
            policy::relabel(home, locale.as_ref());
        }
    }

    /// Write every module's tabs to storage. Best effort; failures are logged.
    pub fn cache_session(&self) {
        if !self.config.cache {
            return;
        }

        let tabs = self.store.flatten();
        let blob = match serde_json::to_string(&tabs) {
            Ok(blob) => blob,
            Err(e) => {
                warn!("Failed to serialize tabs: {}", e);
                return;
            }
        };
        match self.storage.save(&self.config.storage_key, &blob) {
            Ok(()) => info!("Cached {} tabs", tabs.len()),
            Err(e) => warn!("Failed to cache tabs: {}", e),
        }
    }
}
