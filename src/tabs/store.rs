// ABOUTME: Module partition store holding each functional module's ordered tab collection
// Low-level mutations used by the session controller; ordering invariants are enforced here

use std::collections::BTreeMap;

use tracing::debug;

use super::policy;
use crate::models::{ModuleKey, Tab};

#[derive(Debug, Default, Clone)]
pub struct ModuleTabStore {
    modules: BTreeMap<ModuleKey, Vec<Tab>>,
}

impl ModuleTabStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tabs of `module`, fixed segment first. Empty for unknown modules.
    pub fn tabs(&self, module: &str) -> &[Tab] {
        self.modules.get(module).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn modules(&self) -> impl Iterator<Item = &ModuleKey> {
        self.modules.keys()
    }

    pub fn len(&self) -> usize {
        self.modules.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn find(&self, module: &str, id: &str) -> Option<&Tab> {
        self.tabs(module).iter().find(|tab| tab.id == id)
    }

    pub fn find_mut(&mut self, module: &str, id: &str) -> Option<&mut Tab> {
        self.modules.get_mut(module)?.iter_mut().find(|tab| tab.id == id)
    }

    pub fn position(&self, module: &str, id: &str) -> Option<usize> {
        self.tabs(module).iter().position(|tab| tab.id == id)
    }

    pub fn find_by_route_key(&self, module: &str, route_key: &str) -> Option<&Tab> {
        policy::find_tab_by_route_key(route_key, self.tabs(module))
    }

    pub fn fixed_ids(&self, module: &str) -> Vec<String> {
        policy::fixed_tab_ids(self.tabs(module))
    }

    /// Insert `tab` into its module unless a tab with the same id is already
    /// there. A tab arriving pinned joins the end of the fixed segment.
    /// Returns whether anything was inserted.
    pub fn insert_if_absent(&mut self, tab: Tab) -> bool {
        let tabs = self.modules.entry(tab.module.clone()).or_default();
        if policy::is_tab_in_tabs(&tab.id, tabs) {
            return false;
        }

        debug!("Opening tab {} in module {}", tab.id, tab.module);
        if tab.is_fixed() {
            let boundary = tabs.iter().filter(|t| t.is_fixed()).count();
            tabs.insert(boundary, tab);
            policy::reorder_fixed(tabs);
        } else {
            tabs.push(tab);
        }
        true
    }

    /// Remove by id, returning the former position and the tab. Absent ids
    /// are a no-op.
    pub fn remove(&mut self, module: &str, id: &str) -> Option<(usize, Tab)> {
        let tabs = self.modules.get_mut(module)?;
        let index = tabs.iter().position(|tab| tab.id == id)?;
        let tab = tabs.remove(index);
        policy::reorder_fixed(tabs);
        debug!("Closed tab {} in module {}", id, module);
        Some((index, tab))
    }

    /// Replace a module's whole collection. Invariants are re-established on
    /// the way in.
    pub fn replace(&mut self, module: &str, tabs: Vec<Tab>) {
        self.modules.insert(module.to_string(), policy::normalize(tabs));
    }

    /// Pin a tab at the end of the fixed segment. No-op if absent or already pinned.
    pub fn fix(&mut self, module: &str, id: &str) -> bool {
        let Some(tabs) = self.modules.get_mut(module) else {
            return false;
        };
        let Some(index) = tabs.iter().position(|tab| tab.id == id) else {
            return false;
        };
        if tabs[index].is_fixed() {
            return false;
        }

        let fixed_count = tabs.iter().filter(|tab| tab.is_fixed()).count();
        let mut tab = tabs.remove(index);
        tab.fixed_index = Some(fixed_count);
        tabs.insert(fixed_count, tab);
        policy::reorder_fixed(tabs);
        true
    }

    /// Unpin a tab, moving it to the first unfixed slot. No-op if absent or not pinned.
    pub fn unfix(&mut self, module: &str, id: &str) -> bool {
        let Some(tabs) = self.modules.get_mut(module) else {
            return false;
        };
        let Some(index) = tabs.iter().position(|tab| tab.id == id) else {
            return false;
        };
        if !tabs[index].is_fixed() {
            return false;
        }

        let mut tab = tabs.remove(index);
        tab.fixed_index = None;
        let fixed_count = tabs.iter().filter(|tab| tab.is_fixed()).count();
        tabs.insert(fixed_count, tab);
        policy::reorder_fixed(tabs);
        true
    }

    /// All tabs of every module, module by module. This is the persisted form.
    pub fn flatten(&self) -> Vec<Tab> {
        self.modules.values().flatten().cloned().collect()
    }

    /// Mutable pass over every tab in every module. Callers must not touch
    /// `id` or `fixed_index`.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(&mut Tab)) {
        self.modules.values_mut().flatten().for_each(&mut f);
    }
}
