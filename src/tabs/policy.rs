// ABOUTME: Pure tab ordering and identity rules shared by the store and the session controller
// Nothing here touches collaborators except the label resolver passed in by reference

use std::collections::HashSet;

use crate::locale::LocaleResolver;
use crate::models::{join_query, RouteMeta, Tab, TabRoute};

/// Stable tab id for a route. Multi-tab routes include the sorted, encoded
/// query so each distinct query opens its own tab; every other route
/// collapses to its concrete path.
pub fn derive_id(route: &TabRoute) -> String {
    if route.meta.multi_tab {
        return join_query(&route.path, &route.query);
    }
    route.path.clone()
}

/// Label for a route: translated i18n key, then title, then the route key.
pub fn resolve_label(name: &str, meta: &RouteMeta, locale: &dyn LocaleResolver) -> String {
    meta.i18n_key
        .as_deref()
        .and_then(|key| locale.translate(key))
        .or_else(|| (!meta.title.is_empty()).then(|| meta.title.clone()))
        .unwrap_or_else(|| name.to_string())
}

/// Build the descriptor for a route. The module comes from the route meta,
/// falling back to `default_module`.
pub fn tab_from_route(route: &TabRoute, default_module: &str, locale: &dyn LocaleResolver) -> Tab {
    Tab {
        id: derive_id(route),
        route_key: route.name.clone(),
        route_path: route.path.clone(),
        full_path: route.full_path.clone(),
        module: route
            .meta
            .module
            .clone()
            .unwrap_or_else(|| default_module.to_string()),
        label: resolve_label(&route.name, &route.meta, locale),
        new_label: None,
        old_label: None,
        i18n_key: route.meta.i18n_key.clone(),
        fixed_index: route.meta.fixed_index_in_tab,
    }
}

pub fn is_fixed(tab: &Tab) -> bool {
    tab.fixed_index.is_some()
}

pub fn is_same_tab(a: &Tab, b: &Tab) -> bool {
    a.id == b.id
}

pub fn is_tab_in_tabs(id: &str, tabs: &[Tab]) -> bool {
    tabs.iter().any(|tab| tab.id == id)
}

pub fn fixed_tab_ids(tabs: &[Tab]) -> Vec<String> {
    tabs.iter().filter(|tab| is_fixed(tab)).map(|tab| tab.id.clone()).collect()
}

/// Tabs whose id is not in `ids`, order preserved.
pub fn filter_tabs_by_ids(ids: &[String], tabs: &[Tab]) -> Vec<Tab> {
    tabs.iter().filter(|tab| !ids.contains(&tab.id)).cloned().collect()
}

pub fn find_tab_by_route_key<'a>(route_key: &str, tabs: &'a [Tab]) -> Option<&'a Tab> {
    tabs.iter().find(|tab| tab.route_key == route_key)
}

/// Renumber fixed tabs densely from 0 in collection order. Unfixed tabs are
/// left alone. Idempotent.
pub fn reorder_fixed(tabs: &mut [Tab]) {
    let mut next = 0;
    for tab in tabs.iter_mut().filter(|tab| tab.fixed_index.is_some()) {
        tab.fixed_index = Some(next);
        next += 1;
    }
}

/// Re-establish every collection invariant on an arbitrary tab list: unique
/// ids (first occurrence wins), fixed tabs first by `fixed_index`, dense
/// numbering, unfixed tabs keeping their relative order.
pub fn normalize(tabs: Vec<Tab>) -> Vec<Tab> {
    let mut seen = HashSet::new();
    let unique: Vec<Tab> = tabs.into_iter().filter(|tab| seen.insert(tab.id.clone())).collect();

    let (mut fixed, unfixed): (Vec<Tab>, Vec<Tab>) = unique.into_iter().partition(is_fixed);
    fixed.sort_by_key(|tab| tab.fixed_index);
    fixed.extend(unfixed);
    reorder_fixed(&mut fixed);
    fixed
}

/// Display list for the current module. The home tab leads (with its module
/// rewritten to the current one) only when it belongs to the current module.
pub fn visible_tabs(
    module_tabs: &[Tab],
    home_tab: Option<&Tab>,
    current_module: &str,
    home_module: &str,
) -> Vec<Tab> {
    let home = home_tab.filter(|_| home_module == current_module);

    let rest = module_tabs
        .iter()
        .filter(|tab| home.map_or(true, |home| tab.id != home.id));
    let mut fixed: Vec<Tab> = rest.clone().filter(|tab| is_fixed(tab)).cloned().collect();
    fixed.sort_by_key(|tab| tab.fixed_index);

    let mut all = Vec::with_capacity(module_tabs.len() + 1);
    if let Some(home) = home {
        all.push(Tab {
            module: current_module.to_string(),
            ..home.clone()
        });
    }
    all.extend(fixed);
    all.extend(rest.filter(|tab| !is_fixed(tab)).cloned());
    all
}

/// Refresh the base label from the tab's i18n key. Overrides are untouched.
pub fn relabel(tab: &mut Tab, locale: &dyn LocaleResolver) {
    if let Some(label) = tab.i18n_key.as_deref().and_then(|key| locale.translate(key)) {
        tab.label = label;
    }
}

/// Fallback path for a route key the router does not know: `disk_list` -> `/disk/list`.
pub fn route_path_from_key(key: &str) -> String {
    format!("/{}", key.replace('_', "/"))
}
