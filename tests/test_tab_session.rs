// ABOUTME: Behaviour tests for the tab session controller: opening, closing, clearing, pinning and relabeling
// Drives the controller through the in-memory router the way user navigation would

use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::sync::Arc;

use tab_console::config::TabConfig;
use tab_console::locale::MessageCatalog;
use tab_console::models::{PushOptions, RouteRecord};
use tab_console::router::{MemoryRouteCache, MemoryRouter, Router};
use tab_console::storage::MemoryStorage;
use tab_console::tabs::TabSession;

struct Harness {
    router: Arc<MemoryRouter>,
    cache: Arc<MemoryRouteCache>,
    session: TabSession,
}

fn routes() -> Vec<RouteRecord> {
    vec![
        RouteRecord::new("home", "/home", "Home").with_i18n_key("route.home"),
        RouteRecord::new("a", "/a", "A").with_i18n_key("route.a"),
        RouteRecord::new("b", "/b", "B"),
        RouteRecord::new("c", "/c", "C"),
        RouteRecord::new("d", "/d", "D"),
        RouteRecord::new("disk_list", "/disk/list", "Files")
            .with_module("disk")
            .multi_tab(),
        RouteRecord::new("disk_share", "/disk/share", "Shared").with_module("disk"),
    ]
}

fn catalog() -> Arc<MessageCatalog> {
    let mut en = HashMap::new();
    en.insert("route.home".to_string(), "Home".to_string());
    en.insert("route.a".to_string(), "Alpha".to_string());
    let mut zh = HashMap::new();
    zh.insert("route.home".to_string(), "首页".to_string());
    zh.insert("route.a".to_string(), "甲".to_string());
    let mut catalogs = HashMap::new();
    catalogs.insert("en".to_string(), en);
    catalogs.insert("zh".to_string(), zh);
    Arc::new(MessageCatalog::new(catalogs, "en"))
}

// Factory: a session started on the home route
async fn harness() -> Harness {
    let router = Arc::new(MemoryRouter::new(routes(), "admin"));
    let cache = Arc::new(MemoryRouteCache::new());
    let mut session = TabSession::new(
        TabConfig::default(),
        router.clone(),
        cache.clone(),
        Arc::new(MemoryStorage::new()),
    )
    .with_locale(catalog());

    router.navigate("/home").await.unwrap();
    session.init_session(&router.current_route().unwrap());

    Harness {
        router,
        cache,
        session,
    }
}

impl Harness {
    // Navigate like a user would and let the session react to the new route
    async fn open(&mut self, path: &str) {
        self.router.navigate(path).await.unwrap();
        self.session.sync_with_router();
    }

    fn ids(&self) -> Vec<String> {
        self.session
            .current_module_tabs()
            .iter()
            .map(|tab| tab.id.clone())
            .collect()
    }

    fn fixed_indices(&self) -> Vec<Option<usize>> {
        self.session
            .current_module_tabs()
            .iter()
            .map(|tab| tab.fixed_index)
            .collect()
    }
}

#[tokio::test]
async fn test_home_route_is_activated_but_never_stored() {
    let mut h = harness().await;

    assert_eq!(h.session.active_tab_id(), "/home");
    assert!(h.session.store().is_empty());

    h.open("/a").await;
    h.open("/home").await;
    assert_eq!(h.session.active_tab_id(), "/home");
    assert_eq!(h.ids(), vec!["/a"]);

    let view = h.session.snapshot();
    assert_eq!(view.tabs[0].id, "/home");
    assert_eq!(view.tabs[0].module, "admin");
    assert_eq!(view.tabs.len(), 2);
}

#[tokio::test]
async fn test_add_tab_keeps_insertion_order_without_duplicates() {
    let mut h = harness().await;

    for path in ["/a", "/b", "/c", "/b", "/a"] {
        h.open(path).await;
    }

    assert_eq!(h.ids(), vec!["/a", "/b", "/c"]);
    assert_eq!(h.session.active_tab_id(), "/a");
}

#[tokio::test]
async fn test_add_tab_without_activation() {
    let mut h = harness().await;

    let route = h.router.resolve("/b").unwrap();
    h.session.add_tab(&route, false);
    h.session.add_tab(&route, false);

    assert_eq!(h.ids(), vec!["/b"]);
    assert_eq!(h.session.active_tab_id(), "/home");
}

#[tokio::test]
async fn test_remove_active_tab_with_right_neighbour_activates_it() {
    let mut h = harness().await;
    h.open("/a").await;
    h.open("/b").await;
    h.open("/c").await;
    h.open("/b").await;

    h.session.remove_tab("/b").await;

    assert_eq!(h.session.active_tab_id(), "/c");
    assert_eq!(h.ids(), vec!["/a", "/c"]);
}

#[tokio::test]
async fn test_remove_last_active_tab_activates_left_neighbour() {
    // [A(fixed,0), B, C] with C active
    let mut h = harness().await;
    h.open("/a").await;
    assert!(h.session.fix_tab("/a"));
    h.open("/b").await;
    h.open("/c").await;

    h.session.remove_tab("/c").await;

    assert_eq!(h.session.active_tab_id(), "/b");
    assert_eq!(h.ids(), vec!["/a", "/b"]);
    assert_eq!(h.fixed_indices(), vec![Some(0), None]);
    assert_eq!(h.cache.invalidated(), vec!["c".to_string()]);
}

#[tokio::test]
async fn test_remove_sole_tab_activates_home() {
    let mut h = harness().await;
    h.open("/a").await;

    h.session.remove_active_tab().await;

    assert_eq!(h.session.active_tab_id(), "/home");
    assert!(h.ids().is_empty());
    assert_eq!(h.router.current_route().unwrap().path, "/home");
}

#[tokio::test]
async fn test_remove_inactive_tab_does_not_navigate() {
    let mut h = harness().await;
    h.open("/a").await;
    h.open("/b").await;
    let history_before = h.router.history().len();

    h.session.remove_tab("/a").await;

    assert_eq!(h.session.active_tab_id(), "/b");
    assert_eq!(h.router.history().len(), history_before);
    assert_eq!(h.cache.invalidated(), vec!["a".to_string()]);
}

#[tokio::test]
async fn test_failed_navigation_keeps_active_id_but_still_removes() {
    let mut h = harness().await;
    h.open("/b").await;
    h.open("/c").await;
    h.router.guard("/b");

    h.session.remove_tab("/c").await;

    // The active pointer is gated on navigation, the removal is not
    assert_eq!(h.session.active_tab_id(), "/c");
    assert_eq!(h.ids(), vec!["/b"]);
    assert_eq!(h.cache.invalidated(), vec!["c".to_string()]);
    assert_eq!(h.router.current_route().unwrap().path, "/c");
}

#[tokio::test]
async fn test_remove_missing_tab_is_noop() {
    let mut h = harness().await;
    h.open("/a").await;

    h.session.remove_tab("/nope").await;
    h.session.remove_tab_by_route_name("zzz").await;

    assert_eq!(h.ids(), vec!["/a"]);
    assert!(h.cache.invalidated().is_empty());
}

#[tokio::test]
async fn test_remove_tab_by_route_name() {
    let mut h = harness().await;
    h.open("/a").await;
    h.open("/b").await;

    h.session.remove_tab_by_route_name("a").await;

    assert_eq!(h.ids(), vec!["/b"]);
}

#[tokio::test]
async fn test_clear_tabs_never_removes_fixed_tabs() {
    let mut h = harness().await;
    for path in ["/a", "/b", "/c", "/d"] {
        h.open(path).await;
    }
    h.session.fix_tab("/c");

    h.session.clear_tabs(&[]).await;

    assert_eq!(h.ids(), vec!["/c"]);
    // D was active; C is the last survivor
    assert_eq!(h.session.active_tab_id(), "/c");
    assert_eq!(
        h.cache.invalidated(),
        vec!["a".to_string(), "b".to_string(), "d".to_string()]
    );
}

#[tokio::test]
async fn test_clear_tabs_falls_back_to_home_when_nothing_survives() {
    let mut h = harness().await;
    h.open("/a").await;
    h.open("/b").await;

    h.session.clear_tabs(&[]).await;

    assert!(h.ids().is_empty());
    assert_eq!(h.session.active_tab_id(), "/home");
}

#[tokio::test]
async fn test_clear_tabs_with_nothing_to_remove_is_noop() {
    let mut h = harness().await;
    h.open("/a").await;
    h.session.fix_tab("/a");
    let history_before = h.router.history();

    h.session.clear_tabs(&[]).await;

    assert_eq!(h.ids(), vec!["/a"]);
    assert_eq!(h.router.history(), history_before);
    assert!(h.cache.invalidated().is_empty());
}

#[tokio::test]
async fn test_clear_tabs_commits_even_when_navigation_fails() {
    let mut h = harness().await;
    h.open("/a").await;
    h.open("/b").await;
    h.router.guard("/a");

    h.session.clear_tabs(&["/a".to_string()]).await;

    assert_eq!(h.ids(), vec!["/a"]);
    assert_eq!(h.session.active_tab_id(), "/b");
    assert_eq!(h.cache.invalidated(), vec!["b".to_string()]);
}

#[tokio::test]
async fn test_clear_right_tabs_switches_to_last_survivor() {
    // [A(fixed,0), B, C, D] with D active
    let mut h = harness().await;
    for path in ["/a", "/b", "/c", "/d"] {
        h.open(path).await;
    }
    h.session.fix_tab("/a");

    h.session.clear_right_tabs("/b").await;

    assert_eq!(h.ids(), vec!["/a", "/b"]);
    assert_eq!(h.fixed_indices(), vec![Some(0), None]);
    assert_eq!(h.session.active_tab_id(), "/b");
    assert_eq!(h.router.history().last().map(String::as_str), Some("/b"));
    assert_eq!(h.cache.invalidated(), vec!["c".to_string(), "d".to_string()]);
}

#[tokio::test]
async fn test_clear_right_tabs_on_home_clears_all_unfixed() {
    let mut h = harness().await;
    for path in ["/a", "/b", "/c"] {
        h.open(path).await;
    }
    h.session.fix_tab("/b");
    h.open("/home").await;

    h.session.clear_right_tabs("/home").await;

    assert_eq!(h.ids(), vec!["/b"]);
    assert_eq!(h.session.active_tab_id(), "/home");
}

#[tokio::test]
async fn test_clear_left_tabs_keeps_target_and_right_side() {
    let mut h = harness().await;
    for path in ["/a", "/b", "/c", "/d"] {
        h.open(path).await;
    }
    h.session.fix_tab("/a");
    let history_before = h.router.history();

    h.session.clear_left_tabs("/c").await;

    assert_eq!(h.ids(), vec!["/a", "/c", "/d"]);
    assert_eq!(h.session.active_tab_id(), "/d");
    assert_eq!(h.router.history(), history_before);
}

#[tokio::test]
async fn test_clear_left_and_right_on_unknown_tab_do_nothing() {
    let mut h = harness().await;
    h.open("/a").await;
    h.open("/b").await;

    h.session.clear_left_tabs("/zzz").await;
    h.session.clear_right_tabs("/zzz").await;

    assert_eq!(h.ids(), vec!["/a", "/b"]);
}

#[tokio::test]
async fn test_replace_tab_navigates_then_removes_old_tab() {
    let mut h = harness().await;
    h.open("/a").await;
    h.open("/b").await;

    assert!(h.session.replace_tab("c", &PushOptions::default()).await);

    assert_eq!(h.ids(), vec!["/a", "/c"]);
    assert_eq!(h.session.active_tab_id(), "/c");
    assert_eq!(h.cache.invalidated(), vec!["b".to_string()]);
}

#[tokio::test]
async fn test_replace_tab_keeps_retained_tabs() {
    let mut h = harness().await;
    h.open("/a").await;
    h.session.fix_tab("/a");

    assert!(h.session.replace_tab("b", &PushOptions::default()).await);
    assert_eq!(h.ids(), vec!["/a", "/b"]);

    h.open("/home").await;
    assert!(h.session.replace_tab("c", &PushOptions::default()).await);
    assert_eq!(h.ids(), vec!["/a", "/b", "/c"]);
    assert_eq!(h.session.active_tab_id(), "/c");
}

#[tokio::test]
async fn test_replace_tab_with_failed_navigation_changes_nothing() {
    let mut h = harness().await;
    h.open("/a").await;
    h.router.guard("/b");

    assert!(!h.session.replace_tab("b", &PushOptions::default()).await);
    assert!(!h.session.replace_tab("missing", &PushOptions::default()).await);

    assert_eq!(h.ids(), vec!["/a"]);
    assert_eq!(h.session.active_tab_id(), "/a");
    assert!(h.cache.invalidated().is_empty());
}

#[tokio::test]
async fn test_switch_route_by_tab_only_activates_on_success() {
    let mut h = harness().await;
    h.open("/a").await;
    h.open("/b").await;
    let a = h.session.store().find("admin", "/a").unwrap().clone();

    h.router.guard("/a");
    assert!(!h.session.switch_route_by_tab(&a).await);
    assert_eq!(h.session.active_tab_id(), "/b");

    h.router.unguard("/a");
    assert!(h.session.switch_route_by_tab(&a).await);
    assert_eq!(h.session.active_tab_id(), "/a");
}

#[tokio::test]
async fn test_fix_and_unfix_keep_fixed_prefix_dense() {
    let mut h = harness().await;
    for path in ["/a", "/b", "/c", "/d"] {
        h.open(path).await;
    }

    let steps: [(&str, bool); 7] = [
        ("/c", true),
        ("/a", true),
        ("/d", true),
        ("/a", false),
        ("/b", true),
        ("/c", false),
        ("/d", false),
    ];
    for (id, fix) in steps {
        if fix {
            h.session.fix_tab(id);
        } else {
            h.session.unfix_tab(id);
        }

        let tabs = h.session.current_module_tabs();
        let k = tabs.iter().filter(|tab| tab.is_fixed()).count();
        for (i, tab) in tabs.iter().enumerate() {
            if i < k {
                assert_eq!(tab.fixed_index, Some(i), "fixed prefix broken after {id}");
            } else {
                assert_eq!(tab.fixed_index, None, "unfixed tab inside prefix after {id}");
            }
        }
    }

    assert_eq!(h.ids(), vec!["/b", "/d", "/c", "/a"]);
}

#[tokio::test]
async fn test_is_tab_retained() {
    let mut h = harness().await;
    h.open("/a").await;
    h.open("/b").await;

    assert!(h.session.is_tab_retained("/home"));
    assert!(!h.session.is_tab_retained("/a"));

    h.session.fix_tab("/a");
    assert!(h.session.is_tab_retained("/a"));

    h.session.unfix_tab("/a");
    assert!(!h.session.is_tab_retained("/a"));
}

#[tokio::test]
async fn test_tab_labels_can_be_overridden_and_reset() {
    let mut h = harness().await;
    h.open("/a").await;
    h.open("/b").await;

    h.session.set_tab_label("Renamed", None);
    h.session.set_tab_label("Other", Some("/a"));
    h.session.set_tab_label("Ghost", Some("/missing"));

    let b = h.session.store().find("admin", "/b").unwrap();
    assert_eq!(b.display_label(), "Renamed");
    assert_eq!(b.old_label.as_deref(), Some("B"));
    assert_eq!(
        h.session.store().find("admin", "/a").unwrap().display_label(),
        "Other"
    );

    h.session.reset_tab_label(None);
    let b = h.session.store().find("admin", "/b").unwrap();
    assert_eq!(b.display_label(), "B");
    assert_eq!(b.new_label, None);
    assert_eq!(b.old_label.as_deref(), Some("B"));
}

#[tokio::test]
async fn test_update_tabs_by_locale_relabels_without_reordering() {
    let catalog = catalog();
    let router = Arc::new(MemoryRouter::new(routes(), "admin"));
    let mut session = TabSession::new(
        TabConfig::default(),
        router.clone(),
        Arc::new(MemoryRouteCache::new()),
        Arc::new(MemoryStorage::new()),
    )
    .with_locale(catalog.clone());
    router.navigate("/home").await.unwrap();
    session.init_session(&router.current_route().unwrap());
    for path in ["/b", "/a"] {
        router.navigate(path).await.unwrap();
        session.sync_with_router();
    }
    session.set_tab_label("Mine", Some("/b"));
    assert_eq!(session.home_tab().unwrap().label, "Home");

    catalog.set_locale("zh");
    session.update_tabs_by_locale();

    assert_eq!(session.home_tab().unwrap().label, "首页");
    let labels: Vec<String> = session
        .current_module_tabs()
        .iter()
        .map(|tab| tab.display_label().to_string())
        .collect();
    assert_eq!(labels, vec!["Mine".to_string(), "甲".to_string()]);
}

#[tokio::test]
async fn test_reserved_query_characters_keep_views_distinct() {
    let mut h = harness().await;
    let query = |pairs: &[(&str, &str)]| PushOptions {
        query: pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        ..PushOptions::default()
    };

    let packed = query(&[("q", "a&b=c")]);
    h.router.navigate_by_key("disk_list", &packed).await.unwrap();
    h.session.sync_with_router();
    assert_eq!(h.router.current_route().unwrap().query, packed.query);

    let split = query(&[("q", "a"), ("b", "c")]);
    h.router.navigate_by_key("disk_list", &split).await.unwrap();
    h.session.sync_with_router();

    assert_eq!(
        h.ids(),
        vec!["/disk/list?q=a%26b%3Dc", "/disk/list?b=c&q=a"]
    );

    // Switching back restores the original query, not a reinterpretation of it
    let first = h.session.current_module_tabs()[0].clone();
    assert!(h.session.switch_route_by_tab(&first).await);
    assert_eq!(h.router.current_route().unwrap().query, packed.query);
}

#[tokio::test]
async fn test_modules_keep_separate_collections() {
    let mut h = harness().await;
    h.open("/a").await;
    h.open("/disk/list?page=1").await;
    h.open("/disk/list?page=2").await;
    h.open("/disk/list?page=1").await;
    h.open("/disk/share").await;

    assert_eq!(h.session.current_module(), "disk");
    assert_eq!(
        h.ids(),
        vec!["/disk/list?page=1", "/disk/list?page=2", "/disk/share"]
    );

    // The home tab belongs to admin, so it is hidden here
    let view = h.session.snapshot();
    assert!(view.tabs.iter().all(|tab| tab.id != "/home"));
    assert!(!h.session.is_tab_retained("/a"));

    h.open("/a").await;
    assert_eq!(h.ids(), vec!["/a"]);
    assert_eq!(h.session.snapshot().tabs[0].id, "/home");
}

#[tokio::test]
async fn test_route_declared_pinned_opens_in_fixed_segment() {
    let mut routes = routes();
    routes.push(RouteRecord::new("settings", "/settings", "Settings").fixed_at(0));
    let router = Arc::new(MemoryRouter::new(routes, "admin"));
    let mut session = TabSession::new(
        TabConfig::default(),
        router.clone(),
        Arc::new(MemoryRouteCache::new()),
        Arc::new(MemoryStorage::new()),
    );
    for path in ["/home", "/a", "/settings"] {
        router.navigate(path).await.unwrap();
        if session.is_initialized() {
            session.sync_with_router();
        } else {
            session.init_session(&router.current_route().unwrap());
        }
    }

    let ids: Vec<&str> = session
        .current_module_tabs()
        .iter()
        .map(|tab| tab.id.as_str())
        .collect();
    assert_eq!(ids, vec!["/settings", "/a"]);
    assert!(session.is_tab_retained("/settings"));
}

#[tokio::test]
async fn test_init_session_twice_only_resolves_active_tab() {
    let mut h = harness().await;
    h.open("/a").await;

    let route = h.router.resolve("/b").unwrap();
    h.session.init_session(&route);
    assert_eq!(h.ids(), vec!["/a", "/b"]);
    assert_eq!(h.session.active_tab_id(), "/b");

    let home = h.router.resolve("/home").unwrap();
    h.session.init_session(&home);
    assert_eq!(h.session.active_tab_id(), "/home");
    assert_eq!(h.ids(), vec!["/a", "/b"]);
}

#[tokio::test]
async fn test_home_tab_falls_back_when_route_is_unknown() {
    let router = Arc::new(MemoryRouter::new(routes(), "admin"));
    let config = TabConfig {
        home_route: "dash_board".to_string(),
        ..TabConfig::default()
    };
    let mut session = TabSession::new(
        config,
        router.clone(),
        Arc::new(MemoryRouteCache::new()),
        Arc::new(MemoryStorage::new()),
    );
    router.navigate("/a").await.unwrap();
    session.init_session(&router.current_route().unwrap());

    let home = session.home_tab().unwrap();
    assert_eq!(home.id, "/dash/board");
    assert_eq!(home.label, "dash_board");
    assert_eq!(session.active_tab_id(), "/a");
}
