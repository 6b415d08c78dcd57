// ABOUTME: Core data models for the tab console: open-view tabs and route definitions

pub mod route;
pub mod tab;

pub use route::{
    join_query, path_matches, split_full_path, ModuleKey, PushOptions, RouteKey, RouteMeta,
    RouteRecord, TabRoute,
};
pub use tab::{Tab, TabsView};
