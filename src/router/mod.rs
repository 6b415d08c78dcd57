// ABOUTME: Router and route-cache collaborator seams used by the tab session
// The tab session reacts to routes and requests navigation but never owns routing

pub mod error;
pub mod memory;

use async_trait::async_trait;

use crate::models::{join_query, ModuleKey, PushOptions, RouteRecord, TabRoute};

pub use error::NavigationError;
pub use memory::{MemoryRouteCache, MemoryRouter};

/// The navigation layer.
#[async_trait]
pub trait Router: Send + Sync {
    /// Module of the route currently shown.
    fn current_module(&self) -> ModuleKey;

    fn current_route(&self) -> Option<TabRoute>;

    /// Every route definition the router knows.
    fn routes(&self) -> Vec<RouteRecord>;

    /// Navigate to a full path. The only asynchronous boundary of the tab
    /// session; an `Err` means the navigation did not happen.
    async fn navigate(&self, full_path: &str) -> Result<(), NavigationError>;

    fn route(&self, key: &str) -> Option<RouteRecord> {
        self.routes().into_iter().find(|route| route.key == key)
    }

    /// Resolve `key` to a concrete path, substituting `:param` segments and
    /// appending the query, then navigate there.
    async fn navigate_by_key(&self, key: &str, options: &PushOptions) -> Result<(), NavigationError> {
        let full_path = resolve_full_path(self.route(key), key, options)?;
        self.navigate(&full_path).await
    }
}

/// Concrete full path for a route definition.
pub fn resolve_full_path(
    record: Option<RouteRecord>,
    key: &str,
    options: &PushOptions,
) -> Result<String, NavigationError> {
    let record = record.ok_or_else(|| NavigationError::UnknownRoute(key.to_string()))?;

    let mut segments = Vec::new();
    for segment in record.path.split('/') {
        match segment.strip_prefix(':') {
            Some(param) => {
                let value = options.params.get(param).ok_or_else(|| NavigationError::MissingParam {
                    key: key.to_string(),
                    param: param.to_string(),
                })?;
                segments.push(value.as_str());
            }
            None => segments.push(segment),
        }
    }

    Ok(join_query(&segments.join("/"), &options.query))
}

/// The route-level output cache. Invalidation is best effort: implementations
/// swallow their own failures.
#[cfg_attr(test, mockall::automock)]
pub trait RouteCache: Send + Sync {
    fn invalidate(&self, route_key: &str);
}
