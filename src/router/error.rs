// ABOUTME: Error types for navigation requests made through the router collaborator

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("Navigation to {0} blocked by a route guard")]
    Guarded(String),

    #[error("No route matches path: {0}")]
    NoMatch(String),

    #[error("Unknown route key: {0}")]
    UnknownRoute(String),

    #[error("Route {key} needs parameter {param}")]
    MissingParam { key: String, param: String },
}
