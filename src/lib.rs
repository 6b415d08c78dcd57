// ABOUTME: Library crate for the tab console exposing the tab session and its collaborators

pub mod app;
pub mod components;
pub mod config;
pub mod locale;
pub mod models;
pub mod router;
pub mod storage;
pub mod tabs;
