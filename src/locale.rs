// ABOUTME: Label localization for tabs: the resolver seam and a switchable message catalog

use std::collections::HashMap;
use std::sync::RwLock;

/// Resolves symbolic label keys (e.g. `route.home`) to display text.
pub trait LocaleResolver: Send + Sync {
    fn translate(&self, key: &str) -> Option<String>;
}

/// Resolver that knows no keys; labels fall back to route titles.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopResolver;

impl LocaleResolver for NoopResolver {
    fn translate(&self, _key: &str) -> Option<String> {
        None
    }
}

/// Message catalogs keyed by locale, with one active locale.
#[derive(Debug)]
pub struct MessageCatalog {
    catalogs: HashMap<String, HashMap<String, String>>,
    active: RwLock<String>,
}

impl MessageCatalog {
    pub fn new(catalogs: HashMap<String, HashMap<String, String>>, active: impl Into<String>) -> Self {
        Self {
            catalogs,
            active: RwLock::new(active.into()),
        }
    }

    pub fn locale(&self) -> String {
        self.active.read().map(|l| l.clone()).unwrap_or_default()
    }

    /// Locales available, sorted.
    pub fn locales(&self) -> Vec<String> {
        let mut locales: Vec<String> = self.catalogs.keys().cloned().collect();
        locales.sort();
        locales
    }

    /// Switch the active locale. Returns false for an unknown locale.
    pub fn set_locale(&self, locale: &str) -> bool {
        if !self.catalogs.contains_key(locale) {
            return false;
        }
        if let Ok(mut active) = self.active.write() {
            *active = locale.to_string();
        }
        true
    }

    /// Advance to the next locale in sorted order, wrapping around.
    pub fn cycle_locale(&self) -> String {
        let locales = self.locales();
        let current = self.locale();
        let next = locales
            .iter()
            .position(|l| *l == current)
            .map_or(0, |i| (i + 1) % locales.len().max(1));
        if let Some(locale) = locales.get(next) {
            self.set_locale(locale);
        }
        self.locale()
    }
}

impl LocaleResolver for MessageCatalog {
    fn translate(&self, key: &str) -> Option<String> {
        let active = self.active.read().ok()?;
        self.catalogs.get(active.as_str())?.get(key).cloned()
    }
}
