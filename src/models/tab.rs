// ABOUTME: Tab data model representing one open view inside a functional module

use serde::{Deserialize, Serialize};

use super::route::{ModuleKey, RouteKey};

/// One open view. Serialized with camelCase keys, which is the persisted
/// session schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub id: String,
    pub route_key: RouteKey,
    #[serde(default)]
    pub route_path: String,
    pub full_path: String,
    pub module: ModuleKey,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i18n_key: Option<String>,
    /// Present iff the tab is pinned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_index: Option<usize>,
}

impl Tab {
    /// Text shown in the tab bar: the user override if any.
    pub fn display_label(&self) -> &str {
        self.new_label.as_deref().unwrap_or(&self.label)
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed_index.is_some()
    }
}

/// What the UI reads: the visible tabs of the current module and the active id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabsView {
    pub tabs: Vec<Tab>,
    pub active_tab_id: String,
}

impl TabsView {
    pub fn active_tab(&self) -> Option<&Tab> {
        self.tabs.iter().find(|tab| tab.id == self.active_tab_id)
    }

    pub fn active_index(&self) -> Option<usize> {
        self.tabs.iter().position(|tab| tab.id == self.active_tab_id)
    }
}
