// ABOUTME: Application configuration loaded from TOML: tab session settings, route table and locales

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::locale::MessageCatalog;
use crate::models::RouteRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabConfig {
    /// Route key of the home view
    pub home_route: String,
    /// Module for routes that do not declare one
    pub default_module: String,
    /// Persist open tabs across restarts
    pub cache: bool,
    pub storage_key: String,
}

impl Default for TabConfig {
    fn default() -> Self {
        Self {
            home_route: "home".to_string(),
            default_module: "admin".to_string(),
            cache: true,
            storage_key: "globalTabs".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tab: TabConfig,
    pub locale: String,
    pub routes: Vec<RouteRecord>,
    pub locales: HashMap<String, HashMap<String, String>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tab: TabConfig::default(),
            locale: "en".to_string(),
            routes: default_routes(),
            locales: default_locales(),
        }
    }
}

impl AppConfig {
    /// Load from `path`, or from the platform config file if present,
    /// otherwise fall back to built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path().filter(|p| p.exists()),
        };

        let Some(path) = path else {
            info!("No config file found, using built-in defaults");
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        info!("Loaded config from {} with {} routes", path.display(), config.routes.len());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content)?;
        if config.routes.is_empty() {
            config.routes = default_routes();
        }
        Ok(config)
    }

    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "tab-console").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn message_catalog(&self) -> MessageCatalog {
        MessageCatalog::new(self.locales.clone(), self.locale.clone())
    }
}

fn default_routes() -> Vec<RouteRecord> {
    vec![
        RouteRecord::new("home", "/home", "Home").with_i18n_key("route.home"),
        RouteRecord::new("disk_list", "/disk/list", "Files")
            .with_i18n_key("route.disk_list")
            .with_module("disk")
            .multi_tab(),
        RouteRecord::new("disk_share", "/disk/share", "Shared")
            .with_i18n_key("route.disk_share")
            .with_module("disk"),
        RouteRecord::new("disk_recycle", "/disk/recycle", "Recycle Bin")
            .with_i18n_key("route.disk_recycle")
            .with_module("disk"),
        RouteRecord::new("system_setting", "/system/setting", "Settings")
            .with_i18n_key("route.system_setting")
            .fixed_at(0),
        RouteRecord::new("system_menu", "/system/menu", "Menus").with_i18n_key("route.system_menu"),
        RouteRecord::new("system_role", "/system/role", "Roles").with_i18n_key("route.system_role"),
        RouteRecord::new("system_dept", "/system/dept", "Departments").with_i18n_key("route.system_dept"),
        RouteRecord::new("system_dict", "/system/dict", "Dictionaries").with_i18n_key("route.system_dict"),
        RouteRecord::new("system_post", "/system/post", "Posts").with_i18n_key("route.system_post"),
        RouteRecord::new("system_notice", "/system/notice", "Notices")
            .with_i18n_key("route.system_notice"),
    ]
}

fn default_locales() -> HashMap<String, HashMap<String, String>> {
    let table = [
        ("route.home", "Home", "首页"),
        ("route.disk_list", "Files", "文件"),
        ("route.disk_share", "Shared", "共享"),
        ("route.disk_recycle", "Recycle Bin", "回收站"),
        ("route.system_setting", "Settings", "系统设置"),
        ("route.system_menu", "Menus", "菜单管理"),
        ("route.system_role", "Roles", "角色管理"),
        ("route.system_dept", "Departments", "部门管理"),
        ("route.system_dict", "Dictionaries", "字典管理"),
        ("route.system_post", "Posts", "岗位管理"),
        ("route.system_notice", "Notices", "通知公告"),
    ];

    let mut en = HashMap::new();
    let mut zh = HashMap::new();
    for (key, english, chinese) in table {
        en.insert(key.to_string(), english.to_string());
        zh.insert(key.to_string(), chinese.to_string());
    }

    let mut locales = HashMap::new();
    locales.insert("en".to_string(), en);
    locales.insert("zh".to_string(), zh);
    locales
}
