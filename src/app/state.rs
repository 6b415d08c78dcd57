// ABOUTME: Application state for the console: the tab session, route picker and pending actions

use std::sync::Arc;
use tracing::{info, warn};

use crate::app::notification::Notification;
use crate::config::AppConfig;
use crate::locale::MessageCatalog;
use crate::models::{PushOptions, RouteRecord, Tab};
use crate::router::{MemoryRouteCache, MemoryRouter, Router};
use crate::storage::TabStorage;
use crate::tabs::TabSession;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsyncAction {
    OpenSelectedRoute,
    ReplaceWithSelectedRoute,
    NextTab,
    PreviousTab,
    CloseActiveTab,
    CloseOtherTabs,
    CloseLeftTabs,
    CloseRightTabs,
    CloseAllTabs,
}

pub struct AppState {
    pub session: TabSession,
    pub router: Arc<MemoryRouter>,
    pub cache: Arc<MemoryRouteCache>,
    pub catalog: Arc<MessageCatalog>,
    /// Routes that can be opened from the picker (no path parameters)
    pub routes: Vec<RouteRecord>,
    pub selected_route_index: usize,
    pub help_visible: bool,
    pub should_quit: bool,
    /// Label being typed for the active tab, if renaming
    pub rename_input: Option<String>,
    pub pending_async_action: Option<AsyncAction>,
    pub notification: Option<Notification>,
    pub ui_needs_refresh: bool,
}

impl AppState {
    pub fn new(config: &AppConfig, storage: Arc<dyn TabStorage>) -> Self {
        let router = Arc::new(MemoryRouter::new(
            config.routes.clone(),
            config.tab.default_module.clone(),
        ));
        let cache = Arc::new(MemoryRouteCache::new());
        let catalog = Arc::new(config.message_catalog());

        let session = TabSession::new(config.tab.clone(), router.clone(), cache.clone(), storage)
            .with_locale(catalog.clone());

        let routes = config
            .routes
            .iter()
            .filter(|route| !route.has_params())
            .cloned()
            .collect();

        Self {
            session,
            router,
            cache,
            catalog,
            routes,
            selected_route_index: 0,
            help_visible: false,
            should_quit: false,
            rename_input: None,
            pending_async_action: None,
            notification: None,
            ui_needs_refresh: false,
        }
    }

    /// Land on the home route and start the tab session there.
    pub async fn start(&mut self) {
        let home = self.session.config().home_route.clone();
        if let Err(e) = self.router.navigate_by_key(&home, &PushOptions::default()).await {
            warn!("Failed to open home route {}: {}", home, e);
            if let Some(first) = self.routes.first() {
                if let Err(e) = self.router.navigate(&first.path).await {
                    warn!("Failed to open fallback route {}: {}", first.key, e);
                }
            }
        }

        match self.router.current_route() {
            Some(route) => self.session.init_session(&route),
            None => warn!("No route could be opened, tab session not started"),
        }
        info!("Console started in module {}", self.session.current_module());
    }

    pub fn selected_route(&self) -> Option<&RouteRecord> {
        self.routes.get(self.selected_route_index)
    }

    pub fn next_route(&mut self) {
        if !self.routes.is_empty() {
            self.selected_route_index = (self.selected_route_index + 1) % self.routes.len();
        }
    }

    pub fn previous_route(&mut self) {
        if !self.routes.is_empty() {
            self.selected_route_index = if self.selected_route_index == 0 {
                self.routes.len() - 1
            } else {
                self.selected_route_index - 1
            };
        }
    }

    pub fn toggle_help(&mut self) {
        self.help_visible = !self.help_visible;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notification = Some(notification);
        self.ui_needs_refresh = true;
    }

    /// Expire the notification once its time is up.
    pub fn clear_expired_notification(&mut self) {
        if self.notification.as_ref().is_some_and(Notification::is_expired) {
            self.notification = None;
        }
    }

    pub fn active_tab(&self) -> Option<Tab> {
        self.session.snapshot().active_tab().cloned()
    }

    pub fn toggle_pin_active_tab(&mut self) {
        let id = self.session.active_tab_id().to_string();
        if self.session.home_tab().is_some_and(|home| home.id == id) {
            self.notify(Notification::info("The home tab is always kept".to_string()));
            return;
        }
        if !self.session.fix_tab(&id) {
            self.session.unfix_tab(&id);
        }
        self.ui_needs_refresh = true;
    }

    pub fn start_rename(&mut self) {
        let current = self.active_tab().map(|tab| tab.display_label().to_string());
        self.rename_input = Some(current.unwrap_or_default());
    }

    pub fn confirm_rename(&mut self) {
        if let Some(label) = self.rename_input.take() {
            if label.trim().is_empty() {
                self.session.reset_tab_label(None);
            } else {
                self.session.set_tab_label(label.trim(), None);
            }
            self.ui_needs_refresh = true;
        }
    }

    pub fn reset_label(&mut self) {
        self.session.reset_tab_label(None);
        self.ui_needs_refresh = true;
    }

    pub fn cycle_locale(&mut self) {
        let locale = self.catalog.cycle_locale();
        self.session.update_tabs_by_locale();
        self.notify(Notification::info(format!("Locale: {locale}")));
    }

    /// Block or unblock navigation to the selected route.
    pub fn toggle_guard_selected(&mut self) {
        let Some(path) = self.selected_route().map(|route| route.path.clone()) else {
            return;
        };
        if self.router.is_guarded(&path) {
            self.router.unguard(&path);
            self.notify(Notification::info(format!("Guard removed from {path}")));
        } else {
            self.router.guard(&path);
            self.notify(Notification::warning(format!("Navigation to {path} is now blocked")));
        }
    }

    async fn open_selected_route(&mut self) {
        let Some(key) = self.selected_route().map(|route| route.key.clone()) else {
            return;
        };
        match self.router.navigate_by_key(&key, &PushOptions::default()).await {
            Ok(()) => {
                self.session.sync_with_router();
                if let Some(route) = self.router.current_route() {
                    self.cache.keep_alive(&route.name);
                }
            }
            Err(e) => self.notify(Notification::error(format!("Cannot open {key}: {e}"))),
        }
    }

    async fn replace_with_selected_route(&mut self) {
        let Some(key) = self.selected_route().map(|route| route.key.clone()) else {
            return;
        };
        if self.session.replace_tab(&key, &PushOptions::default()).await {
            if let Some(route) = self.router.current_route() {
                self.cache.keep_alive(&route.name);
            }
        } else {
            self.notify(Notification::error(format!("Cannot replace tab with {key}")));
        }
    }

    /// Switch to the visible tab next to the active one, wrapping around.
    async fn step_tab(&mut self, forward: bool) {
        let view = self.session.snapshot();
        if view.tabs.is_empty() {
            return;
        }
        let len = view.tabs.len();
        let current = view.active_index().unwrap_or(0);
        let target = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        let tab = view.tabs[target].clone();
        if !self.session.switch_route_by_tab(&tab).await {
            self.notify(Notification::error(format!(
                "Navigation to {} was blocked",
                tab.display_label()
            )));
        }
    }

    async fn close_with(&mut self, action: &AsyncAction) {
        let active = self.session.active_tab_id().to_string();
        match action {
            AsyncAction::CloseActiveTab => {
                if self.session.home_tab().is_some_and(|home| home.id == active) {
                    self.notify(Notification::info("The home tab cannot be closed".to_string()));
                    return;
                }
                self.session.remove_active_tab().await;
                if self.session.active_tab_id() == active {
                    self.notify(Notification::warning(
                        "Tab closed but navigation away from it was blocked".to_string(),
                    ));
                }
            }
            AsyncAction::CloseOtherTabs => self.session.clear_tabs(&[active]).await,
            AsyncAction::CloseLeftTabs => self.session.clear_left_tabs(&active).await,
            AsyncAction::CloseRightTabs => self.session.clear_right_tabs(&active).await,
            AsyncAction::CloseAllTabs => self.session.clear_tabs(&[]).await,
            _ => {}
        }
    }

    pub async fn process_async_action(&mut self) -> anyhow::Result<()> {
        if let Some(action) = self.pending_async_action.take() {
            match action {
                AsyncAction::OpenSelectedRoute => self.open_selected_route().await,
                AsyncAction::ReplaceWithSelectedRoute => self.replace_with_selected_route().await,
                AsyncAction::NextTab => self.step_tab(true).await,
                AsyncAction::PreviousTab => self.step_tab(false).await,
                AsyncAction::CloseActiveTab
                | AsyncAction::CloseOtherTabs
                | AsyncAction::CloseLeftTabs
                | AsyncAction::CloseRightTabs
                | AsyncAction::CloseAllTabs => self.close_with(&action).await,
            }
            self.ui_needs_refresh = true;
        }
        Ok(())
    }
}

pub struct App {
    pub state: AppState,
}

impl App {
    pub fn new(config: &AppConfig, storage: Arc<dyn TabStorage>) -> Self {
        Self {
            state: AppState::new(config, storage),
        }
    }

    pub async fn init(&mut self) {
        self.state.start().await;
    }

    pub async fn tick(&mut self) -> anyhow::Result<()> {
        if let Err(e) = self.state.process_async_action().await {
            warn!("Error processing async action: {}", e);
            self.state.pending_async_action = None;
        }
        self.state.clear_expired_notification();
        Ok(())
    }

    pub fn needs_ui_refresh(&mut self) -> bool {
        std::mem::take(&mut self.state.ui_needs_refresh)
    }

    /// Session teardown: persist the open tabs.
    pub fn shutdown(&self) {
        self.state.session.cache_session();
    }
}
