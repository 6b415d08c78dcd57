// ABOUTME: Route picker listing every openable view, grouped by module

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState},
};

use crate::app::AppState;
use crate::tabs::policy;

pub struct RouteListComponent {
    list_state: ListState,
}

impl Default for RouteListComponent {
    fn default() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self { list_state }
    }
}

impl RouteListComponent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        self.list_state.select(Some(state.selected_route_index));

        let default_module = &state.session.config().default_module;
        let items: Vec<ListItem> = state
            .routes
            .iter()
            .map(|route| {
                let module = route.meta.module.as_deref().unwrap_or(default_module);
                let label = policy::resolve_label(&route.key, &route.meta, state.catalog.as_ref());
                let guarded = if state.router.is_guarded(&route.path) { " ⛔" } else { "" };
                let open = state
                    .session
                    .store()
                    .find_by_route_key(module, &route.key)
                    .is_some();
                let style = if open {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default().fg(Color::White)
                };
                ListItem::new(format!("[{module}] {label}{guarded}")).style(style)
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title(format!("Routes ({} modules)", state.router.module_keys().len()))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
            .highlight_symbol("▶ ");

        frame.render_stateful_widget(list, area, &mut self.list_state);
    }
}
