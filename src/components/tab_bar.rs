// ABOUTME: Tab bar component rendering the current module's visible tabs

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Tabs},
};

use crate::app::AppState;
use crate::models::Tab;

pub struct TabBarComponent;

impl TabBarComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let view = state.session.snapshot();
        let home_id = state.session.home_tab().map(|home| home.id.as_str());

        let titles: Vec<Line> = view
            .tabs
            .iter()
            .map(|tab| Self::title(tab, home_id == Some(tab.id.as_str())))
            .collect();

        let tabs = Tabs::new(titles)
            .block(
                Block::default()
                    .title(format!("Tabs - {}", state.session.current_module()))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .select(view.active_index().unwrap_or(usize::MAX))
            .style(Style::default().fg(Color::White))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .divider("|");

        frame.render_widget(tabs, area);
    }

    fn title(tab: &Tab, is_home: bool) -> Line<'static> {
        let marker = if is_home {
            "⌂ "
        } else if tab.is_fixed() {
            "📌"
        } else {
            ""
        };
        let mut spans = vec![Span::raw(format!("{marker}{}", tab.display_label()))];
        if tab.new_label.is_some() {
            spans.push(Span::styled("*", Style::default().fg(Color::Magenta)));
        }
        Line::from(spans)
    }
}

impl Default for TabBarComponent {
    fn default() -> Self {
        Self::new()
    }
}
