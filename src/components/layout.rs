// ABOUTME: Main layout component arranging tab bar, route picker, active view pane and menu bar

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::{HelpComponent, RouteListComponent, TabBarComponent};
use crate::app::AppState;

pub struct LayoutComponent {
    tab_bar: TabBarComponent,
    route_list: RouteListComponent,
    help: HelpComponent,
}

impl LayoutComponent {
    pub fn new() -> Self {
        Self {
            tab_bar: TabBarComponent::new(),
            route_list: RouteListComponent::new(),
            help: HelpComponent::new(),
        }
    }

    pub fn render(&mut self, frame: &mut Frame, state: &AppState) {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Tab bar
                Constraint::Length(1), // Notification line
                Constraint::Min(0),    // Main content
                Constraint::Length(3), // Bottom menu bar
            ])
            .split(frame.size());

        self.tab_bar.render(frame, main_chunks[0], state);
        self.render_notification(frame, main_chunks[1], state);

        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(main_chunks[2]);

        self.route_list.render(frame, content_chunks[0], state);
        self.render_active_view(frame, content_chunks[1], state);
        self.render_menu_bar(frame, main_chunks[3]);

        if state.help_visible {
            self.help.render(frame, frame.size());
        }
    }

    fn render_notification(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let Some(notification) = &state.notification else {
            return;
        };
        let line = Paragraph::new(notification.message.as_str())
            .style(Style::default().fg(notification.kind.color()));
        frame.render_widget(line, area);
    }

    fn render_active_view(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let mut lines: Vec<Line> = Vec::new();

        match state.active_tab() {
            Some(tab) => {
                let bold = Style::default().add_modifier(Modifier::BOLD);
                lines.push(Line::styled(tab.display_label().to_string(), bold));
                lines.push(Line::raw(""));
                lines.push(Line::raw(format!("id:        {}", tab.id)));
                lines.push(Line::raw(format!("route:     {}", tab.route_key)));
                lines.push(Line::raw(format!("path:      {}", tab.full_path)));
                lines.push(Line::raw(format!("module:    {}", tab.module)));
                let pinned = tab
                    .fixed_index
                    .map_or_else(|| "no".to_string(), |i| format!("yes (#{i})"));
                lines.push(Line::raw(format!("pinned:    {pinned}")));
                let cached = if state.cache.is_cached(&tab.route_key) { "yes" } else { "no" };
                lines.push(Line::raw(format!("cached:    {cached}")));
                if state.session.is_tab_retained(&tab.id) {
                    lines.push(Line::styled("retained on bulk close", Style::default().fg(Color::Green)));
                }
            }
            None => lines.push(Line::raw("No active tab")),
        }

        if let Some(input) = &state.rename_input {
            lines.push(Line::raw(""));
            lines.push(Line::styled(
                format!("Rename: {input}_"),
                Style::default().fg(Color::Yellow),
            ));
        }

        let pane = Paragraph::new(lines)
            .block(
                Block::default()
                    .title("Active View")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Gray)),
            )
            .wrap(Wrap { trim: false });
        frame.render_widget(pane, area);
    }

    fn render_menu_bar(&self, frame: &mut Frame, area: Rect) {
        let menu_text = "[⏎]open [r]eplace [h/l]switch [x]close [o]thers [X]all [p]in re[n]ame [t]locale [?]help [q]uit";

        let menu = Paragraph::new(menu_text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center);

        frame.render_widget(menu, area);
    }
}

impl Default for LayoutComponent {
    fn default() -> Self {
        Self::new()
    }
}
