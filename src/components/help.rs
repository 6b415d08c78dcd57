// ABOUTME: Help overlay component listing the tab console key bindings

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem},
};

pub struct HelpComponent;

impl HelpComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup_area = self.centered_rect(60, 80, area);

        frame.render_widget(Clear, popup_area);

        let section = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
        let help_items = vec![
            ListItem::new("Routes:").style(section),
            ListItem::new("  j/↓ k/↑    Select route"),
            ListItem::new("  Enter      Open route in a tab"),
            ListItem::new("  r          Replace active tab with route"),
            ListItem::new("  g          Toggle navigation guard on route"),
            ListItem::new(""),
            ListItem::new("Tabs:").style(section),
            ListItem::new("  h/← l/→    Previous/next tab"),
            ListItem::new("  x          Close active tab"),
            ListItem::new("  o          Close other tabs"),
            ListItem::new("  [ ]        Close tabs left/right"),
            ListItem::new("  X          Close all unpinned tabs"),
            ListItem::new("  p          Pin/unpin active tab"),
            ListItem::new("  n          Rename active tab"),
            ListItem::new("  u          Reset tab label"),
            ListItem::new(""),
            ListItem::new("General:").style(section),
            ListItem::new("  t          Switch locale"),
            ListItem::new("  ?          Toggle this help"),
            ListItem::new("  q/Esc      Quit (saves open tabs)"),
            ListItem::new("  Ctrl+C     Force quit"),
        ];

        let help_list = List::new(help_items).block(
            Block::default()
                .title("Help - Press ? or Esc to close")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );

        frame.render_widget(help_list, popup_area);
    }

    fn centered_rect(&self, percent_x: u16, percent_y: u16, r: Rect) -> Rect {
        let popup_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ])
            .split(r);

        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ])
            .split(popup_layout[1])[1]
    }
}

impl Default for HelpComponent {
    fn default() -> Self {
        Self::new()
    }
}
