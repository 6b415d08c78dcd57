// ABOUTME: UI components for the console: tab bar, route picker, active view pane and help

pub mod help;
pub mod layout;
pub mod route_list;
pub mod tab_bar;

pub use help::HelpComponent;
pub use layout::LayoutComponent;
pub use route_list::RouteListComponent;
pub use tab_bar::TabBarComponent;
