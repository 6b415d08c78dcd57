// ABOUTME: Console application structure: state, key events and notifications

pub mod events;
pub mod notification;
pub mod state;

pub use events::{AppEvent, EventHandler};
pub use notification::{Notification, NotificationKind};
pub use state::{App, AppState, AsyncAction};
