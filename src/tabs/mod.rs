// ABOUTME: Tab navigation session: ordering policy, per-module tab store and the session controller
// Tracks which views are open per module, synchronized with the router and persisted across restarts

pub mod policy;
pub mod session;
pub mod store;

pub use session::TabSession;
pub use store::ModuleTabStore;
