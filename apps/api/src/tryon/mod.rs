// Virtual try-on: 2D overlay composites saved from the browser, and AI
// generation through the configured image backend.

pub mod guard;
pub mod handlers;
pub mod overlay;
pub mod store;
