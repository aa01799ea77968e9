pub mod auth;
pub mod favorites;
pub mod health;
pub mod tabs;

pub use auth::{login, logout, register};
pub use favorites::{create_favorite, list_favorites};
pub use health::health_check;
pub use tabs::{create_tab, list_tabs};

/// Treats a missing field and an empty string the same way, like the clients
/// this API grew up with.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}
