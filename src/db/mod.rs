pub mod memory;
pub mod models;
pub mod repository;

pub use memory::MemoryStore;
pub use models::{Favorite, Tab, User};
pub use repository::MongoStore;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::error::Result;

/// Hard upper bound on custom tabs per user.
pub const TAB_LIMIT: usize = 5;

/// Storage seam the handlers talk to. Every operation is scoped to a single
/// owner; implementations must make `insert_tab` an atomic check-and-insert
/// so the tab cap and per-user key uniqueness hold under concurrent requests.
#[async_trait]
pub trait LinkStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Fails with `Conflict` when the email is already registered.
    async fn insert_user(&self, user: User) -> Result<User>;

    /// Most recent first.
    async fn list_favorites(&self, user_id: ObjectId) -> Result<Vec<Favorite>>;

    async fn insert_favorite(&self, favorite: Favorite) -> Result<Favorite>;

    /// Creation order, oldest first.
    async fn list_tabs(&self, user_id: ObjectId) -> Result<Vec<Tab>>;

    /// Fails with `Conflict` on a duplicate key and `TabQuotaExceeded` once
    /// the user holds `TAB_LIMIT` tabs; two concurrent calls can never both
    /// succeed past either bound.
    async fn insert_tab(&self, user_id: ObjectId, key: &str, label: &str) -> Result<Tab>;
}
