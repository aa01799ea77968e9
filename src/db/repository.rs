use async_trait::async_trait;
use futures_util::stream::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
    Client, Collection, Database, IndexModel,
};

use super::models::{Favorite, Tab, User};
use super::{LinkStore, TAB_LIMIT};
use crate::error::{LinkboardError, Result};

const USER_EMAIL_INDEX: &str = "user_email_unique";
const TAB_KEY_INDEX: &str = "tab_user_key_unique";
const TAB_POSITION_INDEX: &str = "tab_user_position_unique";

/// MongoDB-backed store. Uniqueness and the tab cap are enforced by unique
/// indexes, so the insert itself is the atomic check (no multi-document
/// transaction, works on standalone deployments).
#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub fn new(client: Client, database_name: &str) -> Self {
        Self {
            db: client.database(database_name),
        }
    }

    fn users(&self) -> Collection<User> {
        self.db.collection("users")
    }

    fn favorites(&self) -> Collection<Favorite> {
        self.db.collection("favorites")
    }

    fn tabs(&self) -> Collection<Tab> {
        self.db.collection("tabs")
    }

    pub async fn init_indexes(&self) -> Result<()> {
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name(USER_EMAIL_INDEX.to_string())
                    .build(),
            )
            .build();
        self.users().create_index(email_index).await?;

        // Listing favorites is always by owner, newest first.
        let favorite_owner_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "created_at": -1 })
            .build();
        self.favorites().create_index(favorite_owner_index).await?;

        let tab_key_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "key": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name(TAB_KEY_INDEX.to_string())
                    .build(),
            )
            .build();
        self.tabs().create_index(tab_key_index).await?;

        // Concurrent inserts for one user race for the same position; the
        // unique index lets exactly one win (see insert_tab).
        let tab_position_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "position": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name(TAB_POSITION_INDEX.to_string())
                    .build(),
            )
            .build();
        self.tabs().create_index(tab_position_index).await?;

        log::info!("Database indexes ready");
        Ok(())
    }
}

fn is_duplicate_key_on(err: &mongodb::error::Error, index_name: &str) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == 11000 && write_error.message.contains(index_name)
        }
        _ => false,
    }
}

#[async_trait]
impl LinkStore for MongoStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = self.users().find_one(doc! { "email": email }).await?;
        Ok(user)
    }

    async fn insert_user(&self, user: User) -> Result<User> {
        match self.users().insert_one(&user).await {
            Ok(_) => Ok(user),
            Err(err) if is_duplicate_key_on(&err, USER_EMAIL_INDEX) => {
                Err(LinkboardError::user_exists())
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn list_favorites(&self, user_id: ObjectId) -> Result<Vec<Favorite>> {
        let mut cursor = self
            .favorites()
            .find(doc! { "user_id": user_id })
            .sort(doc! { "created_at": -1, "_id": -1 })
            .await?;

        let mut favorites = Vec::new();
        while let Some(favorite) = cursor.try_next().await? {
            favorites.push(favorite);
        }

        Ok(favorites)
    }

    async fn insert_favorite(&self, favorite: Favorite) -> Result<Favorite> {
        self.favorites().insert_one(&favorite).await?;
        Ok(favorite)
    }

    async fn list_tabs(&self, user_id: ObjectId) -> Result<Vec<Tab>> {
        let mut cursor = self
            .tabs()
            .find(doc! { "user_id": user_id })
            .sort(doc! { "position": 1 })
            .await?;

        let mut tabs = Vec::new();
        while let Some(tab) = cursor.try_next().await? {
            tabs.push(tab);
        }

        Ok(tabs)
    }

    async fn insert_tab(&self, user_id: ObjectId, key: &str, label: &str) -> Result<Tab> {
        loop {
            let existing = self.list_tabs(user_id).await?;

            if existing.iter().any(|tab| tab.key == key) {
                return Err(LinkboardError::tab_exists());
            }
            if existing.len() >= TAB_LIMIT {
                return Err(LinkboardError::TabQuotaExceeded);
            }

            let position = existing.last().map(|tab| tab.position + 1).unwrap_or(0);
            let tab = Tab::new(user_id, key.to_string(), label.to_string(), position);

            match self.tabs().insert_one(&tab).await {
                Ok(_) => return Ok(tab),
                Err(err) if is_duplicate_key_on(&err, TAB_KEY_INDEX) => {
                    return Err(LinkboardError::tab_exists());
                }
                Err(err) if is_duplicate_key_on(&err, TAB_POSITION_INDEX) => {
                    // Lost the position race to a concurrent insert for the
                    // same user; re-read and try again.
                    continue;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}
