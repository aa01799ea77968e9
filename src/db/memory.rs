use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use mongodb::bson::oid::ObjectId;

use super::models::{Favorite, Tab, User};
use super::{LinkStore, TAB_LIMIT};
use crate::error::{LinkboardError, Result};

/// In-memory store with the same invariants as the Mongo-backed one. The
/// per-user map entry guard is held across the tab check and insert, making
/// check-and-insert one critical section.
#[derive(Default)]
pub struct MemoryStore {
    users: DashMap<String, User>,
    favorites: DashMap<ObjectId, Vec<Favorite>>,
    tabs: DashMap<ObjectId, Vec<Tab>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LinkStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.users.get(email).map(|entry| entry.clone()))
    }

    async fn insert_user(&self, user: User) -> Result<User> {
        match self.users.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(LinkboardError::user_exists()),
            Entry::Vacant(vacant) => {
                vacant.insert(user.clone());
                Ok(user)
            }
        }
    }

    async fn list_favorites(&self, user_id: ObjectId) -> Result<Vec<Favorite>> {
        let mut favorites = self
            .favorites
            .get(&user_id)
            .map(|entry| entry.clone())
            .unwrap_or_default();
        // newest first; insertion order breaks created_at ties
        favorites.reverse();
        favorites.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(favorites)
    }

    async fn insert_favorite(&self, favorite: Favorite) -> Result<Favorite> {
        self.favorites
            .entry(favorite.user_id)
            .or_default()
            .push(favorite.clone());
        Ok(favorite)
    }

    async fn list_tabs(&self, user_id: ObjectId) -> Result<Vec<Tab>> {
        let mut tabs = self
            .tabs
            .get(&user_id)
            .map(|entry| entry.clone())
            .unwrap_or_default();
        tabs.sort_by_key(|tab| tab.position);
        Ok(tabs)
    }

    async fn insert_tab(&self, user_id: ObjectId, key: &str, label: &str) -> Result<Tab> {
        let mut tabs = self.tabs.entry(user_id).or_default();

        if tabs.iter().any(|tab| tab.key == key) {
            return Err(LinkboardError::tab_exists());
        }
        if tabs.len() >= TAB_LIMIT {
            return Err(LinkboardError::TabQuotaExceeded);
        }

        let tab = Tab::new(user_id, key.to_string(), label.to_string(), tabs.len() as u32);
        tabs.push(tab.clone());
        Ok(tab)
    }
}
