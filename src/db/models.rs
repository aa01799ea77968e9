use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Registered account. The id is generated client-side so a freshly inserted
/// record can be handed back to the caller without a read-back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: String, password_hash: String) -> Self {
        Self {
            id: ObjectId::new(),
            email,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

/// A stored link. The owner is fixed at creation and never changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Favorite {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: ObjectId,
    pub platform: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Favorite {
    pub fn new(
        user_id: ObjectId,
        platform: String,
        url: String,
        title: Option<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            id: ObjectId::new(),
            user_id,
            platform,
            url,
            title,
            description,
            created_at: Utc::now(),
        }
    }
}

/// A custom dashboard tab. `position` is the 0-based creation index; it backs
/// the per-user uniqueness constraint and the stable listing order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tab {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: ObjectId,
    pub key: String,
    pub label: String,
    pub position: u32,
    pub created_at: DateTime<Utc>,
}

impl Tab {
    pub fn new(user_id: ObjectId, key: String, label: String, position: u32) -> Self {
        Self {
            id: ObjectId::new(),
            user_id,
            key,
            label,
            position,
            created_at: Utc::now(),
        }
    }
}
