use actix_web::{get, post, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::non_empty;
use crate::{
    db::{LinkStore, Tab},
    error::{LinkboardError, Result},
    middleware::RequestIdentity,
};

#[derive(Debug, Deserialize)]
pub struct CreateTabRequest {
    pub key: Option<String>,
    pub label: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TabInfo {
    pub id: String,
    pub user_id: String,
    pub key: String,
    pub label: String,
    pub created_at: DateTime<Utc>,
}

impl From<Tab> for TabInfo {
    fn from(tab: Tab) -> Self {
        Self {
            id: tab.id.to_hex(),
            user_id: tab.user_id.to_hex(),
            key: tab.key,
            label: tab.label,
            created_at: tab.created_at,
        }
    }
}

#[get("/user-tabs")]
pub async fn list_tabs(
    store: web::Data<dyn LinkStore>,
    identity: web::ReqData<RequestIdentity>,
) -> Result<HttpResponse> {
    // Anonymous callers get 401 with an empty array body; dashboard clients
    // consume the body directly as a tab list.
    let Some(user_id) = identity.user_id() else {
        return Ok(HttpResponse::Unauthorized().json(Vec::<TabInfo>::new()));
    };

    let tabs: Vec<TabInfo> = store
        .list_tabs(user_id)
        .await?
        .into_iter()
        .map(TabInfo::from)
        .collect();

    Ok(HttpResponse::Ok().json(tabs))
}

#[post("/user-tabs")]
pub async fn create_tab(
    req: web::Json<CreateTabRequest>,
    store: web::Data<dyn LinkStore>,
    identity: web::ReqData<RequestIdentity>,
) -> Result<HttpResponse> {
    let user_id = identity.user_id().ok_or(LinkboardError::Unauthorized)?;
    let req = req.into_inner();

    let (key, label) = match (non_empty(req.key), non_empty(req.label)) {
        (Some(key), Some(label)) => (key, label),
        _ => {
            return Err(LinkboardError::Validation(
                "Key and label required".to_string(),
            ))
        }
    };

    let tab = store.insert_tab(user_id, &key, &label).await?;

    log::info!("Created tab '{}' for user {}", tab.key, user_id.to_hex());

    Ok(HttpResponse::Ok().json(TabInfo::from(tab)))
}
