use actix_web::{get, post, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::non_empty;
use crate::{
    db::{Favorite, LinkStore},
    error::{LinkboardError, Result},
    middleware::RequestIdentity,
};

#[derive(Debug, Deserialize)]
pub struct CreateFavoriteRequest {
    pub platform: Option<String>,
    pub url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FavoriteInfo {
    pub id: String,
    pub user_id: String,
    pub platform: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Favorite> for FavoriteInfo {
    fn from(favorite: Favorite) -> Self {
        Self {
            id: favorite.id.to_hex(),
            user_id: favorite.user_id.to_hex(),
            platform: favorite.platform,
            url: favorite.url,
            title: favorite.title,
            description: favorite.description,
            created_at: favorite.created_at,
        }
    }
}

#[get("/favorites")]
pub async fn list_favorites(
    store: web::Data<dyn LinkStore>,
    identity: web::ReqData<RequestIdentity>,
) -> Result<HttpResponse> {
    let user_id = identity.user_id().ok_or(LinkboardError::Unauthorized)?;

    let favorites: Vec<FavoriteInfo> = store
        .list_favorites(user_id)
        .await?
        .into_iter()
        .map(FavoriteInfo::from)
        .collect();

    log::debug!(
        "Listed {} favorites for user {}",
        favorites.len(),
        user_id.to_hex()
    );

    Ok(HttpResponse::Ok().json(favorites))
}

#[post("/favorites")]
pub async fn create_favorite(
    req: web::Json<CreateFavoriteRequest>,
    store: web::Data<dyn LinkStore>,
    identity: web::ReqData<RequestIdentity>,
) -> Result<HttpResponse> {
    let user_id = identity.user_id().ok_or(LinkboardError::Unauthorized)?;
    let req = req.into_inner();

    let (platform, url) = match (non_empty(req.platform), non_empty(req.url)) {
        (Some(platform), Some(url)) => (platform, url),
        _ => {
            return Err(LinkboardError::Validation(
                "Platform and URL required".to_string(),
            ))
        }
    };

    let favorite = store
        .insert_favorite(Favorite::new(
            user_id,
            platform,
            url,
            req.title,
            req.description,
        ))
        .await?;

    log::info!(
        "Stored favorite {} for user {}",
        favorite.id.to_hex(),
        user_id.to_hex()
    );

    Ok(HttpResponse::Ok().json(FavoriteInfo::from(favorite)))
}
