use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    web, HttpMessage,
};
use mongodb::bson::oid::ObjectId;

use crate::auth_token::{now_ms, AuthTokenService};
use crate::error::LinkboardError;

/// Name of the session cookie carrying the signed token.
pub const AUTH_COOKIE: &str = "auth_token";

/// Identity resolved from the session cookie. `None` means the request is
/// anonymous: no cookie, bad signature, malformed payload, or an expired
/// token — the distinction is never surfaced to the caller.
#[derive(Debug, Clone)]
pub struct RequestIdentity(Option<ObjectId>);

impl RequestIdentity {
    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn user(user_id: ObjectId) -> Self {
        Self(Some(user_id))
    }

    pub fn user_id(&self) -> Option<ObjectId> {
        self.0
    }
}

/// Resolves the bearer token into a `RequestIdentity` and stores it in the
/// request extensions. Never rejects by itself; handlers decide what an
/// anonymous caller may do.
pub async fn identity_middleware(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    let auth_tokens = req
        .app_data::<web::Data<AuthTokenService>>()
        .cloned()
        .ok_or_else(|| LinkboardError::Internal("auth token service not configured".to_string()))?;

    let identity = req
        .cookie(AUTH_COOKIE)
        .and_then(|cookie| match auth_tokens.verify(cookie.value(), now_ms()) {
            Ok(claims) => ObjectId::parse_str(&claims.user_id).ok(),
            Err(err) => {
                log::debug!("Rejected auth token: {}", err);
                None
            }
        })
        .map(RequestIdentity::user)
        .unwrap_or_else(RequestIdentity::anonymous);

    req.extensions_mut().insert(identity);

    next.call(req).await
}
