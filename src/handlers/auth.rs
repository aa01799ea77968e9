use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::{
    auth_token::{now_ms, AuthTokenService},
    config::AuthConfig,
    db::{LinkStore, User},
    error::{LinkboardError, Result},
    middleware::AUTH_COOKIE,
    password::PasswordHasher,
};

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
}

#[post("/register")]
pub async fn register(
    req: web::Json<CredentialsRequest>,
    store: web::Data<dyn LinkStore>,
    hasher: web::Data<dyn PasswordHasher>,
    auth_tokens: web::Data<AuthTokenService>,
    auth_config: web::Data<AuthConfig>,
) -> Result<HttpResponse> {
    log::info!("Registration attempt for {}", req.email);

    if store.find_user_by_email(&req.email).await?.is_some() {
        return Err(LinkboardError::user_exists());
    }

    let password_hash = hasher.hash(&req.password)?;
    let user = store
        .insert_user(User::new(req.email.clone(), password_hash))
        .await?;

    let cookie = session_cookie(&auth_tokens, &auth_config, &user.id.to_hex())?;

    log::info!("Registered user {} ({})", user.email, user.id.to_hex());

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(AuthResponse { success: true }))
}

#[post("/login")]
pub async fn login(
    req: web::Json<CredentialsRequest>,
    store: web::Data<dyn LinkStore>,
    hasher: web::Data<dyn PasswordHasher>,
    auth_tokens: web::Data<AuthTokenService>,
    auth_config: web::Data<AuthConfig>,
) -> Result<HttpResponse> {
    log::info!("Login attempt for {}", req.email);

    // Unknown email and wrong password fail identically, so a caller cannot
    // probe which half was wrong.
    let user = store
        .find_user_by_email(&req.email)
        .await?
        .ok_or(LinkboardError::InvalidCredentials)?;

    if !hasher.verify(&req.password, &user.password_hash)? {
        log::warn!("Failed login attempt for {}", req.email);
        return Err(LinkboardError::InvalidCredentials);
    }

    let cookie = session_cookie(&auth_tokens, &auth_config, &user.id.to_hex())?;

    log::info!("Successful login for {}", user.email);

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(AuthResponse { success: true }))
}

#[post("/logout")]
pub async fn logout() -> Result<HttpResponse> {
    // Clears the delivery cookie only. An already-issued token stays
    // cryptographically valid until its natural expiry; there is no
    // server-side revocation list.
    let cookie = Cookie::build(AUTH_COOKIE, "")
        .path("/")
        .max_age(CookieDuration::seconds(0))
        .finish();

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(AuthResponse { success: true }))
}

fn session_cookie(
    auth_tokens: &AuthTokenService,
    auth_config: &AuthConfig,
    user_id: &str,
) -> Result<Cookie<'static>> {
    let token = auth_tokens
        .issue_session_token(user_id, now_ms())
        .map_err(|err| LinkboardError::Internal(format!("Failed to issue auth token: {err}")))?;

    Ok(Cookie::build(AUTH_COOKIE, token)
        .path("/")
        .http_only(true)
        .secure(auth_config.cookie_secure)
        .same_site(SameSite::Strict)
        .max_age(CookieDuration::seconds(auth_tokens.ttl().as_secs() as i64))
        .finish())
}
