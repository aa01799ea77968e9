#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use actix_web::cookie::Cookie;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{middleware as actix_middleware, test, web, App, Error};

use linkboard::auth_token::AuthTokenService;
use linkboard::config::AuthConfig;
use linkboard::db::LinkStore;
use linkboard::handlers;
use linkboard::middleware::{identity_middleware, AUTH_COOKIE};
use linkboard::password::{BcryptHasher, PasswordHasher};

pub const TEST_SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";
pub const TEST_TTL_SECS: u64 = 604_800;

/// Builds the API with the same route tree as the real server, backed by the
/// given store and a fast hashing policy. Rate limiting is left out; it has
/// its own tests.
pub fn test_app(
    store: Arc<dyn LinkStore>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = Error,
        InitError = (),
    >,
> {
    let auth_tokens = AuthTokenService::new(TEST_SECRET.to_vec(), Duration::from_secs(TEST_TTL_SECS))
        .expect("test auth token service");
    let hasher: Arc<dyn PasswordHasher> = Arc::new(BcryptHasher::with_cost(4));

    App::new()
        .app_data(web::Data::from(store))
        .app_data(web::Data::from(hasher))
        .app_data(web::Data::new(auth_tokens))
        .app_data(web::Data::new(AuthConfig {
            token_ttl_secs: TEST_TTL_SECS,
            cookie_secure: false,
        }))
        .service(handlers::health_check)
        .service(
            web::scope("/auth")
                .service(handlers::logout)
                .service(handlers::register)
                .service(handlers::login),
        )
        .service(
            web::scope("")
                .wrap(actix_middleware::from_fn(identity_middleware))
                .service(handlers::list_favorites)
                .service(handlers::create_favorite)
                .service(handlers::list_tabs)
                .service(handlers::create_tab),
        )
}

/// Request builder for a JSON POST.
pub fn json_post(uri: &str, body: serde_json::Value) -> test::TestRequest {
    test::TestRequest::post().uri(uri).set_json(body)
}

/// Pulls the session cookie out of a response, if one was set.
pub fn auth_cookie<B>(resp: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|cookie| cookie.name() == AUTH_COOKIE)
        .map(|cookie| cookie.into_owned())
}

/// Registers an account and hands back its session cookie.
macro_rules! register_user {
    ($app:expr, $email:expr) => {{
        let resp = actix_web::test::call_service(
            $app,
            crate::common::json_post(
                "/auth/register",
                serde_json::json!({"email": $email, "password": "secret123"}),
            )
            .to_request(),
        )
        .await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
        crate::common::auth_cookie(&resp).expect("session cookie set")
    }};
}
pub(crate) use register_user;
