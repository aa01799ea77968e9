mod auth_token;
mod config;
mod db;
mod error;
mod handlers;
mod middleware;
mod password;

use std::sync::Arc;
use std::time::Duration;

use actix_web::{middleware as actix_middleware, web, App, HttpServer};
use mongodb::Client;
use tokio::time;

use auth_token::AuthTokenService;
use config::AppConfig;
use db::{LinkStore, MongoStore};
use middleware::{identity_middleware, rate_limit_middleware, RateLimiter};
use password::{BcryptHasher, PasswordHasher};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if it exists (for development)
    dotenvy::dotenv().ok();

    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    log::info!("Starting Linkboard server...");

    // Load configuration
    let config_path =
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/linkboard.toml".to_string());

    let mut config = match AppConfig::load_from_file(&config_path) {
        Ok(config) => config,
        Err(err) => {
            log::warn!(
                "Failed to load configuration from '{}': {}. Falling back to defaults.",
                config_path,
                err
            );
            AppConfig::default()
        }
    };
    config.apply_env_overrides();

    // The signing secret never lives in the config file.
    let secret = std::env::var("AUTH_TOKEN_SECRET").unwrap_or_else(|_| {
        eprintln!("AUTH_TOKEN_SECRET must be set (min 32 bytes)");
        std::process::exit(1);
    });

    let auth_tokens = AuthTokenService::new(secret.into_bytes(), config.token_ttl())
        .unwrap_or_else(|err| {
            eprintln!("Invalid auth token configuration: {}", err);
            std::process::exit(1);
        });

    log::info!("Session tokens valid for {} seconds", config.auth.token_ttl_secs);

    // Connect to MongoDB
    log::info!("Connecting to MongoDB at {}...", config.database.uri);
    let client = Client::with_uri_str(&config.database.uri)
        .await
        .expect("Failed to connect to MongoDB");

    let mongo_store = MongoStore::new(client, &config.database.name);

    log::info!("Initializing database indexes...");
    mongo_store
        .init_indexes()
        .await
        .expect("Failed to initialize database indexes");

    // Create shared state
    let store: Arc<dyn LinkStore> = Arc::new(mongo_store);
    let hasher: Arc<dyn PasswordHasher> = Arc::new(BcryptHasher::new());
    let rate_limiter = RateLimiter::new();

    // Spawn background cleanup task
    let rate_limiter_clone = rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval = time::interval(Duration::from_secs(300));
        loop {
            interval.tick().await;
            rate_limiter_clone.prune();
            log::debug!("Background cleanup: pruned rate limiter windows");
        }
    });

    let server_host = config.server.host.clone();
    let server_port = config.server.port;
    let auth_config = config.auth.clone();

    log::info!("Starting HTTP server at {}:{}...", server_host, server_port);

    HttpServer::new(move || {
        App::new()
            // Shared state
            .app_data(web::Data::from(store.clone()))
            .app_data(web::Data::from(hasher.clone()))
            .app_data(web::Data::new(auth_tokens.clone()))
            .app_data(web::Data::new(auth_config.clone()))
            .app_data(web::Data::new(rate_limiter.clone()))
            // Middleware
            .wrap(actix_middleware::Logger::default())
            .wrap(actix_middleware::Compress::default())
            // Public routes (no authentication required)
            .service(handlers::health_check)
            .service(
                web::scope("/auth")
                    .service(handlers::logout)
                    .service(
                        web::scope("")
                            .wrap(actix_middleware::from_fn(rate_limit_middleware))
                            .service(handlers::register)
                            .service(handlers::login),
                    ),
            )
            // Owner-scoped routes; handlers reject anonymous callers
            .service(
                web::scope("")
                    .wrap(actix_middleware::from_fn(identity_middleware))
                    .service(handlers::list_favorites)
                    .service(handlers::create_favorite)
                    .service(handlers::list_tabs)
                    .service(handlers::create_tab),
            )
    })
    .bind((server_host, server_port))?
    .run()
    .await
}
