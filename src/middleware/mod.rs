pub mod auth;
pub mod rate_limit;

pub use auth::{identity_middleware, RequestIdentity, AUTH_COOKIE};
pub use rate_limit::{rate_limit_middleware, RateLimiter};
