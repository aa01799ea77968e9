use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    error::ErrorTooManyRequests,
    middleware::Next,
};
use dashmap::DashMap;
use std::collections::VecDeque;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

const MAX_ATTEMPTS: usize = 20;
const WINDOW: Duration = Duration::from_secs(60);

/// Per-IP sliding-window limiter for the credential endpoints. Password
/// hashing is deliberately expensive, so unauthenticated callers get a tight
/// budget.
#[derive(Clone)]
pub struct RateLimiter {
    max_attempts: usize,
    window: Duration,
    attempts: Arc<DashMap<IpAddr, VecDeque<Instant>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::with_limits(MAX_ATTEMPTS, WINDOW)
    }

    pub fn with_limits(max_attempts: usize, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
            attempts: Arc::new(DashMap::new()),
        }
    }

    /// Records an attempt and reports whether it is within budget.
    pub fn check(&self, ip: IpAddr) -> bool {
        let now = Instant::now();
        let mut attempts = self.attempts.entry(ip).or_default();

        while attempts
            .front()
            .is_some_and(|first| now.duration_since(*first) >= self.window)
        {
            attempts.pop_front();
        }

        if attempts.len() >= self.max_attempts {
            return false;
        }

        attempts.push_back(now);
        true
    }

    /// Drops windows that have fully expired; called from a background task.
    pub fn prune(&self) {
        let now = Instant::now();
        let window = self.window;

        self.attempts.retain(|_, attempts| {
            while attempts
                .front()
                .is_some_and(|first| now.duration_since(*first) >= window)
            {
                attempts.pop_front();
            }
            !attempts.is_empty()
        });
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

pub async fn rate_limit_middleware(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    let peer_addr = req
        .peer_addr()
        .ok_or_else(|| ErrorTooManyRequests("Unable to determine client IP"))?;

    let rate_limiter = req
        .app_data::<actix_web::web::Data<RateLimiter>>()
        .ok_or_else(|| ErrorTooManyRequests("Rate limiter not available"))?;

    if !rate_limiter.check(peer_addr.ip()) {
        log::warn!("Rate limit exceeded for IP: {}", peer_addr.ip());
        return Err(ErrorTooManyRequests("Too many requests"));
    }

    next.call(req).await
}
