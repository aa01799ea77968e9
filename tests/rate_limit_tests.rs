use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use linkboard::middleware::RateLimiter;

#[test]
fn allows_attempts_under_the_limit() {
    let limiter = RateLimiter::with_limits(5, Duration::from_secs(60));
    let ip = IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1));

    for _ in 0..5 {
        assert!(limiter.check(ip), "should allow attempts under the limit");
    }
}

#[test]
fn blocks_attempts_over_the_limit() {
    let limiter = RateLimiter::with_limits(5, Duration::from_secs(60));
    let ip = IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1));

    for _ in 0..5 {
        limiter.check(ip);
    }

    assert!(!limiter.check(ip), "should block attempts over the limit");
}

#[test]
fn budgets_are_per_ip() {
    let limiter = RateLimiter::with_limits(3, Duration::from_secs(60));
    let first = IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1));
    let second = IpAddr::V4(Ipv4Addr::new(192, 168, 1, 2));

    for _ in 0..3 {
        limiter.check(first);
    }

    assert!(!limiter.check(first));
    assert!(limiter.check(second));
}

#[test]
fn window_slides_after_expiry() {
    let limiter = RateLimiter::with_limits(2, Duration::from_millis(50));
    let ip = IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1));

    assert!(limiter.check(ip));
    assert!(limiter.check(ip));
    assert!(!limiter.check(ip));

    thread::sleep(Duration::from_millis(60));

    assert!(limiter.check(ip), "expired attempts should free the budget");
}

#[test]
fn prune_keeps_active_windows() {
    let limiter = RateLimiter::with_limits(5, Duration::from_secs(60));
    let ip = IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1));

    for _ in 0..3 {
        limiter.check(ip);
    }

    limiter.prune();

    // Recent attempts survive pruning and still count.
    for _ in 0..2 {
        assert!(limiter.check(ip));
    }
    assert!(!limiter.check(ip));
}

#[test]
fn concurrent_checks_share_one_budget() {
    let limiter = Arc::new(RateLimiter::with_limits(10, Duration::from_secs(60)));
    let ip = IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1));

    let handles: Vec<_> = (0..5)
        .map(|_| {
            let limiter = Arc::clone(&limiter);
            thread::spawn(move || {
                for _ in 0..3 {
                    limiter.check(ip);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    // 15 attempts across threads exhausted the budget of 10.
    assert!(!limiter.check(ip));
}

#[test]
fn default_limits_allow_a_first_attempt() {
    let limiter = RateLimiter::default();
    let ip = IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1));

    assert!(limiter.check(ip));
}
