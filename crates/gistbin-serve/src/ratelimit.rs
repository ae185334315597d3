//! Per-client fixed-window rate limiting for create requests.
//!
//! Each client gets `amount` requests per `window`. The window starts at the
//! client's first request and resets once it has elapsed. Responses carry the
//! standard `RateLimit-Limit`, `RateLimit-Remaining` and `RateLimit-Reset`
//! headers; rejected requests get a 429.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use parking_lot::Mutex;

use crate::config::RateLimiterConfig;
use crate::state::AppState;

/// Body of a 429 response.
pub const RATE_LIMITED_MESSAGE: &str = "Too many requests, please try again later.";

/// Tracked clients above which expired windows are pruned on each check.
const PRUNE_THRESHOLD: usize = 1024;

const RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("ratelimit-limit");
const RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("ratelimit-remaining");
const RATELIMIT_RESET: HeaderName = HeaderName::from_static("ratelimit-reset");

#[derive(Debug, Clone, Copy)]
struct ClientWindow {
    started: Instant,
    count: u32,
}

/// Outcome of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Time until the client's window resets.
    pub reset_after: Duration,
}

impl Decision {
    /// Seconds until reset, rounded up.
    pub fn reset_secs(&self) -> u64 {
        let secs = self.reset_after.as_secs();
        if self.reset_after.subsec_nanos() > 0 {
            secs + 1
        } else {
            secs
        }
    }

    /// Write the `RateLimit-*` headers, plus `Retry-After` when rejected.
    pub fn apply(&self, headers: &mut HeaderMap) {
        headers.insert(RATELIMIT_LIMIT, HeaderValue::from(self.limit));
        headers.insert(RATELIMIT_REMAINING, HeaderValue::from(self.remaining));
        headers.insert(RATELIMIT_RESET, HeaderValue::from(self.reset_secs()));
        if !self.allowed {
            headers.insert(header::RETRY_AFTER, HeaderValue::from(self.reset_secs()));
        }
    }
}

/// Fixed-window limiter keyed by client identifier.
pub struct ClientRateLimiter {
    limit: u32,
    window: Duration,
    clients: Mutex<HashMap<String, ClientWindow>>,
}

impl ClientRateLimiter {
    #[must_use]
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            clients: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &RateLimiterConfig) -> Self {
        Self::new(config.amount, Duration::from_secs(config.window))
    }

    /// Count a request from `client` and decide whether it may proceed.
    pub fn check(&self, client: &str) -> Decision {
        self.check_at(client, Instant::now())
    }

    fn check_at(&self, client: &str, now: Instant) -> Decision {
        let mut clients = self.clients.lock();

        if clients.len() > PRUNE_THRESHOLD {
            let window = self.window;
            clients.retain(|_, w| now.saturating_duration_since(w.started) < window);
        }

        let entry = clients.entry(client.to_string()).or_insert(ClientWindow {
            started: now,
            count: 0,
        });

        if now.saturating_duration_since(entry.started) >= self.window {
            *entry = ClientWindow {
                started: now,
                count: 0,
            };
        }

        let allowed = entry.count < self.limit;
        if allowed {
            entry.count += 1;
        }

        Decision {
            allowed,
            limit: self.limit,
            remaining: self.limit.saturating_sub(entry.count),
            reset_after: self
                .window
                .saturating_sub(now.saturating_duration_since(entry.started)),
        }
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.clients.lock().len()
    }
}

/// Identify the client: socket peer address, else the first `X-Forwarded-For`
/// entry, else a shared bucket.
fn client_key(request: &Request) -> String {
    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }

    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Middleware enforcing the create rate limit.
pub async fn limit_creates(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let client = client_key(&request);
    let decision = state.limiter.check(&client);

    if !decision.allowed {
        tracing::debug!(client = %client, reset_secs = decision.reset_secs(), "create rate limited");
        metrics::counter!("rate_limited_total").increment(1);
        let mut response = (StatusCode::TOO_MANY_REQUESTS, RATE_LIMITED_MESSAGE).into_response();
        decision.apply(response.headers_mut());
        return response;
    }

    let mut response = next.run(request).await;
    decision.apply(response.headers_mut());
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn allows_up_to_limit() {
        let limiter = ClientRateLimiter::new(3, Duration::from_secs(60));
        let now = Instant::now();

        for expected_remaining in [2, 1, 0] {
            let d = limiter.check_at("1.2.3.4", now);
            assert!(d.allowed);
            assert_eq!(d.remaining, expected_remaining);
        }

        let d = limiter.check_at("1.2.3.4", now);
        assert!(!d.allowed);
        assert_eq!(d.remaining, 0);
        assert_eq!(d.reset_secs(), 60);
    }

    #[test]
    fn clients_are_independent() {
        let limiter = ClientRateLimiter::new(1, Duration::from_secs(60));
        let now = Instant::now();
        assert!(limiter.check_at("a", now).allowed);
        assert!(!limiter.check_at("a", now).allowed);
        assert!(limiter.check_at("b", now).allowed);
        assert_eq!(limiter.tracked_clients(), 2);
    }

    #[test]
    fn window_resets() {
        let limiter = ClientRateLimiter::new(1, Duration::from_secs(10));
        let start = Instant::now();
        assert!(limiter.check_at("a", start).allowed);

        let later = start + Duration::from_secs(4);
        let d = limiter.check_at("a", later);
        assert!(!d.allowed);
        assert_eq!(d.reset_secs(), 6);

        assert!(limiter.check_at("a", start + Duration::from_secs(10)).allowed);
    }

    #[test]
    fn reset_rounds_up() {
        let d = Decision {
            allowed: false,
            limit: 1,
            remaining: 0,
            reset_after: Duration::from_millis(1500),
        };
        assert_eq!(d.reset_secs(), 2);
    }

    #[test]
    fn headers_are_written() {
        let limiter = ClientRateLimiter::new(5, Duration::from_secs(300));
        let d = limiter.check_at("a", Instant::now());
        let mut headers = HeaderMap::new();
        d.apply(&mut headers);
        assert_eq!(headers["ratelimit-limit"], "5");
        assert_eq!(headers["ratelimit-remaining"], "4");
        assert_eq!(headers["ratelimit-reset"], "300");
        assert!(!headers.contains_key("retry-after"));
    }

    #[test]
    fn rejection_sets_retry_after() {
        let limiter = ClientRateLimiter::new(1, Duration::from_secs(30));
        let start = Instant::now();
        limiter.check_at("a", start);

        let d = limiter.check_at("a", start + Duration::from_secs(10));
        let mut headers = HeaderMap::new();
        d.apply(&mut headers);
        assert_eq!(headers["retry-after"], "20");
        assert_eq!(headers["ratelimit-reset"], "20");
    }

    #[test]
    fn expired_windows_are_pruned() {
        let limiter = ClientRateLimiter::new(1, Duration::from_secs(1));
        let start = Instant::now();
        for i in 0..=PRUNE_THRESHOLD {
            limiter.check_at(&format!("client-{i}"), start);
        }
        assert_eq!(limiter.tracked_clients(), PRUNE_THRESHOLD + 1);

        limiter.check_at("late", start + Duration::from_secs(2));
        assert_eq!(limiter.tracked_clients(), 1);
    }

    #[test]
    fn client_key_prefers_connect_info() {
        let mut request = axum::http::Request::builder()
            .header("x-forwarded-for", "9.9.9.9, 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_key(&request), "9.9.9.9");

        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))));
        assert_eq!(client_key(&request), "127.0.0.1");

        let bare = axum::http::Request::builder().body(Body::empty()).unwrap();
        assert_eq!(client_key(&bare), "unknown");
    }
}
