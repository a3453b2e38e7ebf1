use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Duration, SecondsFormat, Utc};

use crate::state::AppState;

/// Login attempts allowed per client IP within one window.
pub const LOGIN_MAX_ATTEMPTS: u32 = 10;
/// Length of the login rate window in seconds.
pub const LOGIN_WINDOW_SECONDS: i64 = 60;

// Expired entries are swept once the store grows past this.
const STORE_CLEANUP_THRESHOLD: usize = 1024;

#[derive(Debug, Clone, Copy)]
struct ClientWindow {
    count: u32,
    reset_at: DateTime<Utc>,
}

/// Fixed-window request counter keyed by client IP.
///
/// Owned by [`AppState`] so tests can swap in a tighter limiter; there is no
/// process-global store.
#[derive(Clone)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    store: Arc<Mutex<HashMap<IpAddr, ClientWindow>>>,
}

/// Outcome of a single counted request, carried into the response headers.
#[derive(Debug, Clone, Copy)]
pub struct RateDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_at: DateTime<Utc>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests: max_requests.max(1),
            window,
            store: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn login() -> Self {
        Self::new(LOGIN_MAX_ATTEMPTS, Duration::seconds(LOGIN_WINDOW_SECONDS))
    }

    /// Counts a request from `ip` and reports whether it fits the window.
    /// Rejected requests still count, so hammering does not shorten the wait.
    pub fn check(&self, ip: IpAddr) -> RateDecision {
        self.check_at(ip, Utc::now())
    }

    fn check_at(&self, ip: IpAddr, now: DateTime<Utc>) -> RateDecision {
        let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());

        if store.len() > STORE_CLEANUP_THRESHOLD {
            store.retain(|_, window| window.reset_at > now);
        }

        let entry = store.entry(ip).or_insert(ClientWindow {
            count: 0,
            reset_at: now + self.window,
        });
        if entry.reset_at <= now {
            entry.count = 0;
            entry.reset_at = now + self.window;
        }
        entry.count += 1;

        RateDecision {
            allowed: entry.count <= self.max_requests,
            limit: self.max_requests,
            remaining: self.max_requests.saturating_sub(entry.count),
            reset_at: entry.reset_at,
        }
    }
}

/// Throttles login attempts per client IP. Every response passing through
/// carries `X-RateLimit-*` headers; rejected attempts get a 429 with the
/// seconds left until the window resets.
pub async fn login_rate_limit(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    let decision = state.login_limiter.check(addr.ip());

    if !decision.allowed {
        let retry_after = (decision.reset_at - Utc::now()).num_seconds().max(1);
        tracing::warn!(ip = %addr.ip(), retry_after, "Login rate limit exceeded");
        let body = serde_json::json!({
            "error": "Too many requests, please try again later.",
            "retryAfter": retry_after,
        });
        let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
        apply_rate_headers(response.headers_mut(), &decision);
        return response;
    }

    let mut response = next.run(request).await;
    apply_rate_headers(response.headers_mut(), &decision);
    response
}

fn apply_rate_headers(headers: &mut HeaderMap, decision: &RateDecision) {
    if let Ok(value) = HeaderValue::from_str(&decision.limit.to_string()) {
        headers.insert("x-ratelimit-limit", value);
    }
    if let Ok(value) = HeaderValue::from_str(&decision.remaining.to_string()) {
        headers.insert("x-ratelimit-remaining", value);
    }
    let reset = decision
        .reset_at
        .to_rfc3339_opts(SecondsFormat::Millis, true);
    if let Ok(value) = HeaderValue::from_str(&reset) {
        headers.insert("x-ratelimit-reset", value);
    }
}
