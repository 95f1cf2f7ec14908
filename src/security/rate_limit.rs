//! Fixed-window rate limiting keyed by client IP.

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::broadcast;

use crate::config::RateLimitConfig;
use crate::http::response::ApiError;
use crate::observability::metrics;

const X_RATELIMIT_LIMIT: &str = "x-ratelimit-limit";
const X_RATELIMIT_REMAINING: &str = "x-ratelimit-remaining";

/// Outcome of a limiter check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

#[derive(Debug, Clone, Copy)]
struct Window {
    opened: Instant,
    count: u32,
}

/// Counts requests per IP inside a window that opens on the first request
/// and resets once `window` has elapsed.
pub struct FixedWindowLimiter {
    windows: DashMap<IpAddr, Window>,
    settings: ArcSwap<RateLimitConfig>,
}

impl FixedWindowLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            windows: DashMap::new(),
            settings: ArcSwap::from_pointee(config),
        }
    }

    /// Swap in new limits. Open windows keep their counts.
    pub fn update(&self, config: RateLimitConfig) {
        self.settings.store(Arc::new(config));
    }

    pub fn settings(&self) -> Arc<RateLimitConfig> {
        self.settings.load_full()
    }

    pub fn check(&self, ip: IpAddr) -> RateDecision {
        self.check_at(ip, Instant::now())
    }

    fn check_at(&self, ip: IpAddr, now: Instant) -> RateDecision {
        let settings = self.settings.load();
        let window_len = Duration::from_secs(settings.window_secs);

        let mut entry = self.windows.entry(ip).or_insert(Window { opened: now, count: 0 });
        let window = entry.value_mut();

        if now.saturating_duration_since(window.opened) >= window_len {
            *window = Window { opened: now, count: 0 };
        }

        if window.count >= settings.max_requests {
            let retry_after = window_len.saturating_sub(now.saturating_duration_since(window.opened));
            return RateDecision::Limited { retry_after };
        }

        window.count += 1;
        RateDecision::Allowed {
            remaining: settings.max_requests - window.count,
        }
    }

    /// Evict windows that have expired. Returns the number removed.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    fn sweep_at(&self, now: Instant) -> usize {
        let window_len = Duration::from_secs(self.settings.load().window_secs);
        let before = self.windows.len();
        self.windows
            .retain(|_, w| now.saturating_duration_since(w.opened) < window_len);
        before.saturating_sub(self.windows.len())
    }

    /// Number of clients with a live window.
    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }

    /// Delay between sweeps, never under one second.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.settings.load().sweep_interval_secs.max(1))
    }

    /// Run `sweep` until shutdown. The interval is re-read after every
    /// sweep so a reloaded value applies from the next tick.
    pub fn spawn_sweeper(
        self: &Arc<Self>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> tokio::task::JoinHandle<()> {
        let limiter = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = tokio::time::sleep(limiter.sweep_interval()) => {
                        let removed = limiter.sweep();
                        let tracked = limiter.tracked_clients();
                        metrics::record_tracked_clients(tracked);
                        if removed > 0 {
                            tracing::debug!(removed, tracked, "Swept expired rate-limit windows");
                        }
                    }
                    _ = shutdown.recv() => {
                        tracing::debug!("Rate-limit sweeper stopping");
                        break;
                    }
                }
            }
        })
    }
}

/// Resolve the client address, preferring proxy headers when trusted.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>, trust_forwarded: bool) -> Option<IpAddr> {
    if trust_forwarded {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|ip| ip.trim().parse().ok());
        if forwarded.is_some() {
            return forwarded;
        }
        let real_ip = headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .and_then(|ip| ip.trim().parse().ok());
        if real_ip.is_some() {
            return real_ip;
        }
    }
    peer.map(|addr| addr.ip())
}

/// Middleware for the lead submission route.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<FixedWindowLimiter>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let settings = limiter.settings();
    if !settings.enabled {
        return next.run(request).await;
    }

    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let Some(ip) = client_ip(request.headers(), peer, settings.trust_forwarded_headers) else {
        tracing::warn!("Could not determine client address; skipping rate limit");
        return next.run(request).await;
    };

    match limiter.check(ip) {
        RateDecision::Allowed { remaining } => {
            let mut response = next.run(request).await;
            let headers = response.headers_mut();
            headers.insert(X_RATELIMIT_LIMIT, HeaderValue::from(settings.max_requests));
            headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(remaining));
            response
        }
        RateDecision::Limited { retry_after } => {
            tracing::warn!(client = %ip, retry_after_secs = retry_after.as_secs(), "Rate limit exceeded");
            metrics::record_rate_limited();
            let secs = retry_after.as_secs().max(1);
            let mut response = ApiError::RateLimited { retry_after_secs: secs }.into_response();
            let headers = response.headers_mut();
            headers.insert(header::RETRY_AFTER, HeaderValue::from(secs));
            headers.insert(X_RATELIMIT_LIMIT, HeaderValue::from(settings.max_requests));
            headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(0u32));
            response
        }
    }
}
