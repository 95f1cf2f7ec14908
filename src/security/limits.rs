//! Request size and concurrency limits.
//!
//! Bodies beyond `security.max_body_size` are refused with 413 Payload Too
//! Large before the JSON extractor buffers them. `listener.max_connections`
//! caps requests in flight across every route.

use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::limit::RequestBodyLimitLayer;

use crate::config::{ListenerConfig, SecurityConfig};

pub fn body_limit_layer(config: &SecurityConfig) -> RequestBodyLimitLayer {
    RequestBodyLimitLayer::new(config.max_body_size)
}

/// One semaphore shared by every service the layer wraps.
///
/// `Router::layer` applies a layer once per route; a plain
/// `ConcurrencyLimitLayer` would hand each route its own budget.
pub fn in_flight_limit_layer(config: &ListenerConfig) -> GlobalConcurrencyLimitLayer {
    GlobalConcurrencyLimitLayer::new(config.max_connections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get, Router};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    #[derive(Default)]
    struct InFlight {
        current: AtomicUsize,
        peak: AtomicUsize,
    }

    impl InFlight {
        async fn hold(&self) -> &'static str {
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            self.current.fetch_sub(1, Ordering::SeqCst);
            "done"
        }
    }

    async fn hold(tracker: Arc<InFlight>) -> &'static str {
        tracker.hold().await
    }

    #[tokio::test]
    async fn test_in_flight_limit_spans_routes() {
        let tracker = Arc::new(InFlight::default());
        let (a, b) = (tracker.clone(), tracker.clone());
        let listener = ListenerConfig {
            max_connections: 1,
            ..Default::default()
        };
        let app = Router::new()
            .route("/a", get(move || hold(a.clone())))
            .route("/b", get(move || hold(b.clone())))
            .layer(in_flight_limit_layer(&listener));

        let request = |uri: &str| Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (ra, rb) = tokio::join!(
            app.clone().oneshot(request("/a")),
            app.clone().oneshot(request("/b")),
        );

        assert!(ra.unwrap().status().is_success());
        assert!(rb.unwrap().status().is_success());
        assert_eq!(tracker.peak.load(Ordering::SeqCst), 1);
    }
}
