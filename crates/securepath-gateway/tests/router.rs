#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::{Arc, Mutex};
use std::thread::ThreadId;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use securepath_core::monitor::{MemoryUsage, MetricsAggregator, NullProbe, ProcessProbe};
use securepath_gateway::{app_state::AppState, config, router::build_router};

fn app(yaml: &str) -> (Router, Arc<MetricsAggregator>) {
    let cfg = config::load_from_str(yaml).unwrap();
    let aggregator = Arc::new(MetricsAggregator::with_probe(Box::new(NullProbe)));
    let state = AppState::with_aggregator(cfg, Arc::clone(&aggregator));
    (build_router(state), aggregator)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn from_ip(method: Method, uri: &str, ip: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("x-forwarded-for", ip)
        .body(Body::empty())
        .unwrap()
}

async fn json_body(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn root_and_health_are_counted() {
    let (app, agg) = app("version: 1\n");

    let resp = app.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["name"], "SecurePath_UK");
    assert_eq!(body["status"], "operational");

    let resp = app.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["status"], "healthy");

    let r = agg.snapshot().requests;
    assert_eq!(r.total, 2);
    assert_eq!(r.successful, 2);
}

#[tokio::test]
async fn unknown_path_is_json_404_and_failed() {
    let (app, agg) = app("version: 1\n");

    let resp = app.oneshot(get("/nope")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = json_body(resp).await;
    assert_eq!(body["error"], "Not Found");
    assert_eq!(body["path"], "/nope");
    assert!(body["timestamp"].is_string());

    let r = agg.snapshot().requests;
    assert_eq!(r.total, 1);
    assert_eq!(r.failed, 1);
}

#[tokio::test]
async fn suspicious_paths_become_security_events() {
    let (app, agg) = app("version: 1\napp:\n  trust_forwarded_for: true\n");

    for uri in ["/wp-login", "/index.php", "/static/../etc/passwd"] {
        app.clone()
            .oneshot(from_ip(Method::GET, uri, "198.51.100.23"))
            .await
            .unwrap();
    }
    app.clone().oneshot(get("/health")).await.unwrap();

    let s = agg.snapshot().security;
    assert_eq!(s.suspicious_requests, 3);
    assert_eq!(s.suspicious_ips.get("198.51.100.23"), Some(&3));
}

#[tokio::test]
async fn security_report_endpoint() {
    let (app, _agg) = app("version: 1\n");

    let resp = app.oneshot(get("/api/security-report")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["summary"]["status"], "SECURE");
    // The report request itself is recorded only after it completes.
    assert_eq!(body["summary"]["totalRequests"], 0);
    assert_eq!(body["summary"]["successRate"], "0.00");
    assert_eq!(body["recommendations"][0]["severity"], "INFO");
}

#[tokio::test]
async fn login_posts_are_login_attempts() {
    let (app, agg) = app("version: 1\n");

    // No handler is mounted on the login path, so the attempt fails with 404.
    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(req).await.unwrap();
    app.clone().oneshot(get("/api/auth/login")).await.unwrap();

    let s = agg.snapshot().security;
    assert_eq!(s.login_attempts, 1);
    assert_eq!(s.login_successes, 0);
}

#[tokio::test]
async fn rate_limit_rejects_and_is_counted() {
    let yaml = "version: 1\napp:\n  trust_forwarded_for: true\nrate_limit:\n  max_requests: 2\n  window_secs: 3600\n";
    let (app, agg) = app(yaml);

    for _ in 0..2 {
        let resp = app.clone().oneshot(from_ip(Method::GET, "/", "192.0.2.10")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = app.clone().oneshot(from_ip(Method::GET, "/", "192.0.2.10")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(resp.headers().get(header::RETRY_AFTER).is_some());
    assert_eq!(json_body(resp).await["error"], "Too many requests");

    // Another client still has its own bucket.
    let resp = app.clone().oneshot(from_ip(Method::GET, "/", "192.0.2.11")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let r = agg.snapshot().requests;
    assert_eq!(r.total, 4);
    assert_eq!(r.rate_limited, 1);
    assert_eq!(r.failed, 1);
}

#[tokio::test]
async fn metrics_endpoint_renders_prometheus_text() {
    let (app, _agg) = app("version: 1\n");
    app.clone().oneshot(get("/")).await.unwrap();

    let resp = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("securepath_requests_total 1\n"));
}

#[tokio::test]
async fn disabled_monitoring_counts_nothing() {
    let (app, agg) = app("version: 1\nmonitoring:\n  enabled: false\n");
    app.oneshot(get("/")).await.unwrap();
    assert_eq!(agg.snapshot().requests.total, 0);
}

#[tokio::test]
async fn forged_forwarded_hops_share_one_bucket() {
    let yaml = "version: 1\napp:\n  trust_forwarded_for: true\nrate_limit:\n  max_requests: 2\n  window_secs: 3600\n";
    let (app, agg) = app(yaml);

    let mut rejected = 0;
    for i in 0..20 {
        let xff = format!("10.9.9.{i}, 203.0.113.5");
        let resp = app.clone().oneshot(from_ip(Method::GET, "/", &xff)).await.unwrap();
        if resp.status() == StatusCode::TOO_MANY_REQUESTS {
            rejected += 1;
        }
    }

    assert_eq!(rejected, 18);
    assert_eq!(agg.snapshot().requests.rate_limited, 18);
}

#[tokio::test]
async fn auth_tier_limits_login_brute_force() {
    let (app, agg) = app("version: 1\napp:\n  trust_forwarded_for: true\n");

    let mut statuses = Vec::new();
    for _ in 0..7 {
        let resp = app
            .clone()
            .oneshot(from_ip(Method::POST, "/api/auth/login", "198.51.100.40"))
            .await
            .unwrap();
        statuses.push(resp.status());
    }

    // Default `/api/auth/` tier: 5 per 15 minutes.
    assert!(statuses[..5].iter().all(|s| *s == StatusCode::NOT_FOUND));
    assert!(statuses[5..].iter().all(|s| *s == StatusCode::TOO_MANY_REQUESTS));

    // The general limit is untouched by the rejected attempts.
    let resp = app.clone().oneshot(from_ip(Method::GET, "/", "198.51.100.40")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let s = agg.snapshot();
    assert_eq!(s.security.login_attempts, 7);
    assert_eq!(s.requests.rate_limited, 2);
}

#[tokio::test]
async fn api_tier_is_scoped_to_its_prefix() {
    let yaml = r#"
version: 1
app:
  trust_forwarded_for: true
rate_limit:
  tiers:
    - { prefix: "/api/", max_requests: 1, window_secs: 60 }
"#;
    let (app, _agg) = app(yaml);

    let first = app.clone().oneshot(from_ip(Method::GET, "/api/security-report", "192.0.2.77")).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let second = app.clone().oneshot(from_ip(Method::GET, "/api/security-report", "192.0.2.77")).await.unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);

    let other = app.clone().oneshot(from_ip(Method::GET, "/health", "192.0.2.77")).await.unwrap();
    assert_eq!(other.status(), StatusCode::OK);
}

/// Records the thread each memory sample is taken on.
struct ThreadRecorder(Arc<Mutex<Vec<ThreadId>>>);

impl ProcessProbe for ThreadRecorder {
    fn memory(&self) -> MemoryUsage {
        self.0.lock().unwrap().push(std::thread::current().id());
        MemoryUsage::default()
    }
}

#[tokio::test]
async fn report_and_metrics_sample_off_the_request_thread() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let cfg = config::load_from_str("version: 1\n").unwrap();
    let aggregator = Arc::new(MetricsAggregator::with_probe(Box::new(ThreadRecorder(Arc::clone(&seen)))));
    let app = build_router(AppState::with_aggregator(cfg, aggregator));

    for uri in ["/api/security-report", "/metrics"] {
        let resp = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "uri={uri}");
    }

    // #[tokio::test] drives handlers on this thread; samples must come from the blocking pool.
    let here = std::thread::current().id();
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert!(seen.iter().all(|id| *id != here));
}
