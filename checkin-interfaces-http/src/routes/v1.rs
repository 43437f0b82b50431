use axum::routing::{get, post};
use axum::Router;

use checkin_application::AppState;

use crate::handlers::{check_in_handlers, ops_handlers, scan_handlers};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/scans", post(scan_handlers::submit_scan))
        .route(
            "/v1/scans/acknowledge",
            post(scan_handlers::acknowledge_scan),
        )
        .route(
            "/v1/check-ins/recent",
            get(check_in_handlers::list_recent_check_ins),
        )
        .route("/v1/session", get(check_in_handlers::get_session))
        .route("/v1/ops/health/live", get(ops_handlers::health_live))
        .route(
            "/v1/ops/metrics/prometheus",
            get(ops_handlers::metrics_prometheus),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use checkin_application::{AttendanceLog, CheckInResolver, Metrics, ScanSession};
    use checkin_domain::{
        CheckInConfirmation, CheckInError, CheckInRequest, CheckInService, EntranceId,
        EntranceRef, EventId, EventRef, RejectionBody, RuntimeConfig, ScanContext,
    };
    use checkin_infrastructure::{MemoryStore, StaticCredentialProvider};

    /// Confirms every badge except `SEEN`, which is already checked in.
    struct FrontDesk;

    #[async_trait]
    impl CheckInService for FrontDesk {
        async fn check_in(
            &self,
            request: &CheckInRequest,
            _token: &str,
        ) -> Result<CheckInConfirmation, CheckInError> {
            if request.badge_id.as_str() == "SEEN" {
                return Err(CheckInError::Rejected {
                    status: 409,
                    body: RejectionBody {
                        message: Some("Attendee already checked in".to_string()),
                        previous_entrance: Some("North Gate".to_string()),
                        ..RejectionBody::default()
                    },
                });
            }
            Ok(CheckInConfirmation {
                name: Some("A. Lee".to_string()),
                check_in_time: Some("2026-10-16T09:00:00.000Z".to_string()),
                ..CheckInConfirmation::default()
            })
        }
    }

    fn state(station_token: Option<&str>) -> AppState {
        let store = Arc::new(MemoryStore::new());
        let metrics = Arc::new(Metrics::default());
        let attendance = Arc::new(AttendanceLog::new(store));
        let resolver = Arc::new(CheckInResolver::new(
            Arc::new(FrontDesk),
            Arc::new(StaticCredentialProvider::new(Some("tok-123".to_string()))),
            attendance.clone(),
            metrics.clone(),
        ));
        let context = ScanContext {
            event: EventRef {
                id: EventId(7),
                name: "Kigali Summit".to_string(),
            },
            entrance: EntranceRef {
                id: EntranceId(3),
                name: "South Gate".to_string(),
                max_capacity: None,
            },
        };
        AppState {
            config: RuntimeConfig {
                bind_addr: "127.0.0.1:0".to_string(),
                api_base_url: "http://127.0.0.1:9".to_string(),
                station_token: station_token.map(ToString::to_string),
                cache_path: String::new(),
                cooldown_ms: 1000,
                request_timeout_seconds: 5,
                offline_fallback: false,
            },
            session: Arc::new(ScanSession::new(
                context,
                resolver,
                Duration::from_millis(1000),
                metrics.clone(),
            )),
            attendance,
            metrics,
        }
    }

    fn scan(raw: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/v1/scans")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "raw": raw }).to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn scan_resolves_new_check_in() {
        let state = state(None);
        let response = build_router(state.clone())
            .oneshot(scan(r#"{"badgeId":"B42"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["disposition"], "resolved");
        assert_eq!(body["outcome"]["outcome"], "new");
        assert_eq!(body["outcome"]["record"]["badgeId"], "B42");
        assert_eq!(body["message"], "Checked in at South Gate");

        let response = build_router(state)
            .oneshot(get_request("/v1/check-ins/recent?limit=5"))
            .await
            .unwrap();
        let recent = json_body(response).await;
        assert_eq!(recent.as_array().map(Vec::len), Some(1));
        assert_eq!(recent[0]["attendeeName"], "A. Lee");
    }

    #[tokio::test]
    async fn repeat_scan_is_suppressed() {
        let state = state(None);
        build_router(state.clone()).oneshot(scan("B42")).await.unwrap();
        let response = build_router(state).oneshot(scan("B42")).await.unwrap();

        let body = json_body(response).await;
        assert_eq!(body, json!({ "disposition": "suppressed" }));
    }

    #[tokio::test]
    async fn duplicate_reports_prior_entrance() {
        let response = build_router(state(None))
            .oneshot(scan("SEEN"))
            .await
            .unwrap();

        let body = json_body(response).await;
        assert_eq!(body["outcome"]["outcome"], "duplicate");
        assert_eq!(body["outcome"]["priorEntrance"], "North Gate");
        assert_eq!(body["message"], "Already checked in at North Gate");
    }

    #[tokio::test]
    async fn acknowledge_releases_deferred_scan() {
        let state = state(None);
        build_router(state.clone()).oneshot(scan("B1")).await.unwrap();
        let deferred = build_router(state.clone())
            .oneshot(scan("B2"))
            .await
            .unwrap();
        assert_eq!(json_body(deferred).await["disposition"], "deferred");

        let acknowledge = || {
            Request::builder()
                .method("POST")
                .uri("/v1/scans/acknowledge")
                .body(Body::empty())
                .unwrap()
        };
        let released = build_router(state.clone())
            .oneshot(acknowledge())
            .await
            .unwrap();
        assert_eq!(released.status(), StatusCode::OK);
        assert_eq!(
            json_body(released).await["outcome"]["record"]["badgeId"],
            "B2"
        );

        let empty = build_router(state).oneshot(acknowledge()).await.unwrap();
        assert_eq!(empty.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn station_token_guards_everything_but_health() {
        let state = state(Some("station-1"));

        let denied = build_router(state.clone())
            .oneshot(get_request("/v1/session"))
            .await
            .unwrap();
        assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(denied).await["error"], "unauthorized");

        let metrics = build_router(state.clone())
            .oneshot(get_request("/v1/ops/metrics/prometheus"))
            .await
            .unwrap();
        assert_eq!(metrics.status(), StatusCode::UNAUTHORIZED);

        let health = build_router(state.clone())
            .oneshot(get_request("/v1/ops/health/live"))
            .await
            .unwrap();
        assert_eq!(health.status(), StatusCode::OK);

        let allowed = build_router(state)
            .oneshot(
                Request::builder()
                    .uri("/v1/session")
                    .header(header::AUTHORIZATION, "Bearer station-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(allowed.status(), StatusCode::OK);
        let body = json_body(allowed).await;
        assert_eq!(body["entrance"]["name"], "South Gate");
        assert_eq!(body["phase"], "idle");
    }

    #[tokio::test]
    async fn oversized_payload_is_bad_request() {
        let raw = "x".repeat(checkin_application::commands::scan_commands::MAX_PAYLOAD_BYTES + 1);
        let response = build_router(state(None)).oneshot(scan(&raw)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["error"]
            .as_str()
            .is_some_and(|message| message.starts_with("bad request")));
    }

    #[tokio::test]
    async fn metrics_count_outcomes() {
        let state = state(None);
        build_router(state.clone()).oneshot(scan("B42")).await.unwrap();
        let response = build_router(state)
            .oneshot(get_request("/v1/ops/metrics/prometheus"))
            .await
            .unwrap();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("checkin_outcomes_total{outcome=\"new\"} 1\n"));
    }
}
