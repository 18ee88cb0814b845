use axum::Router;

use feed_application::AppState;

use crate::handlers::{event_handlers, ops_handlers, stream_handlers};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/events",
            axum::routing::get(event_handlers::list_events),
        )
        .route("/v1/sse", axum::routing::get(stream_handlers::stream_feed))
        .route(
            "/v1/ops/health/live",
            axum::routing::get(ops_handlers::health_live),
        )
        .route(
            "/v1/ops/health/ready",
            axum::routing::get(ops_handlers::health_ready),
        )
        .route(
            "/v1/ops/metrics/prometheus",
            axum::routing::get(ops_handlers::metrics_prometheus),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use feed_domain::{
        tag_codec, EventIndex, FlatRecord, NameLookup, Page, RuntimeConfig, SearchHits,
    };

    use super::*;

    struct OneHitIndex;

    #[async_trait]
    impl EventIndex for OneHitIndex {
        async fn ensure_index(&self) -> anyhow::Result<()> {
            Ok(())
        }

        async fn insert_records(&self, _records: &[(String, FlatRecord)]) -> anyhow::Result<()> {
            Ok(())
        }

        async fn search(&self, _query: &str, _page: Page) -> anyhow::Result<SearchHits> {
            Ok(SearchHits {
                total: 1,
                hits: vec![vec![
                    ("id".to_string(), tag_codec::encode("abc-123")),
                    ("etype".to_string(), "1".to_string()),
                    ("category".to_string(), "0".to_string()),
                    ("etimestamp".to_string(), "1577836800".to_string()),
                    ("playerNames".to_string(), tag_codec::encode("Test Player")),
                ]],
                skipped: 0,
            })
        }

        async fn ping(&self) -> anyhow::Result<()> {
            anyhow::bail!("index offline")
        }
    }

    struct NoNames;

    #[async_trait]
    impl NameLookup for NoNames {
        async fn player_name(&self, player_id: &str) -> anyhow::Result<String> {
            anyhow::bail!("unknown player {player_id}")
        }

        async fn team_name(&self, team_id: &str) -> anyhow::Result<String> {
            anyhow::bail!("unknown team {team_id}")
        }
    }

    fn router(api_token: Option<&str>) -> Router {
        let config = RuntimeConfig {
            bind_addr: "127.0.0.1:0".to_string(),
            api_token: api_token.map(str::to_string),
            feed_url: "http://feed.invalid/events".to_string(),
            feed_page_limit: 100,
            poll_interval_ms: 1000,
            poller_enabled: false,
            players_url: "http://names.invalid/players".to_string(),
            team_url: "http://names.invalid/team".to_string(),
            name_cache_capacity: 16,
            upstream_timeout_seconds: 1,
            request_timeout_seconds: 1,
        };
        build_router(AppState::new(config, Arc::new(OneHitIndex), Arc::new(NoNames)))
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).expect("request")
    }

    #[tokio::test]
    async fn events_endpoint_returns_decoded_events() {
        let response = router(None)
            .oneshot(get("/v1/events?type=1&after=1000"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let events: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(events[0]["id"], "abc-123");
        assert_eq!(events[0]["type"], 1);
        assert_eq!(events[0]["created"], "2020-01-01T00:00:00Z");
        assert_eq!(events[0]["playerNames"], serde_json::json!(["Test Player"]));
        assert_eq!(events[0]["gameTags"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn token_guards_events_and_stream() {
        let app = router(Some("secret"));
        for uri in ["/v1/events", "/v1/sse"] {
            let response = app.clone().oneshot(get(uri)).await.expect("response");
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
        }

        let authorized = Request::builder()
            .uri("/v1/events")
            .header(header::AUTHORIZATION, "Bearer secret")
            .body(Body::empty())
            .expect("request");
        let response = app.oneshot(authorized).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn stream_endpoint_speaks_event_stream() {
        let response = router(None).oneshot(get("/v1/sse")).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).expect("content type"),
            "text/event-stream"
        );
    }

    #[tokio::test]
    async fn ops_endpoints() {
        let app = router(None);
        let live = app.clone().oneshot(get("/v1/ops/health/live")).await.expect("live");
        assert_eq!(live.status(), StatusCode::OK);

        let ready = app.clone().oneshot(get("/v1/ops/health/ready")).await.expect("ready");
        assert_eq!(ready.status(), StatusCode::SERVICE_UNAVAILABLE);

        let metrics = app
            .oneshot(get("/v1/ops/metrics/prometheus"))
            .await
            .expect("metrics");
        let body = to_bytes(metrics.into_body(), usize::MAX).await.expect("body");
        let text = String::from_utf8_lossy(&body);
        assert!(text.contains("feed_indexer_searches_total 0"));
    }
}
