use contentful_delivery::{ClientConfig, DeliveryError, Fetcher, HttpFetcher, ResourceKind};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig {
        base_url: Some(server.uri()),
        ..ClientConfig::new("b4c0n73n7fu1", "cfexampleapi")
    }
}

// ── Config ──────────────────────────────────────────────────────

#[test]
fn config_defaults_to_delivery_host() {
    let config = ClientConfig::new("token", "space");
    assert_eq!(config.api_base_url(), "https://cdn.contentful.com");
    assert_eq!(config.timeout_secs, 30);
    assert!(!config.preview);
}

#[test]
fn preview_config_uses_preview_host() {
    let config = ClientConfig {
        preview: true,
        ..ClientConfig::new("token", "space")
    };
    assert_eq!(config.api_base_url(), "https://preview.contentful.com");
}

#[test]
fn config_serde_roundtrip() {
    let config = ClientConfig {
        default_locale: Some("tlh".into()),
        ..ClientConfig::new("token", "space")
    };
    let json = serde_json::to_string(&config).unwrap();
    let back: ClientConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}

#[test]
fn empty_space_id_is_config_error() {
    let err = HttpFetcher::new(&ClientConfig::new("token", "")).err().unwrap();
    assert!(matches!(err, DeliveryError::Config(_)));
}

// ── Requests ────────────────────────────────────────────────────

#[tokio::test]
async fn get_entry_by_id_with_locale_and_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/spaces/cfexampleapi/entries/nyancat"))
        .and(query_param("locale", "tlh"))
        .and(header("authorization", "Bearer b4c0n73n7fu1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sys": { "type": "Entry", "id": "nyancat" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(&config_for(&server)).unwrap();
    let raw = fetcher
        .get_by_id(ResourceKind::Entry, "nyancat", Some("tlh"))
        .await
        .unwrap();
    assert_eq!(raw["sys"]["id"], "nyancat");
}

#[tokio::test]
async fn get_space_hits_space_root() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/spaces/cfexampleapi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sys": { "type": "Space", "id": "cfexampleapi" }
        })))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(&config_for(&server)).unwrap();
    let raw = fetcher
        .get_by_id(ResourceKind::Space, "cfexampleapi", None)
        .await
        .unwrap();
    assert_eq!(raw["sys"]["type"], "Space");
}

#[tokio::test]
async fn collection_passes_query_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/spaces/cfexampleapi/assets"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sys": { "type": "Array" }, "items": [], "total": 0, "skip": 0, "limit": 5
        })))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(&config_for(&server)).unwrap();
    let raw = fetcher
        .get_collection(ResourceKind::Asset, &[("limit".into(), "5".into())])
        .await
        .unwrap();
    assert_eq!(raw["limit"], 5);
}

#[tokio::test]
async fn sync_endpoint_is_under_space() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/spaces/cfexampleapi/sync"))
        .and(query_param("initial", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sys": { "type": "Array" }, "items": [],
            "nextSyncUrl": "https://cdn.contentful.com/spaces/cfexampleapi/sync?sync_token=abc"
        })))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(&config_for(&server)).unwrap();
    let raw = fetcher
        .get_sync(&[("initial".into(), "true".into())])
        .await
        .unwrap();
    assert!(raw["nextSyncUrl"].is_string());
}

// ── Error mapping ───────────────────────────────────────────────

#[tokio::test]
async fn not_found_envelope_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/spaces/cfexampleapi/entries/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "sys": { "type": "Error", "id": "NotFound" },
            "message": "The resource could not be found."
        })))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(&config_for(&server)).unwrap();
    let err = fetcher
        .get_by_id(ResourceKind::Entry, "ghost", None)
        .await
        .unwrap_err();
    assert!(matches!(err, DeliveryError::NotFound(ref m) if m.contains("could not be found")));
}

#[tokio::test]
async fn invalid_query_envelope_maps_to_invalid_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/spaces/cfexampleapi/entries"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "sys": { "type": "Error", "id": "InvalidQuery" },
            "message": "The query you sent was invalid."
        })))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(&config_for(&server)).unwrap();
    let err = fetcher
        .get_collection(ResourceKind::Entry, &[])
        .await
        .unwrap_err();
    assert!(matches!(err, DeliveryError::InvalidQuery(_)));
}

#[tokio::test]
async fn rate_limit_reads_reset_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/spaces/cfexampleapi/assets"))
        .respond_with(
            ResponseTemplate::new(429).insert_header("X-Contentful-RateLimit-Reset", "7"),
        )
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(&config_for(&server)).unwrap();
    let err = fetcher
        .get_collection(ResourceKind::Asset, &[])
        .await
        .unwrap_err();

    assert!(err.is_rate_limited());
    assert_eq!(err.retry_after(), Some(std::time::Duration::from_secs(7)));
}

#[tokio::test]
async fn unknown_error_envelope_keeps_status_and_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/spaces/cfexampleapi/content_types"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "sys": { "type": "Error", "id": "AccessTokenInvalid" },
            "message": "The access token you sent could not be found or is invalid."
        })))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(&config_for(&server)).unwrap();
    let err = fetcher
        .get_collection(ResourceKind::ContentType, &[])
        .await
        .unwrap_err();
    match err {
        DeliveryError::Api { status, id, .. } => {
            assert_eq!(status, 401);
            assert_eq!(id, "AccessTokenInvalid");
        }
        other => panic!("unexpected error: {other}"),
    }
}
