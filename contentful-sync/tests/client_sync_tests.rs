use contentful_delivery::{Client, ClientConfig};
use contentful_sync::{SyncError, SyncManager, SyncState};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer, preview: bool) -> ClientConfig {
    ClientConfig {
        base_url: Some(server.uri()),
        preview,
        ..ClientConfig::new("b4c0n73n7fu1", "cfexampleapi")
    }
}

fn sync_url(server: &MockServer, token: &str) -> String {
    format!("{}/spaces/cfexampleapi/sync?sync_token={token}", server.uri())
}

// ── End to end ──────────────────────────────────────────────────

#[tokio::test]
async fn initial_sync_follows_pages_over_http() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/spaces/cfexampleapi/sync"))
        .and(query_param("initial", "true"))
        .and(query_param("type", "Asset"))
        .and(header("authorization", "Bearer b4c0n73n7fu1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sys": { "type": "Array" },
            "items": [
                { "sys": { "type": "Asset", "id": "nyancat", "revision": 1 },
                  "fields": { "title": { "en-US": "Nyan Cat" } } }
            ],
            "nextPageUrl": sync_url(&server, "page2")
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/spaces/cfexampleapi/sync"))
        .and(query_param("sync_token", "page2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sys": { "type": "Array" },
            "items": [
                { "sys": { "type": "DeletedAsset", "id": "happycat", "revision": 3 } }
            ],
            "nextSyncUrl": sync_url(&server, "delta1")
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(config_for(&server, false)).unwrap();
    let manager = SyncManager::from_client(&client);
    let filter = contentful_sync::SyncFilter::new().of_type(contentful_sync::SyncType::Asset);

    let result = manager.start_sync(Some(&filter)).await.unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result.assets().count(), 1);
    assert_eq!(result.deleted().count(), 1);
    let token = result.next_sync_token.clone().unwrap();
    assert_eq!(token.value(), "delta1");
    assert_eq!(manager.state().await, SyncState::Idle(token));
}

#[tokio::test]
async fn preview_client_refuses_resume_without_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/spaces/cfexampleapi/sync"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sys": { "type": "Array" },
            "items": [],
            "nextSyncUrl": sync_url(&server, "delta1")
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(config_for(&server, true)).unwrap();
    let manager = SyncManager::from_client(&client);
    assert!(manager.is_preview());

    let initial = manager.start_sync(None).await.unwrap();
    let err = manager
        .resume_sync(initial.next_sync_token.as_ref().unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::UnsupportedOperation(_)));
}

#[tokio::test]
async fn expired_token_surfaces_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/spaces/cfexampleapi/sync"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "sys": { "type": "Error", "id": "BadRequest" },
            "message": "Invalid sync token"
        })))
        .mount(&server)
        .await;

    let client = Client::new(config_for(&server, false)).unwrap();
    let manager = SyncManager::from_client(&client);
    let err = manager
        .resume_sync(&contentful_sync::SyncToken::new("stale", false))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SyncError::Delivery(contentful_delivery::DeliveryError::InvalidQuery(_))
    ));
    assert_eq!(manager.state().await, SyncState::Initial);
}
