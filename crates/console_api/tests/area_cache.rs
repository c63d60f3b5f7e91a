use std::sync::Arc;
use std::time::Duration;

use console_api::{
    find_area_by_path, AreaDataCache, Endpoints, FailureKind, ReqwestTransport, Transport,
    TransportSettings,
};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const AREA_PATH: &str = "/public/area/area.json";

fn area_body() -> serde_json::Value {
    json!([
        {
            "value": "11", "label": "Beijing", "level": "1", "parent": "0",
            "children": [
                {
                    "value": "1101", "label": "Beijing City", "level": "2", "parent": "11",
                    "children": [
                        {"value": "110101", "label": "Dongcheng", "level": "3", "parent": "1101"}
                    ]
                }
            ]
        },
        {"value": "12", "label": "Tianjin", "level": "1", "parent": "0"}
    ])
}

fn cache_for(server: &MockServer) -> AreaDataCache {
    console_logging::initialize_for_tests();
    let transport: Arc<dyn Transport> =
        Arc::new(ReqwestTransport::new(TransportSettings::default()).expect("client"));
    AreaDataCache::new(transport, &Endpoints::new(server.uri()))
}

async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or_default()
}

#[tokio::test]
async fn concurrent_callers_share_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(AREA_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(100))
                .set_body_json(area_body()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let cache = cache_for(&server);
    let (first, second) = tokio::join!(cache.get_area_data(), cache.get_area_data());
    let first = first.expect("first caller");
    let second = second.expect("second caller");

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.len(), 2);
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn cached_tree_is_served_without_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(AREA_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(area_body()))
        .expect(1)
        .mount(&server)
        .await;

    let cache = cache_for(&server);
    assert!(cache.cached().is_none());

    let loaded = cache.get_area_data().await.expect("load");
    let again = cache.get_area_data().await.expect("cached");
    assert!(Arc::ptr_eq(&loaded, &again));

    let peeked = cache.cached().expect("cached tree");
    let path = find_area_by_path(&peeked, &["11", "1101", "999"]);
    let codes: Vec<_> = path.into_iter().map(|item| item.value.as_str()).collect();
    assert_eq!(codes, vec!["11", "1101"]);
}

#[tokio::test]
async fn clones_share_the_same_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(AREA_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(area_body()))
        .expect(1)
        .mount(&server)
        .await;

    let cache = cache_for(&server);
    let other = cache.clone();
    cache.get_area_data().await.expect("load");
    assert!(other.cached().is_some());
    other.get_area_data().await.expect("cached");
}

#[tokio::test]
async fn failed_load_is_shared_then_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(AREA_PATH))
        .respond_with(ResponseTemplate::new(503).set_delay(Duration::from_millis(50)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(AREA_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(area_body()))
        .mount(&server)
        .await;

    let cache = cache_for(&server);
    let (first, second) = tokio::join!(cache.get_area_data(), cache.get_area_data());
    assert_eq!(first.unwrap_err().kind, FailureKind::HttpStatus(503));
    assert_eq!(second.unwrap_err().kind, FailureKind::HttpStatus(503));
    assert_eq!(request_count(&server).await, 1);
    assert!(cache.cached().is_none());

    let tree = cache.get_area_data().await.expect("retry succeeds");
    assert_eq!(tree[1].label, "Tianjin");
    assert_eq!(request_count(&server).await, 2);
}

#[tokio::test]
async fn clear_forces_a_fresh_load() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(AREA_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(area_body()))
        .expect(2)
        .mount(&server)
        .await;

    let cache = cache_for(&server);
    let before = cache.get_area_data().await.expect("first load");
    cache.clear_area_data_cache();
    assert!(cache.cached().is_none());

    let after = cache.get_area_data().await.expect("reload");
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(*before, *after);
    assert_eq!(request_count(&server).await, 2);
}

#[tokio::test]
async fn load_started_before_clear_does_not_repopulate() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(AREA_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(150))
                .set_body_json(area_body()),
        )
        .mount(&server)
        .await;

    let cache = cache_for(&server);
    let in_flight = {
        let cache = cache.clone();
        tokio::spawn(async move { cache.get_area_data().await })
    };
    tokio::time::sleep(Duration::from_millis(30)).await;
    cache.clear_area_data_cache();

    let stale = in_flight.await.expect("task").expect("load");
    assert_eq!(stale.len(), 2);
    assert!(cache.cached().is_none());
}

#[tokio::test]
async fn malformed_dataset_is_a_decode_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(AREA_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
        .mount(&server)
        .await;

    let cache = cache_for(&server);
    let err = cache.get_area_data().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
    assert!(cache.cached().is_none());
}
