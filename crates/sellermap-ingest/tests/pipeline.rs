//! Integration tests for `SellerPipeline::run`: cache hits, misses, forced
//! refresh, and the no-write-on-failure rule.

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sellermap_ingest::{
    fingerprint, BatchOrigin, CacheStore, IngestError, SellerApiClient, SellerPipeline,
    SellerQuery, WaitPolicy,
};

fn pipeline(server: &MockServer, dir: &TempDir) -> SellerPipeline {
    let client = SellerApiClient::new(
        &format!("{}/search", server.uri()),
        "test-token",
        5,
        "sellermap-test/0.1",
        false,
    )
    .expect("failed to build test SellerApiClient");
    SellerPipeline::new(client, CacheStore::new(dir.path().join("api_cache.json")))
        .with_wait(WaitPolicy::none())
}

fn query() -> SellerQuery {
    SellerQuery::new(
        vec!["นครนายก".to_string()],
        vec!["500040001".to_string()],
        20,
    )
}

fn single_page(ids: &[i64]) -> serde_json::Value {
    let records: Vec<_> = ids
        .iter()
        .map(|id| json!({"id": id, "nameTh": format!("ที่พัก {id}"), "location": null}))
        .collect();
    json!({
        "success": true,
        "data": {"data": records, "totalPages": 1, "totalItems": ids.len(), "hasNextPage": false}
    })
}

async fn mount_single_page(server: &MockServer, ids: &[i64], expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(single_page(ids)))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn miss_fetches_and_writes_cache() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_single_page(&server, &[1, 2], 1).await;

    let pipeline = pipeline(&server, &dir);
    let batch = pipeline
        .run(&query(), "accommodation")
        .await
        .unwrap()
        .expect("fetch should produce a batch");

    assert_eq!(batch.origin, BatchOrigin::Remote);
    assert_eq!(batch.sellers.len(), 2);
    assert_eq!(batch.fingerprint, fingerprint(&query()));

    let table = pipeline.cache().load();
    let entry = table.get(&batch.fingerprint).expect("entry written");
    assert_eq!(entry.all_sellers_info, batch.sellers);
    assert_eq!(entry.pagination.total_sellers, 2);
}

#[tokio::test]
async fn hit_skips_network_entirely() {
    let dir = TempDir::new().unwrap();

    let first = MockServer::start().await;
    mount_single_page(&first, &[1, 2, 3], 1).await;
    pipeline(&first, &dir)
        .run(&query(), "accommodation")
        .await
        .unwrap()
        .unwrap();

    let second = MockServer::start().await;
    mount_single_page(&second, &[99], 0).await;

    // Same filters in a different order still hit.
    let reordered = SellerQuery::new(
        vec!["นครนายก".to_string(), "นครนายก".to_string()],
        vec![" 500040001".to_string()],
        20,
    );
    let batch = pipeline(&second, &dir)
        .run(&reordered, "accommodation")
        .await
        .unwrap()
        .expect("cached batch");

    assert_eq!(batch.origin, BatchOrigin::Cache);
    assert_eq!(batch.sellers.len(), 3);
    assert_eq!(batch.pagination.pages_fetched, 1);
}

#[tokio::test]
async fn transport_failure_yields_none_and_leaves_cache_untouched() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_partial_json(json!({"page": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"data": [{"id": 1}], "totalPages": 2, "totalItems": 2, "hasNextPage": true}
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_partial_json(json!({"page": 2})))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let pipeline = pipeline(&server, &dir);
    let result = pipeline.run(&query(), "accommodation").await.unwrap();

    assert!(result.is_none(), "aborted fetch must yield no batch");
    assert!(
        !pipeline.cache().path().exists(),
        "aborted fetch must not create the cache file"
    );
}

#[tokio::test]
async fn failure_does_not_replace_existing_entry() {
    let dir = TempDir::new().unwrap();

    let good = MockServer::start().await;
    mount_single_page(&good, &[1], 1).await;
    pipeline(&good, &dir)
        .run(&query(), "accommodation")
        .await
        .unwrap()
        .unwrap();

    let bad = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(1)
        .mount(&bad)
        .await;

    let pipeline = pipeline(&bad, &dir).with_refresh(true);
    assert!(pipeline.run(&query(), "accommodation").await.unwrap().is_none());

    let table = pipeline.cache().load();
    let entry = table.get(&fingerprint(&query())).expect("old entry kept");
    assert_eq!(entry.all_sellers_info.len(), 1);
}

#[tokio::test]
async fn refresh_replaces_entry_wholesale() {
    let dir = TempDir::new().unwrap();

    let first = MockServer::start().await;
    mount_single_page(&first, &[1, 2, 3], 1).await;
    pipeline(&first, &dir)
        .run(&query(), "accommodation")
        .await
        .unwrap()
        .unwrap();

    let second = MockServer::start().await;
    mount_single_page(&second, &[7], 1).await;
    let batch = pipeline(&second, &dir)
        .with_refresh(true)
        .run(&query(), "accommodation")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(batch.origin, BatchOrigin::Remote);
    assert_eq!(batch.sellers.len(), 1);

    let table = CacheStore::new(dir.path().join("api_cache.json")).load();
    let entry = table.get(&fingerprint(&query())).unwrap();
    assert_eq!(entry.all_sellers_info.len(), 1);
    assert_eq!(entry.all_sellers_info[0].id.as_deref(), Some("7"));
}

#[tokio::test]
async fn corrupt_cache_is_a_miss() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("api_cache.json"), b"\x00garbage").unwrap();
    mount_single_page(&server, &[4], 1).await;

    let batch = pipeline(&server, &dir)
        .run(&query(), "accommodation")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(batch.origin, BatchOrigin::Remote);
    assert_eq!(batch.sellers.len(), 1);
}

#[tokio::test]
async fn distinct_filters_get_distinct_entries() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_single_page(&server, &[1], 2).await;

    let pipeline = pipeline(&server, &dir);
    let other = SellerQuery::new(vec![], vec!["50001".to_string()], 20);
    pipeline.run(&query(), "accommodation").await.unwrap().unwrap();
    pipeline.run(&other, "restaurant").await.unwrap().unwrap();

    assert_eq!(pipeline.cache().load().len(), 2);
}

#[tokio::test]
async fn invalid_query_is_an_error_not_none() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_single_page(&server, &[1], 0).await;

    let err = pipeline(&server, &dir)
        .run(&SellerQuery::new(vec![], vec![], 20), "accommodation")
        .await
        .unwrap_err();

    assert!(matches!(err, IngestError::InvalidQuery { .. }));
}
