//! Paginated search against the mock market

use std::collections::HashSet;

use serde_json::json;
use steam_pricehistory::steam::{SearchClient, SEARCH_PATH};
use steam_pricehistory::Error;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common;

async fn mount_page(server: &MockServer, start: usize, names: &[String], total: usize, hits: u64) {
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("start", start.to_string().as_str()))
        .and(query_param("count", "100"))
        .and(query_param("norender", "1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(common::search_page(start, names, total)),
        )
        .expect(hits)
        .mount(server)
        .await;
}

#[tokio::test]
async fn single_page() {
    let server = MockServer::start().await;
    let names = common::item_names("Case", 0..40);

    mount_page(&server, 0, &names, 40, 1).await;

    let client = SearchClient::new(common::requester(&server));
    let found = client.search(730, "case").await.unwrap();

    assert_eq!(found, names);
}

#[tokio::test]
async fn two_pages_for_150_results() {
    let server = MockServer::start().await;
    let names = common::item_names("Capsule", 0..150);

    mount_page(&server, 0, &names[..100], 150, 1).await;
    mount_page(&server, 100, &names[100..], 150, 1).await;

    let client = SearchClient::new(common::requester(&server));
    let found = client.search(730, "test").await.unwrap();

    assert_eq!(found.len(), 150);
    assert_eq!(found.iter().collect::<HashSet<_>>().len(), 150);
    assert_eq!(found, names);
}

#[tokio::test]
async fn exact_multiple_of_page_size() {
    let server = MockServer::start().await;
    let names = common::item_names("Sticker", 0..200);

    mount_page(&server, 0, &names[..100], 200, 1).await;
    mount_page(&server, 100, &names[100..], 200, 1).await;
    mount_page(&server, 200, &[], 200, 0).await;

    let client = SearchClient::new(common::requester(&server));
    let found = client.search(730, "sticker").await.unwrap();

    assert_eq!(found.len(), 200);
}

#[tokio::test]
async fn no_results() {
    let server = MockServer::start().await;

    mount_page(&server, 0, &[], 0, 1).await;

    let client = SearchClient::new(common::requester(&server));
    assert!(client.search(730, "nothing").await.unwrap().is_empty());
}

#[tokio::test]
async fn duplicates_across_pages_are_dropped() {
    let server = MockServer::start().await;
    let first = common::item_names("Case", 0..100);
    let mut second = common::item_names("Case", 100..120);
    // catalog shifted by one between the two requests
    second.insert(0, first[99].clone());

    mount_page(&server, 0, &first, 120, 1).await;
    mount_page(&server, 100, &second, 120, 1).await;

    let client = SearchClient::new(common::requester(&server));
    let found = client.search(730, "case").await.unwrap();

    assert_eq!(found.len(), 120);
    assert_eq!(found.iter().collect::<HashSet<_>>().len(), 120);
}

#[tokio::test]
async fn smaller_page_size() {
    let server = MockServer::start().await;
    let names = common::item_names("Key", 0..5);

    for (page, chunk) in names.chunks(2).enumerate() {
        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .and(query_param("start", (page * 2).to_string().as_str()))
            .and(query_param("count", "2"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(common::search_page(page * 2, chunk, 5)),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = SearchClient::with_page_size(common::requester(&server), 2);
    let found = client.search(730, "key").await.unwrap();

    assert_eq!(found, names);
}

#[tokio::test]
async fn failed_page_aborts_search() {
    let server = MockServer::start().await;
    let names = common::item_names("Case", 0..100);

    mount_page(&server, 0, &names, 150, 1).await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("start", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "results": [{ "hash_name": "should not leak" }],
            "total_count": 150
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = SearchClient::new(common::requester(&server));
    let err = client.search(730, "case").await.unwrap_err();

    match err {
        Error::SearchRequestFailed { payload } => {
            assert_eq!(payload, json!({ "success": false, "total_count": 150 }));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test]
async fn unreachable_page_aborts_search() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(502))
        .expect(4)
        .mount(&server)
        .await;

    let client = SearchClient::new(common::requester(&server));
    let err = client.search(730, "case").await.unwrap_err();

    assert!(matches!(err, Error::UnreachableEndpoint { .. }));
}
