//! HTTP surface tests for the query API.

use arma_api::lifecycle::Shutdown;
use arma_api::HttpServer;
use arma_api::config::ApiConfig;
use axum::http::{header, Request, StatusCode};
use axum::body::Body;
use tokio::net::TcpListener;
use tower::ServiceExt;

mod common;

#[tokio::test]
async fn test_list_all_classes() {
    let response = common::get(common::router(), "/classes").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    assert!(response.headers().contains_key("x-request-id"));

    let body = common::body_text(response).await;
    assert!(body.starts_with("[{") && body.ends_with("}]"));
    assert!(body.contains("}, {"));
    assert_eq!(
        common::classes(&body),
        vec!["ACE_CableTie", "ItemMap", "ace_rifle", "arifle_MX_F"]
    );
}

#[tokio::test]
async fn test_list_mod_filtered_by_type() {
    let response = common::get(common::router(), "/classes/ace?type=Tools").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_text(response).await;
    assert_eq!(common::classes(&body), vec!["ACE_CableTie"]);
}

#[tokio::test]
async fn test_type_filter_spans_mods() {
    let response = common::get(common::router(), "/classes?type=Primaries").await;
    let body = common::body_text(response).await;
    assert_eq!(common::classes(&body), vec!["ace_rifle", "arifle_MX_F"]);
}

#[tokio::test]
async fn test_supported_mod_without_items_is_empty() {
    let response = common::get(common::router(), "/classes/rhs").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(common::body_text(response).await, "[]");
}

#[tokio::test]
async fn test_unknown_mod_is_rejected() {
    let response = common::get(common::router(), "/classes/cup").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = common::body_text(response).await;
    assert!(body.starts_with("Unidentified mod (cup)"), "{body}");
    assert!(body.contains("vanilla"));
}

#[tokio::test]
async fn test_unknown_type_is_rejected() {
    let response = common::get(common::router(), "/classes?type=Rocks").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = common::body_text(response).await;
    assert!(body.starts_with("Unidentified object type (Rocks)"), "{body}");
}

#[tokio::test]
async fn test_sanitized_mod_name_is_accepted() {
    let response = common::get(common::router(), "/classes/ace%24").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_text(response).await;
    assert_eq!(common::classes(&body), vec!["ACE_CableTie", "ace_rifle"]);
}

#[tokio::test]
async fn test_pagination_applies_before_sorting() {
    let response = common::get(common::router(), "/classes?page=1&size=2").await;
    let body = common::body_text(response).await;
    assert_eq!(common::classes(&body), vec!["ItemMap", "arifle_MX_F"]);

    let response = common::get(common::router(), "/classes?page=0&size=1").await;
    let body = common::body_text(response).await;
    assert_eq!(common::classes(&body), vec!["ACE_CableTie"]);
}

#[tokio::test]
async fn test_invalid_page_size_is_rejected() {
    let response = common::get(common::router(), "/classes?size=-2").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_numeric_search_matches_count_or_weight() {
    let response = common::get(common::router(), "/classes/search/5").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_text(response).await;
    assert_eq!(common::classes(&body), vec!["ACE_CableTie", "arifle_MX_F"]);
}

#[tokio::test]
async fn test_text_search() {
    let response = common::get(common::router(), "/classes/search/rifle").await;
    let body = common::body_text(response).await;
    assert_eq!(common::classes(&body), vec!["ace_rifle", "arifle_MX_F"]);

    let response = common::get(common::router(), "/classes/search/rifle?size=1").await;
    let body = common::body_text(response).await;
    assert_eq!(common::classes(&body), vec!["ace_rifle"]);
}

#[tokio::test]
async fn test_client_request_id_is_echoed() {
    let response = common::router()
        .oneshot(
            Request::builder()
                .uri("/classes")
                .header("x-request-id", "test-id-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers().get("x-request-id").unwrap(), "test-id-42");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let response = common::get(common::router(), "/items").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_server_serves_and_shuts_down() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(ApiConfig::default(), common::engine(common::seeded_store()));
    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

    let res = reqwest::get(format!("http://{}/classes/vanilla?type=Maps", addr))
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let body = res.text().await.unwrap();
    assert_eq!(common::classes(&body), vec!["ItemMap"]);

    shutdown.trigger();
    let result = tokio::time::timeout(std::time::Duration::from_secs(5), handle)
        .await
        .unwrap();
    assert!(result.unwrap().is_ok());
}
