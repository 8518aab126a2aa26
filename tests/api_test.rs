use mockito::Matcher;

use pansou::api::{HttpApiClient, SearchApi};
use pansou::api::models::FeedbackRequest;
use pansou::config::Config;
use pansou::error::SearchError;
use pansou::filter::FilterState;
use pansou::query::{QueryDescriptor, build_query};

fn config_for(server: &mockito::ServerGuard) -> Config {
    let mut cfg = Config::default();
    cfg.api_base = server.url();
    cfg
}

fn query() -> QueryDescriptor {
    build_query("盘古", 1, 30, &FilterState::default()).unwrap()
}

#[tokio::test]
async fn search_success_normalizes_missing_fields() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/search")
        .match_query(Matcher::UrlEncoded("keyword".into(), "盘古".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"success"}"#)
        .create_async()
        .await;

    let client = HttpApiClient::new(&config_for(&server)).unwrap();
    let envelope = client.search(&query()).await.unwrap();
    assert!(envelope.results.is_empty());
    assert_eq!(envelope.total, 0);
}

#[tokio::test]
async fn search_parses_result_items() {
    let mut server = mockito::Server::new_async().await;
    let body = r#"{
        "status": "success",
        "results": [
            {"resource_id": "r1", "file_name": "盘古.mkv", "pan_type": 2, "file_size": "1.2GB"}
        ],
        "total": 1
    }"#;
    let _mock = server
        .mock("GET", "/api/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;

    let client = HttpApiClient::new(&config_for(&server)).unwrap();
    let envelope = client.search(&query()).await.unwrap();
    assert_eq!(envelope.total, 1);
    assert_eq!(envelope.results[0].resource_id, "r1");
    assert_eq!(envelope.results[0].pan_type, 2);
}

#[tokio::test]
async fn search_error_status_fails_closed() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"error","message":"后端故障"}"#)
        .create_async()
        .await;

    let client = HttpApiClient::new(&config_for(&server)).unwrap();
    let err = client.search(&query()).await.unwrap_err();
    assert_eq!(err, SearchError::Server("后端故障".into()));
}

#[tokio::test]
async fn unknown_status_fails_closed() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"partial","results":[]}"#)
        .create_async()
        .await;

    let client = HttpApiClient::new(&config_for(&server)).unwrap();
    match client.search(&query()).await {
        Err(SearchError::Server(msg)) => assert!(msg.contains("partial")),
        other => panic!("expected server error, got {:?}", other),
    }
}

#[tokio::test]
async fn malformed_payload_is_a_server_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("not json at all")
        .create_async()
        .await;

    let client = HttpApiClient::new(&config_for(&server)).unwrap();
    assert!(matches!(
        client.search(&query()).await,
        Err(SearchError::Server(_))
    ));
}

#[tokio::test]
async fn http_error_status_is_server_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/search")
        .match_query(Matcher::Any)
        .with_status(502)
        .create_async()
        .await;

    let client = HttpApiClient::new(&config_for(&server)).unwrap();
    assert!(matches!(
        client.search(&query()).await,
        Err(SearchError::Server(_))
    ));
}

#[tokio::test]
async fn network_failure_is_network_error() {
    // 1 端口不可达，连接必然失败
    let mut cfg = Config::default();
    cfg.api_base = "http://127.0.0.1:1".into();

    let client = HttpApiClient::new(&cfg).unwrap();
    assert!(matches!(
        client.search(&query()).await,
        Err(SearchError::Network(_))
    ));
}

#[tokio::test]
async fn cached_resources_envelope_uses_resources_field() {
    let mut server = mockito::Server::new_async().await;
    let body = r#"{
        "status": "success",
        "resources": [{"resource_id": "r1", "title": "盘古", "pan_type": 2}],
        "total": 1
    }"#;
    let _mock = server
        .mock("GET", "/api/cached_resources")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("title".into(), "盘古".into()),
            Matcher::UrlEncoded("pan_type".into(), "0".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;

    let client = HttpApiClient::new(&config_for(&server)).unwrap();
    let envelope = client.search_cached(&query()).await.unwrap();
    assert_eq!(envelope.results.len(), 1);
    assert_eq!(envelope.results[0].title.as_deref(), Some("盘古"));
}

#[tokio::test]
async fn check_status_roundtrip() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/check_resource_status")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("resource_id".into(), "r1".into()),
            Matcher::UrlEncoded("pan_type".into(), "4".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"valid":true,"share_url":"https://pan.xunlei.com/s/xyz"}"#)
        .create_async()
        .await;

    let client = HttpApiClient::new(&config_for(&server)).unwrap();
    let check = client.check_resource_status("r1", 4).await.unwrap();
    assert!(check.valid);
    assert_eq!(check.share_url.as_deref(), Some("https://pan.xunlei.com/s/xyz"));
}

#[tokio::test]
async fn get_share_posts_platform_and_id() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/get_share")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("platform".into(), "quark".into()),
            Matcher::UrlEncoded("resource_id".into(), "r1".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"share_url":"https://pan.quark.cn/s/abc"}"#)
        .create_async()
        .await;

    let client = HttpApiClient::new(&config_for(&server)).unwrap();
    let share = client.get_share("quark", "r1").await.unwrap();
    assert_eq!(share.share_url.as_deref(), Some("https://pan.quark.cn/s/abc"));
}

#[tokio::test]
async fn feedback_roundtrip_reports_deletion() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/report_invalid_resource")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "resource_id": "r1",
            "pan_type": 2,
            "invalid_type": 1
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"success","is_deleted":true}"#)
        .create_async()
        .await;

    let client = HttpApiClient::new(&config_for(&server)).unwrap();
    let req = FeedbackRequest {
        resource_id: "r1".into(),
        pan_type: 2,
        invalid_type: 1,
        description: "链接失效".into(),
        contact_info: String::new(),
    };
    let reply = client.report_invalid(&req).await.unwrap();
    assert!(reply.deleted);
}

#[tokio::test]
async fn resource_stats_roundtrip() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/resource_stats")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"success","total":23456,"yesterday":120}"#)
        .create_async()
        .await;

    let client = HttpApiClient::new(&config_for(&server)).unwrap();
    let stats = client.resource_stats().await.unwrap();
    assert_eq!(stats.total, 23456);
    assert_eq!(stats.yesterday, 120);
}
