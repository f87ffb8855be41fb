//! HTTP client tests using wiremock mock server.
//!
//! These tests verify:
//! - Bearer authentication and the fixed User-Agent header
//! - GET/POST selection and JSON bodies as seen on the wire
//! - Error handling for non-2xx responses and non-JSON bodies

use std::sync::Arc;

use onebot_node::core::host::params;
use onebot_node::core::options::{load_options, methods};
use onebot_node::prelude::*;
use serde_json::{Map, json};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn client_for_server(server: &MockServer, token: Option<&str>) -> HttpApiClient {
    let mut config = OneBotConfig::new(server.uri());
    if let Some(token) = token {
        config = config.with_access_token(token);
    }
    HttpApiClient::new(&config).expect("client creation should succeed")
}

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "status": "ok", "retcode": 0, "data": data }))
}

#[tokio::test]
async fn test_credentials_hits_get_status_with_bearer() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/get_status"))
        .and(header("authorization", "Bearer secret-token"))
        .and(header(
            "user-agent",
            format!("onebot-node/{}", env!("CARGO_PKG_VERSION")).as_str(),
        ))
        .respond_with(ok(json!({ "online": true, "good": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for_server(&server, Some("secret-token"));
    let status = client.test_credentials().await.unwrap();
    assert_eq!(status["data"]["online"], true);
}

#[tokio::test]
async fn no_authorization_header_without_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/get_version_info"))
        .respond_with(ok(json!({ "app_name": "napcat" })))
        .mount(&server)
        .await;

    let client = client_for_server(&server, None);
    client
        .request(HttpMethod::Get, "get_version_info", None, None)
        .await
        .unwrap();

    let requests: Vec<Request> = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn dispatcher_posts_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/get_group_member_info"))
        .and(body_json(json!({ "group_id": 100, "user_id": 200 })))
        .respond_with(ok(json!({ "user_id": 200, "nickname": "Dan" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = Arc::new(client_for_server(&server, Some("t")));
    let batch = ItemBatch::new(client)
        .with_parameter(params::RESOURCE, "group")
        .with_parameter(params::OPERATION, "get_group_member_info")
        .with_parameter(params::GROUP_ID, "100")
        .with_parameter(params::USER_ID, 200)
        .with_item(InputItem::default());

    let output = Dispatcher::execute(&batch).await.unwrap();
    assert_eq!(output[0].json["data"]["nickname"], "Dan");
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/send_private_msg"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .mount(&server)
        .await;

    let client = Arc::new(client_for_server(&server, Some("wrong")));
    let batch = ItemBatch::new(client)
        .with_parameter(params::RESOURCE, "message")
        .with_parameter(params::OPERATION, "send_private_msg")
        .with_parameter(params::USER_ID, 1)
        .with_item(InputItem::default().with_parameter(params::MESSAGE, "hi"));

    let err = Dispatcher::execute(&batch).await.unwrap_err();
    assert_eq!(err.item_index(), Some(0));
    match err {
        Error::Item { source, .. } => match *source {
            Error::Status { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "unauthorized");
            }
            other => panic!("unexpected error: {other}"),
        },
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn malformed_json_is_a_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/get_status"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let client = client_for_server(&server, None);
    let err = client.test_credentials().await.unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
}

#[tokio::test]
async fn member_options_send_group_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/get_group_member_list"))
        .and(query_param("group_id", "321"))
        .respond_with(ok(json!([
            { "group_id": 321, "user_id": 1, "nickname": "one" },
            { "group_id": 321, "user_id": 2, "nickname": "two" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = Arc::new(client_for_server(&server, None));
    let mut selected = Map::new();
    selected.insert(params::GROUP_ID.to_string(), json!(321));
    let ctx = StaticOptionsContext::new(client, selected);

    let options = load_options(&ctx, methods::GET_GROUP_MEMBER_LIST)
        .await
        .unwrap();
    let names: Vec<_> = options.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec!["one", "two"]);
    assert_eq!(options[1].description, "2");
}
