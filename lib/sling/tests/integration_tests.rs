//! End-to-end tests for `Sling` over `HyperClient` using wiremock.

use std::time::Duration;

use assert2::{check, let_assert};
use serde::{Deserialize, Serialize};
use sling::tower::ServiceBuilder;
use sling::{
    ClientConfig, HyperClient, JsonDecoder, RawBody, RawDecoder, Request, ServiceClient, Sling,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, body_string, header, method, path, query_param},
};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct User {
    id: u64,
    name: String,
}

#[derive(Debug, Serialize)]
struct Paging {
    page: u32,
    per_page: u32,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

#[derive(Debug, Serialize)]
struct Credentials {
    username: &'static str,
    password: &'static str,
}

fn sling_for(server: &MockServer) -> Sling {
    Sling::new(HyperClient::new())
        .base(&format!("{}/", server.uri()))
        .response_decoder(JsonDecoder)
}

#[tokio::test]
async fn test_get_receive_json() {
    let mock_server = MockServer::start().await;
    let user = User {
        id: 1,
        name: "Alice".to_string(),
    };

    Mock::given(method("GET"))
        .and(path("/users/1"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&user))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut received = User::default();
    sling_for(&mock_server)
        .add_header("Accept", "application/json")
        .get("users/1")
        .receive(&mut received)
        .await
        .expect("receive");

    check!(received == user);
}

#[tokio::test]
async fn test_post_json_body() {
    let mock_server = MockServer::start().await;
    let input = User {
        id: 0,
        name: "Bob".to_string(),
    };
    let output = User {
        id: 42,
        name: "Bob".to_string(),
    };

    Mock::given(method("POST"))
        .and(path("/users"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(&input))
        .respond_with(ResponseTemplate::new(200).set_body_json(&output))
        .mount(&mock_server)
        .await;

    let mut received = User::default();
    sling_for(&mock_server)
        .post("users")
        .body_json(input)
        .receive(&mut received)
        .await
        .expect("receive");

    check!(received == output);
}

#[tokio::test]
async fn test_post_form_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
        .and(body_string("password=p%40ss+word&username=alice"))
        .respond_with(ResponseTemplate::new(200).set_body_string("welcome"))
        .mount(&mock_server)
        .await;

    let mut text = String::new();
    sling_for(&mock_server)
        .post("login")
        .body_form(Credentials {
            username: "alice",
            password: "p@ss word",
        })
        .response_decoder(RawDecoder)
        .receive(&mut text)
        .await
        .expect("receive");

    check!(text == "welcome");
}

#[tokio::test]
async fn test_raw_body_and_raw_decoder() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/blobs/1"))
        .and(header("Content-Type", "application/octet-stream"))
        .and(body_string("\u{1}\u{2}\u{3}"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xde, 0xad, 0xbe, 0xef]))
        .mount(&mock_server)
        .await;

    let mut bytes: Vec<u8> = Vec::new();
    sling_for(&mock_server)
        .put("blobs/1")
        .body_provider(RawBody::octet_stream(vec![1_u8, 2, 3]))
        .response_decoder(RawDecoder)
        .receive(&mut bytes)
        .await
        .expect("receive");

    check!(bytes == [0xde, 0xad, 0xbe, 0xef]);
}

#[tokio::test]
async fn test_query_parameters_are_merged_and_sorted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos"))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "10"))
        .and(query_param("sort", "updated"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<User>::new()))
        .mount(&mock_server)
        .await;

    let mut users: Vec<User> = vec![User::default()];
    sling_for(&mock_server)
        .get("repos?sort=updated")
        .add_query(Paging {
            page: 2,
            per_page: 10,
        })
        .receive(&mut users)
        .await
        .expect("receive");

    check!(users.is_empty());

    let_assert!(Some(requests) = mock_server.received_requests().await);
    let_assert!([request] = requests.as_slice());
    check!(request.url.query() == Some("page=2&per_page=10&sort=updated"));
}

#[tokio::test]
async fn test_parent_child_templates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/1"))
        .and(header("X-Api-Key", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(User {
            id: 1,
            name: "one".to_string(),
        }))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/2"))
        .and(header("X-Api-Key", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(User {
            id: 2,
            name: "two".to_string(),
        }))
        .mount(&mock_server)
        .await;

    let parent = sling_for(&mock_server)
        .set_header("X-Api-Key", "secret")
        .path("users/");

    let mut first = User::default();
    let mut second = User::default();
    parent
        .try_clone()
        .expect("clone")
        .get("1")
        .receive(&mut first)
        .await
        .expect("receive");
    parent
        .try_clone()
        .expect("clone")
        .get("2")
        .receive(&mut second)
        .await
        .expect("receive");

    check!(first.name == "one");
    check!(second.name == "two");
    check!(parent.url().map(url::Url::path) == Some("/users/"));
}

#[tokio::test]
async fn test_http_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(serde_json::json!({"message": "Not Found"})),
        )
        .mount(&mock_server)
        .await;

    let mut user = User::default();
    let_assert!(
        Err(err) = sling_for(&mock_server)
            .get("missing")
            .receive(&mut user)
            .await
    );

    check!(err.is_not_found());
    let_assert!(Some(Ok(api_error)) = err.decode_body::<ApiError>());
    check!(api_error.message == "Not Found");
    check!(user == User::default());
}

#[tokio::test]
async fn test_created_is_not_decoded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(201).set_body_json(User {
            id: 7,
            name: "new".to_string(),
        }))
        .mount(&mock_server)
        .await;

    let mut user = User::default();
    let_assert!(
        Err(err) = sling_for(&mock_server)
            .post("users")
            .body_json(User::default())
            .receive(&mut user)
            .await
    );

    check!(err.status() == Some(201));
    check!(user == User::default());
}

#[tokio::test]
async fn test_response_returns_any_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let response = sling_for(&mock_server)
        .delete("users/1")
        .response()
        .await
        .expect("response");

    check!(response.status() == 204);
    check!(response.body().is_empty());
}

#[tokio::test]
async fn test_empty_body_leaves_destination() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let mut user = User {
        id: 9,
        name: "kept".to_string(),
    };
    sling_for(&mock_server)
        .get("empty")
        .receive(&mut user)
        .await
        .expect("receive");

    check!(user.id == 9);
    check!(user.name == "kept");
}

#[tokio::test]
async fn test_response_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/with-headers"))
        .respond_with(ResponseTemplate::new(200).insert_header("X-Request-Id", "abc123"))
        .mount(&mock_server)
        .await;

    let response = sling_for(&mock_server)
        .head("with-headers")
        .response()
        .await
        .expect("response");

    check!(response.header("x-request-id") == Some("abc123"));
}

#[tokio::test]
async fn test_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let client =
        HyperClient::with_config(ClientConfig::default().with_timeout(Duration::from_millis(100)));

    let mut user = User::default();
    let_assert!(
        Err(err) = Sling::new(client)
            .get(&format!("{}/slow", mock_server.uri()))
            .response_decoder(JsonDecoder)
            .receive(&mut user)
            .await
    );

    check!(err.is_timeout(), "expected timeout error, got: {err}");
}

#[tokio::test]
async fn test_connection_error() {
    let result = Sling::new(HyperClient::new())
        .get("http://127.0.0.1:1/")
        .response()
        .await;

    let_assert!(Err(err) = result);
    check!(err.is_connection(), "expected connection error, got: {err}");
}

#[tokio::test]
async fn test_tower_stack_as_transport() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/1"))
        .and(header("X-Tenant", "acme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(User {
            id: 1,
            name: "stacked".to_string(),
        }))
        .expect(1)
        .mount(&mock_server)
        .await;

    let stack = ServiceBuilder::new()
        .map_request(|mut request: Request| {
            request
                .headers_mut()
                .insert("x-tenant", http::HeaderValue::from_static("acme"));
            request
        })
        .service(HyperClient::new());

    let mut user = User::default();
    Sling::new(ServiceClient::new(stack))
        .base(&format!("{}/", mock_server.uri()))
        .get("users/1")
        .response_decoder(JsonDecoder)
        .receive(&mut user)
        .await
        .expect("receive");

    check!(user.name == "stacked");
}
