use std::time::Duration;

use kmt_archive::types::BrowserCookie;
use kmt_archive::{Client, Error, FetchConfig, RetryConfig};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_client(base_url: &str) -> Client {
    let config = FetchConfig {
        timeout: Duration::from_secs(5),
        retry: RetryConfig {
            max_retries: 3,
            backoff_factor: Duration::from_millis(1),
        },
    };
    Client::with_config(base_url, config).unwrap()
}

fn cookie(name: &str, value: &str) -> BrowserCookie {
    BrowserCookie {
        name: name.to_string(),
        value: value.to_string(),
        domain: "127.0.0.1".to_string(),
        path: "/".to_string(),
        secure: false,
        http_only: true,
    }
}

#[tokio::test]
async fn get_returns_body_on_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/archive"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>archive</html>"))
        .mount(&mock_server)
        .await;

    let client = fast_client(&mock_server.uri());
    let body = client.get(&format!("{}/archive", mock_server.uri())).await;
    assert_eq!(body.as_deref(), Some("<html>archive</html>"));
}

#[tokio::test]
async fn get_sends_browser_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ua"))
        .and(header("user-agent", kmt_archive::user_agent::USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&mock_server)
        .await;

    let client = fast_client(&mock_server.uri());
    assert!(client.get(&format!("{}/ua", mock_server.uri())).await.is_some());
}

#[tokio::test]
async fn server_errors_are_retried_until_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string("recovered"))
        .mount(&mock_server)
        .await;

    let client = fast_client(&mock_server.uri());
    let body = client.get(&format!("{}/flaky", mock_server.uri())).await;
    assert_eq!(body.as_deref(), Some("recovered"));

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
}

#[tokio::test]
async fn retries_stop_after_budget() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    let client = fast_client(&mock_server.uri());
    let url = format!("{}/down", mock_server.uri());
    let result = client.fetch_text(&url).await;
    assert!(matches!(
        result,
        Err(Error::RetriesExhausted {
            status: 502,
            attempts: 4
        })
    ));

    // one initial attempt plus three retries
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 4);
    assert!(client.get(&url).await.is_none());
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&mock_server)
        .await;

    let client = fast_client(&mock_server.uri());
    let result = client
        .fetch_text(&format!("{}/missing", mock_server.uri()))
        .await;
    match result {
        Err(Error::HttpStatus { status, body }) => {
            assert_eq!(status, 404);
            assert_eq!(body, "Not Found");
        }
        other => panic!("expected HttpStatus, got {:?}", other),
    }

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn unreachable_host_yields_none() {
    let client = fast_client("http://127.0.0.1:9");
    assert!(client.get("http://127.0.0.1:9/archive").await.is_none());
}

#[tokio::test]
async fn timeouts_yield_none_without_retrying() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("too late")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let config = FetchConfig {
        timeout: Duration::from_millis(200),
        retry: RetryConfig {
            max_retries: 3,
            backoff_factor: Duration::from_millis(1),
        },
    };
    let client = Client::with_config(&mock_server.uri(), config).unwrap();
    let url = format!("{}/slow", mock_server.uri());

    let result = client.fetch_text(&url).await;
    assert!(matches!(result, Err(Error::RequestFailed)), "{:?}", result);
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 1);

    assert!(client.get(&url).await.is_none());
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn replaced_cookies_are_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/private"))
        .and(header("cookie", "session=abc; csrf=xyz"))
        .respond_with(ResponseTemplate::new(200).set_body_string("welcome"))
        .mount(&mock_server)
        .await;

    let client = fast_client(&mock_server.uri());
    client.cookies().set("stale", "old");
    client.replace_cookies(&[cookie("session", "abc"), cookie("csrf", "xyz")]);

    let body = client.get(&format!("{}/private", mock_server.uri())).await;
    assert_eq!(body.as_deref(), Some("welcome"));
}

#[tokio::test]
async fn server_set_cookies_join_the_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "refreshed=1; Path=/")
                .set_body_string("ok"),
        )
        .mount(&mock_server)
        .await;

    let client = fast_client(&mock_server.uri());
    client.get(&format!("{}/login", mock_server.uri())).await;
    assert_eq!(
        client.cookies().snapshot(),
        vec![("refreshed".to_string(), "1".to_string())]
    );
}
