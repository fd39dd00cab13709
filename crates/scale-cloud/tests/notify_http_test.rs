//! DecommissionNotifier against a real HTTP listener

use scale_cloud::{DecommissionNotifier, FleetError, HttpTransport};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn notifier() -> DecommissionNotifier {
    DecommissionNotifier::http().unwrap()
}

#[tokio::test]
async fn test_unregister_request_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/unregister"))
        .and(header("host", "brave-otter"))
        .respond_with(ResponseTemplate::new(200).set_body_string("bye"))
        .expect(1)
        .mount(&server)
        .await;

    let entrypoint = server.address().to_string();
    let notifier = DecommissionNotifier::new(HttpTransport::new(reqwest::Client::new()));
    notifier.notify(&entrypoint, "brave-otter").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].body.is_empty());
}

#[tokio::test]
async fn test_server_error_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/unregister"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = notifier()
        .notify(&server.address().to_string(), "brave-otter")
        .await
        .unwrap_err();
    match err {
        FleetError::Transport { host, message } => {
            assert_eq!(host, "brave-otter");
            assert!(message.contains("503"), "{}", message);
        }
        other => panic!("Expected Transport error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_client_error_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/unregister"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = notifier()
        .notify(&server.address().to_string(), "brave-otter")
        .await
        .unwrap_err();
    match err {
        FleetError::Transport { message, .. } => assert!(message.contains("404"), "{}", message),
        other => panic!("Expected Transport error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_redirect_is_not_followed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/unregister"))
        .respond_with(ResponseTemplate::new(307).insert_header("location", "/elsewhere"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/elsewhere"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    notifier()
        .notify(&server.address().to_string(), "brave-otter")
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), "/unregister");
}

#[tokio::test]
async fn test_unreachable_gateway_is_transport_error() {
    // bind and drop a listener to get a port nobody listens on
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();

    let err = notifier()
        .notify(&addr.to_string(), "brave-otter")
        .await
        .unwrap_err();
    assert!(matches!(err, FleetError::Transport { .. }));
}
