//! `HttpCloudController` and `HttpStackInspector` against a wiremock server.

use std::time::Duration;

use svcmgr_cli::application::ports::{CloudController, Credentials, StackInspector};
use svcmgr_cli::domain::{LifecycleError, PublicKey};
use svcmgr_cli::infra::cloud_controller::{HttpCloudController, HttpStackInspector};
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(5);

fn controller(server: &MockServer) -> HttpCloudController {
    HttpCloudController::new(server.uri(), TIMEOUT).expect("client")
}

fn creds() -> Credentials {
    Credentials::new("token-1", "tenant-a")
}

/// An address nothing listens on.
pub fn closed_port_addr() -> std::net::SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    listener.local_addr().expect("addr")
}

fn transport_status(err: &anyhow::Error) -> Option<Option<u16>> {
    match err.downcast_ref::<LifecycleError>() {
        Some(LifecycleError::Transport { status, .. }) => Some(*status),
        _ => None,
    }
}

#[tokio::test]
async fn test_public_key_locations_reads_location_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/public_key/"))
        .and(header("Accept", "text/occi"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-OCCI-Location", "/public_key/a /public_key/b"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let keys = controller(&server)
        .public_key_locations()
        .await
        .expect("list keys");

    assert_eq!(keys, vec!["/public_key/a", "/public_key/b"]);
}

#[tokio::test]
async fn test_public_key_locations_empty_without_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/public_key/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let keys = controller(&server)
        .public_key_locations()
        .await
        .expect("list keys");

    assert!(keys.is_empty());
}

#[tokio::test]
async fn test_register_public_key_sends_category_and_attributes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/public_key/"))
        .and(header_exists("Category"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let key = PublicKey {
        name: "ops@build".to_owned(),
        content: "AAAAB3NzaC1yc2E".to_owned(),
    };
    controller(&server)
        .register_public_key(&key)
        .await
        .expect("register");

    let requests = server.received_requests().await.expect("recording on");
    let headers = &requests[0].headers;
    let category = headers.get("Category").expect("category").to_str().expect("ascii");
    assert!(category.starts_with("public_key; scheme="), "{category}");
    let attrs = headers
        .get("X-OCCI-Attribute")
        .expect("attributes")
        .to_str()
        .expect("ascii");
    assert!(attrs.contains("occi.key.name=\"ops@build\""), "{attrs}");
    assert!(attrs.contains("occi.key.content=\"AAAAB3NzaC1yc2E\""), "{attrs}");
}

#[tokio::test]
async fn test_create_app_returns_location_and_names_container() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/app/"))
        .and(header("Content-Type", "text/occi"))
        .respond_with(
            ResponseTemplate::new(201).insert_header("Location", "http://cc.example.org/app/5f1e0c"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let location = controller(&server)
        .create_app("srvinst0A1B2C3D4E5F6A7B")
        .await
        .expect("create");

    assert_eq!(location.as_deref(), Some("http://cc.example.org/app/5f1e0c"));
    let requests = server.received_requests().await.expect("recording on");
    let headers = &requests[0].headers;
    let attrs = headers
        .get("X-OCCI-Attribute")
        .expect("attributes")
        .to_str()
        .expect("ascii");
    assert_eq!(attrs, "occi.app.name=srvinst0A1B2C3D4E5F6A7B");
    let category = headers.get("Category").expect("category").to_str().expect("ascii");
    assert!(category.contains("python-2.7"), "{category}");
}

#[tokio::test]
async fn test_app_attribute_header_is_returned_raw() {
    let server = MockServer::start().await;
    let raw = "occi.app.repo=\"ssh://5f1e@srvinst0a.apps.example.org/~/git/a.git/\", occi.app.name=\"a\"";
    Mock::given(method("GET"))
        .and(path("/app/5f1e0c"))
        .respond_with(ResponseTemplate::new(200).insert_header("X-OCCI-Attribute", raw))
        .mount(&server)
        .await;

    let header = controller(&server)
        .app_attribute_header("/app/5f1e0c")
        .await
        .expect("get");

    assert_eq!(header.as_deref(), Some(raw));
}

#[tokio::test]
async fn test_delete_app_forwards_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/app/5f1e0c"))
        .and(header("X-Auth-Token", "token-1"))
        .and(header("X-Tenant-Name", "tenant-a"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    controller(&server)
        .delete_app("/app/5f1e0c", &creds())
        .await
        .expect("delete");
}

#[tokio::test]
async fn test_non_success_status_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/app/"))
        .respond_with(ResponseTemplate::new(409).set_body_string("name taken"))
        .mount(&server)
        .await;

    let err = controller(&server)
        .create_app("srvinst0")
        .await
        .expect_err("409");

    assert_eq!(transport_status(&err), Some(Some(409)));
    assert!(err.to_string().contains("name taken"));
}

#[tokio::test]
async fn test_truncated_error_body_still_reports_status() {
    use std::io::{Read, Write};

    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    let server = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let mut request = [0_u8; 4096];
        let _ = stream.read(&mut request);
        let _ = stream.write_all(
            b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 100\r\n\r\npartial",
        );
    });

    let err = HttpCloudController::new(format!("http://{addr}"), TIMEOUT)
        .expect("client")
        .create_app("srvinst0")
        .await
        .expect_err("500");
    server.join().expect("server thread");

    assert_eq!(transport_status(&err), Some(Some(500)));
    assert!(err.to_string().contains("HTTP 500"), "got: {err}");
}

#[tokio::test]
async fn test_unreachable_controller_is_transport_error_without_status() {
    let err = HttpCloudController::new(format!("http://{}", closed_port_addr()), TIMEOUT)
        .expect("client")
        .public_key_locations()
        .await
        .expect_err("connection refused");

    assert_eq!(transport_status(&err), Some(None));
}

#[tokio::test]
async fn test_stack_details_are_parsed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stack-42"))
        .and(header("X-Auth-Token", "token-1"))
        .and(header("X-Tenant-Name", "tenant-a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "state": "CREATE_COMPLETE",
            "output": [
                {"output_key": "mcn.endpoint.mme", "output_value": "10.0.0.5"}
            ]
        })))
        .mount(&server)
        .await;

    let details = HttpStackInspector::new(server.uri(), TIMEOUT)
        .expect("client")
        .details("/stack-42", &creds())
        .await
        .expect("details");

    assert_eq!(details.state, "CREATE_COMPLETE");
    assert_eq!(details.output.len(), 1);
    assert_eq!(details.output[0].output_key, "mcn.endpoint.mme");
}

#[tokio::test]
async fn test_stack_details_unexpected_body_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stack-42"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = HttpStackInspector::new(server.uri(), TIMEOUT)
        .expect("client")
        .details("/stack-42", &creds())
        .await
        .expect_err("not json");

    assert_eq!(transport_status(&err), Some(None));
}
