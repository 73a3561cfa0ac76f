#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use stall_server::{Config, ServerState, api};
use tempfile::TempDir;
use tower::ServiceExt;

pub const CASHIER: &str = "kasir";
pub const PASSWORD: &str = "rahasia-warung";
pub const BOUNDARY: &str = "stall-test-boundary";

pub struct TestApp {
    pub app: Router,
    pub state: ServerState,
    _work_dir: TempDir,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// In-memory database, uploads in a temp dir
pub async fn spawn_app_with(customize: impl FnOnce(&mut Config)) -> TestApp {
    let work_dir = TempDir::new().unwrap();
    let mut config = Config::with_overrides(work_dir.path().to_string_lossy(), 0);
    config.cashier_username = CASHIER.into();
    config.cashier_password = PASSWORD.into();
    config.jwt.secret = "test-secret-0123456789abcdef0123456789".into();
    config.max_upload_bytes = 64 * 1024;
    config.order_statuses = None;
    config.allow_legacy_login_header = false;
    customize(&mut config);

    let state = ServerState::in_memory(config).await.unwrap();
    let app = api::build_app(&state);
    TestApp {
        app,
        state,
        _work_dir: work_dir,
    }
}

impl TestApp {
    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, body)
    }

    pub async fn login(&self) -> String {
        let (status, body) = self
            .send(json_request(
                "POST",
                "/api/auth/login",
                serde_json::json!({ "username": CASHIER, "password": PASSWORD }),
            ))
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn submit(&self, body: Value) -> (StatusCode, Value) {
        self.send(json_request("POST", "/api/orders", body)).await
    }

    pub async fn get_authed(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        let req = Request::builder()
            .method("GET")
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        self.send(req).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let req = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.send(req).await
    }
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn authed_json_request(method: &str, uri: &str, token: &str, body: Value) -> Request<Body> {
    let mut req = json_request(method, uri, body);
    req.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {token}").parse().unwrap(),
    );
    req
}

/// Single-part multipart body
pub fn multipart_request(uri: &str, field: &str, file_name: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn budi_order() -> Value {
    serde_json::json!({
        "customerName": "Budi",
        "totalPrice": 25000,
        "paymentMethod": "QRIS",
        "items": [{ "name": "Sate", "quantity": 2, "price": 12500, "note": "" }]
    })
}
