mod common;

use axum::body::Body;
use common::*;
use http::{Request, StatusCode};
use serde_json::json;
use shared::StallEvent;
use shared::models::OrderStatus;

#[tokio::test]
async fn submit_order_returns_id_and_broadcasts() {
    let t = spawn_app().await;
    let mut sub = t.state.hub.subscribe();

    let (status, body) = t.submit(budi_order()).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["orderId"], 1);
    assert_eq!(body["initialStatus"], "AWAITING_PAYMENT");

    let event = sub.recv().await.unwrap();
    let wire = serde_json::to_value(&event).unwrap();
    assert_eq!(wire["event"], "new-order");
    assert_eq!(wire["data"]["id"], 1);
    assert_eq!(wire["data"]["customerName"], "Budi");
    assert_eq!(wire["data"]["totalPrice"], 25000.0);
    assert_eq!(wire["data"]["paymentMethod"], "QRIS");
    assert_eq!(wire["data"]["status"], "AWAITING_PAYMENT");
    assert_eq!(wire["data"]["itemsSummary"], "Sate x2");
    assert!(wire["data"].get("items").is_none());
    assert!(wire["data"].get("note").is_none());
}

#[tokio::test]
async fn legacy_submit_path_and_payload_shape() {
    let t = spawn_app().await;

    let (status, body) = t
        .send(json_request(
            "POST",
            "/submit-order",
            json!({
                "customerName": "Siti",
                "tableNumber": "3",
                "totalPrice": 17000,
                "paymentMethod": "TRANSFER",
                "cart": [
                    { "name": "Es Teh", "quantity": 1, "price": 5000, "notes": "less sugar" },
                    { "name": "Nasi Goreng", "quantity": 1, "price": 12000 }
                ]
            }),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["initialStatus"], "AWAITING_CONFIRMATION");

    let token = t.login().await;
    let (status, order) = t.get_authed("/order/1", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["itemsSummary"], "Es Teh x1 (less sugar), Nasi Goreng x1");
    assert_eq!(order["tableNumber"], "3");
    assert!(order["paymentProofRef"].is_null());
}

#[tokio::test]
async fn invalid_submissions_are_rejected_without_side_effects() {
    let t = spawn_app().await;

    let mut empty_cart = budi_order();
    empty_cart["items"] = json!([]);
    let mut no_name = budi_order();
    no_name["customerName"] = json!("");
    let mut zero_total = budi_order();
    zero_total["totalPrice"] = json!(0);
    let mut bad_type = budi_order();
    bad_type["totalPrice"] = json!("lots");

    for body in [empty_cart, no_name, zero_total, bad_type] {
        let (status, err) = t.submit(body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{err}");
        assert!(err["message"].is_string());
    }

    let token = t.login().await;
    let (_, orders) = t.get_authed("/api/orders", &token).await;
    assert_eq!(orders, json!([]));
}

#[tokio::test]
async fn cashier_routes_require_login() {
    let t = spawn_app().await;
    t.submit(budi_order()).await;

    for uri in ["/api/orders", "/orders", "/api/orders/1", "/order-items/1"] {
        let (status, body) = t.get(uri).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body["code"], 1001);
    }

    let (status, _) = t.get_authed("/api/orders", "not-a-token").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = t
        .send(json_request(
            "POST",
            "/update-status/1",
            json!({ "newStatus": "DONE" }),
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED, "{body}");
}

#[tokio::test]
async fn legacy_login_header_is_opt_in() {
    let request = || {
        Request::builder()
            .uri("/orders")
            .header("X-Logged-In", "true")
            .body(Body::empty())
            .unwrap()
    };

    let strict = spawn_app().await;
    let (status, _) = strict.send(request()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let legacy = spawn_app_with(|c| c.allow_legacy_login_header = true).await;
    let (status, body) = legacy.send(request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    // status updates work through the legacy marker as well
    legacy.submit(budi_order()).await;
    let mut update = json_request("POST", "/update-status/1", json!({ "newStatus": "DONE" }));
    update
        .headers_mut()
        .insert("X-Logged-In", "true".parse().unwrap());
    let (status, body) = legacy.send(update).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["newStatus"], "DONE");
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let t = spawn_app().await;
    let (status, body) = t
        .send(json_request(
            "POST",
            "/api/auth/login",
            json!({ "username": CASHIER, "password": "salah" }),
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert!(body.get("token").is_none());
}

#[tokio::test]
async fn malformed_login_body_gets_error_json() {
    let t = spawn_app().await;
    let req = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Body::from("not json"))
        .unwrap();

    let (status, body) = t.send(req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(body["code"], 2);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn list_orders_newest_first_with_items() {
    let t = spawn_app().await;
    for name in ["A", "B", "C"] {
        let mut order = budi_order();
        order["customerName"] = json!(name);
        t.submit(order).await;
    }

    let token = t.login().await;
    let (status, orders) = t.get_authed("/api/orders", &token).await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<&str> = orders
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["customerName"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["C", "B", "A"]);
    assert_eq!(orders[0]["items"][0]["itemName"], "Sate");
    assert_eq!(orders[0]["items"][0]["quantity"], 2);
    assert_eq!(orders[0]["items"][0]["unitPrice"], 12500.0);
}

#[tokio::test]
async fn get_order_and_items() {
    let t = spawn_app().await;
    t.submit(budi_order()).await;
    let token = t.login().await;

    let (status, body) = t.get_authed("/api/orders/99", &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4001);

    let (status, items) = t.get_authed("/api/orders/1/items", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(items.as_array().unwrap().len(), 1);
    assert!(items[0]["note"].is_null());

    let (status, items) = t.get_authed("/order-items/99", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(items, json!([]));

    let (status, _) = t.get_authed("/api/orders/abc", &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_status_flow() {
    let t = spawn_app().await;
    t.submit(budi_order()).await;
    let token = t.login().await;
    let mut sub = t.state.hub.subscribe();

    let (status, body) = t
        .send(authed_json_request(
            "POST",
            "/api/orders/1/status",
            &token,
            json!({ "newStatus": "PREPARING" }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["newStatus"], "PREPARING");

    assert_eq!(
        sub.recv().await,
        Some(StallEvent::StatusUpdate {
            order_id: 1,
            new_status: OrderStatus::new("PREPARING"),
        })
    );

    let (status, body) = t
        .send(authed_json_request(
            "POST",
            "/update-status/42",
            &token,
            json!({ "newStatus": "DONE" }),
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND, "{body}");

    let (status, _) = t
        .send(authed_json_request(
            "POST",
            "/api/orders/1/status",
            &token,
            json!({ "newStatus": "" }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, order) = t.get_authed("/api/orders/1", &token).await;
    assert_eq!(order["status"], "PREPARING");
}

#[tokio::test]
async fn configured_statuses_are_enforced() {
    let t = spawn_app_with(|c| c.order_statuses = Some(vec!["DONE".into()])).await;
    t.submit(budi_order()).await;
    let token = t.login().await;

    let (status, body) = t
        .send(authed_json_request(
            "POST",
            "/api/orders/1/status",
            &token,
            json!({ "newStatus": "LOST" }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4008);

    let (status, _) = t
        .send(authed_json_request(
            "POST",
            "/api/orders/1/status",
            &token,
            json!({ "newStatus": "DONE" }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn health_reports_subscribers() {
    let t = spawn_app().await;
    let _a = t.state.hub.subscribe();
    let _b = t.state.hub.subscribe();

    let (status, body) = t.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["subscribers"], 2);
}
