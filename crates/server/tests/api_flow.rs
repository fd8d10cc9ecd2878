use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use models::enums::Role;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use server::routes::{self, auth::ServerState};
use service::auth::domain::AuthUser;
use service::auth::repository::mock::MockAuthRepository;
use service::auth::AuthConfig;
use service::delivery::repository::mock::MockDeliveryRepository;
use service::notify::mock::RecordingMailer;
use service::product::repository::mock::MockProductRepository;
use service::transaction::repository::mock::MockTransactionRepository;

struct Harness {
    app: Router,
    state: ServerState,
    deliveries: Arc<MockDeliveryRepository>,
    transactions: Arc<MockTransactionRepository>,
    mailer: Arc<RecordingMailer>,
}

fn harness() -> Harness {
    let deliveries = Arc::new(MockDeliveryRepository::default());
    let transactions = Arc::new(MockTransactionRepository::default());
    let mailer = Arc::new(RecordingMailer::default());
    let state = ServerState::from_repositories(
        Arc::new(MockAuthRepository::default()),
        AuthConfig { jwt_secret: "test-secret".into(), token_ttl_hours: 1 },
        deliveries.clone(),
        transactions.clone(),
        Arc::new(MockProductRepository::default()),
        mailer.clone(),
    );
    let app = routes::build_router(state.clone(), tower_http::cors::CorsLayer::very_permissive());
    Harness { app, state, deliveries, transactions, mailer }
}

impl Harness {
    fn token(&self, role: Role) -> String {
        let user = AuthUser { id: Uuid::new_v4(), name: format!("{:?} user", role), email: "t@example.com".into(), role };
        self.state.auth.issue_token(&user).unwrap()
    }

    async fn send(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            builder = builder.header("authorization", format!("Bearer {}", t));
        }
        let req = match body {
            Some(v) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&v).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let resp = self.app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }
}

fn delivery_body(product: Uuid, name: &str) -> Value {
    json!({
        "product": product,
        "company_name": name,
        "date": "2024-05-01T08:00:00Z",
        "price": 150.0,
        "quantity": 3
    })
}

#[tokio::test]
async fn create_transaction_returns_201_with_populated_refs() {
    let h = harness();
    let uid = h.transactions.add_user("Ana", "ana@example.com");
    let pid = h.transactions.add_product("Rice 25kg");
    let token = h.token(Role::Customer);

    let (status, body) = h
        .send("POST", "/api/v1/transactions", Some(&token), Some(json!({
            "user": uid, "product": [pid], "date": "2024-06-01T10:00:00Z"
        })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["user"]["name"], "Ana");
    assert_eq!(body["data"]["product"][0]["product_name"], "Rice 25kg");
    assert!(body["data"]["product"][0]["image"].is_array());
    assert_eq!(body["data"]["status"], "Pending");
    let id = body["data"]["id"].as_str().unwrap();
    assert_eq!(body["message"], format!("Transaction of Ana with ID {} is created", id));
    assert_eq!(h.mailer.sent().len(), 1);
}

#[tokio::test]
async fn deleting_unknown_delivery_is_404() {
    let h = harness();
    let token = h.token(Role::Admin);
    let missing = Uuid::new_v4();
    let (status, body) = h.send("DELETE", &format!("/api/v1/delivery/{}", missing), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], format!("Delivery not found with ID: {}", missing));
}

#[tokio::test]
async fn malformed_ids_are_400() {
    let h = harness();
    let token = h.token(Role::Admin);
    let (status, body) = h.send("GET", "/api/v1/delivery/64b7f0c2e1", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid delivery ID: 64b7f0c2e1");

    let (status, _) = h.send("DELETE", "/api/v1/transaction/nope", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_company_name_is_409_on_create_and_update() {
    let h = harness();
    let token = h.token(Role::Admin);
    let pid = h.deliveries.add_product("Rice");

    let (status, _) = h.send("POST", "/api/v1/deliveries", Some(&token), Some(delivery_body(pid, "Acme"))).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = h.send("POST", "/api/v1/deliveries", Some(&token), Some(delivery_body(pid, "Globex"))).await;
    assert_eq!(status, StatusCode::CREATED);
    let globex = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = h.send("POST", "/api/v1/deliveries", Some(&token), Some(delivery_body(pid, "acme"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Duplicate company name");

    let uri = format!("/api/v1/delivery/edit/{}", globex);
    let (status, _) = h.send("PATCH", &uri, Some(&token), Some(delivery_body(pid, "ACME"))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = h.send("PATCH", &uri, Some(&token), Some(delivery_body(pid, "Globex Ltd"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], format!("Delivery Globex Ltd with ID {} is updated", globex));
    assert_eq!(body["data"]["product"]["product_name"], "Rice");
}

#[tokio::test]
async fn missing_required_fields_are_listed() {
    let h = harness();
    let token = h.token(Role::Admin);
    let (status, body) = h
        .send("POST", "/api/v1/deliveries", Some(&token), Some(json!({ "company_name": "Acme", "price": 10 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing required fields: date, quantity");

    let (status, body) = h
        .send("POST", "/api/v1/transactions", Some(&token), Some(json!({ "date": "2024-06-01T10:00:00Z" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing required fields: user, product");
}

#[tokio::test]
async fn role_gate_and_token_checks() {
    let h = harness();
    let pid = h.deliveries.add_product("Rice");
    let employee = h.token(Role::Employee);

    let (status, body) = h.send("POST", "/api/v1/deliveries", Some(&employee), Some(delivery_body(pid, "Acme"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);

    let (status, _) = h.send("GET", "/api/v1/deliveries", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = h.send("GET", "/api/v1/deliveries", Some("not.a.jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let customer = h.token(Role::Customer);
    let (status, _) = h.send("GET", "/api/v1/transactions", Some(&customer), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let h = harness();
    let expired = service::auth::AuthService::new(
        Arc::new(MockAuthRepository::default()),
        AuthConfig { jwt_secret: "test-secret".into(), token_ttl_hours: -2 },
    )
    .issue_token(&AuthUser { id: Uuid::new_v4(), name: "Old".into(), email: "o@example.com".into(), role: Role::Admin })
    .unwrap();
    let (status, _) = h.send("GET", "/api/v1/deliveries", Some(&expired), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn cookie_token_is_accepted() {
    let h = harness();
    let token = h.token(Role::Employee);
    let req = Request::builder()
        .method("GET")
        .uri("/api/v1/deliveries")
        .header("cookie", format!("theme=dark; auth_token={}", token))
        .body(Body::empty())
        .unwrap();
    let resp = h.app.clone().oneshot(req).await.unwrap();
    // authenticated, but the collection is empty
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_lists_are_404() {
    let h = harness();
    let token = h.token(Role::Admin);
    let (status, body) = h.send("GET", "/api/v1/deliveries", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No deliveries found");
    let (_, body) = h.send("GET", "/api/v1/transactions", Some(&token), None).await;
    assert_eq!(body["message"], "No transactions found");
}

#[tokio::test]
async fn delete_delivery_returns_it_and_drops_scheduled_products() {
    let h = harness();
    let token = h.token(Role::Admin);
    let pid = h.deliveries.add_product("Rice");
    let scheduled = h.deliveries.add_product("Beans");
    let (_, body) = h.send("POST", "/api/v1/deliveries", Some(&token), Some(delivery_body(pid, "Acme"))).await;
    let id: Uuid = body["data"]["id"].as_str().unwrap().parse().unwrap();
    h.deliveries.schedule_product(scheduled, id);

    let (status, body) = h.send("DELETE", &format!("/api/v1/delivery/{}", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], format!("Delivery Acme with ID {} is deleted", id));
    assert_eq!(h.deliveries.product_count(), 1);
}

#[tokio::test]
async fn status_update_notifies_owner() {
    let h = harness();
    let uid = h.transactions.add_user("Ana", "ana@example.com");
    let customer = h.token(Role::Customer);
    let employee = h.token(Role::Employee);
    let (_, body) = h
        .send("POST", "/api/v1/transactions", Some(&customer), Some(json!({
            "user": uid, "product": [], "date": "2024-06-01T10:00:00Z"
        })))
        .await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = h
        .send("PATCH", &format!("/api/v1/transaction/edit/{}", id), Some(&employee), Some(json!({
            "status": "Completed", "date": "2024-06-02T10:00:00Z"
        })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "Completed");
    assert!(body["message"].as_str().unwrap().ends_with(&format!("with ID {} is updated", id)));
    let sent = h.mailer.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].subject, "Your transaction is now Completed");

    let (status, _) = h
        .send("PATCH", &format!("/api/v1/transaction/edit/{}", id), Some(&employee), Some(json!({
            "status": "Shipped", "date": "2024-06-02T10:00:00Z"
        })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_login_and_public_routes() {
    let h = harness();
    let (status, body) = h
        .send("POST", "/api/v1/register", None, Some(json!({
            "name": "Tester", "email": "tester@example.com", "password": "S3curePass!"
        })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["role"], "Customer");

    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/login")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&json!({ "email": "tester@example.com", "password": "S3curePass!" })).unwrap()))
        .unwrap();
    let resp = h.app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = resp.headers().get("set-cookie").and_then(|v| v.to_str().ok()).unwrap_or("");
    assert!(cookie.starts_with("auth_token="));

    let (status, _) = h
        .send("POST", "/api/v1/login", None, Some(json!({ "email": "tester@example.com", "password": "wrong-pass" })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = h.send("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let req = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
    let resp = h.app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn only_admin_manages_users() {
    let h = harness();
    let admin = h.token(Role::Admin);
    let employee = h.token(Role::Employee);
    let new_user = json!({ "name": "Staff", "email": "staff@example.com", "password": "Passw0rd!", "role": "Employee" });

    let (status, _) = h.send("POST", "/api/v1/users", Some(&employee), Some(new_user.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = h.send("POST", "/api/v1/users", Some(&admin), Some(new_user)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["role"], "Employee");

    let (status, body) = h.send("GET", "/api/v1/users", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
}

async fn send_raw(app: &Router, token: &str, content_type: Option<&str>, body: &'static str) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/v1/deliveries")
        .header("authorization", format!("Bearer {}", token));
    if let Some(ct) = content_type {
        builder = builder.header("content-type", ct);
    }
    let resp = app.clone().oneshot(builder.body(Body::from(body)).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn unreadable_bodies_use_error_envelope() {
    let h = harness();
    let token = h.token(Role::Admin);

    let (status, body) = send_raw(&h.app, &token, Some("application/json"), "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Bad Request");
    assert!(body["message"].as_str().unwrap().contains("JSON"));

    let (status, body) = send_raw(&h.app, &token, None, r#"{"company_name":"Acme"}"#).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("Content-Type"));
}

#[tokio::test]
async fn list_and_get_messages_name_every_record() {
    let h = harness();
    let admin = h.token(Role::Admin);
    let pid = h.deliveries.add_product("Rice");

    let mut delivery_ids = Vec::new();
    for name in ["Acme", "Globex"] {
        let (status, body) = h.send("POST", "/api/v1/deliveries", Some(&admin), Some(delivery_body(pid, name))).await;
        assert_eq!(status, StatusCode::CREATED);
        delivery_ids.push(body["data"]["id"].as_str().unwrap().to_string());
    }
    let (status, body) = h.send("GET", "/api/v1/deliveries", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        format!("Deliveries with delivery Globex, Acme and IDs {}, {} retrieved", delivery_ids[1], delivery_ids[0])
    );
    let (status, body) = h.send("GET", &format!("/api/v1/delivery/{}", delivery_ids[0]), Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], format!("Delivery Acme with ID {} retrieved", delivery_ids[0]));

    let mut tx_ids = Vec::new();
    for (name, email) in [("Ana", "ana@example.com"), ("Ben", "ben@example.com")] {
        let uid = h.transactions.add_user(name, email);
        let (status, body) = h
            .send("POST", "/api/v1/transactions", Some(&admin), Some(json!({
                "user": uid, "product": [], "date": "2024-06-01T10:00:00Z"
            })))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        tx_ids.push(body["data"]["id"].as_str().unwrap().to_string());
    }
    let (status, body) = h.send("GET", "/api/v1/transactions", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        format!("Transactions with transaction Ben, Ana and IDs {}, {} retrieved", tx_ids[1], tx_ids[0])
    );
    let (status, body) = h.send("GET", &format!("/api/v1/transaction/{}", tx_ids[0]), Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Transaction of Ana is Pending");
}
