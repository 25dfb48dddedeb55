use actix_web::{http::StatusCode, test};
use serde_json::json;
use std::sync::atomic::Ordering;

mod common;
use common::TestApp;

#[actix_web::test]
async fn test_list_users_relays_the_gateway_set() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get().uri("/users").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 3);
    assert_eq!(users[0]["username"], "ana");
    assert_eq!(users[0]["ou"], "CC");
}

#[actix_web::test]
async fn test_list_users_always_hits_the_gateway() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    for _ in 0..2 {
        let req = test::TestRequest::get().uri("/users").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    // Both proxy reads reach the upstream despite the dedup window.
    assert_eq!(test_app.gateway.fetch_calls.load(Ordering::SeqCst), 2);
}

#[actix_web::test]
async fn test_create_user_success() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(json!({
            "username": "dani",
            "givenName": "Daniela",
            "sn": "Rojas",
            "ou": "CC",
            "groups": ["G1"]
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["username"], "dani");

    let req = test::TestRequest::get().uri("/users").to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 4);
}

#[actix_web::test]
async fn test_create_user_missing_username() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(json!({ "username": "", "ou": "CC" }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn test_create_duplicate_user_passes_through_conflict() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(json!({ "username": "ana", "ou": "CC" }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["message"].as_str().unwrap().contains("already exists"));
}

#[actix_web::test]
async fn test_create_user_with_weak_password_never_reaches_the_gateway() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(json!({ "username": "dani", "ou": "CC", "password": "abc" }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(test_app.gateway.write_calls.load(Ordering::SeqCst), 0);
}

#[actix_web::test]
async fn test_update_user_success() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::put()
        .uri("/users")
        .set_json(json!({ "username": "ana", "ou": "MAT" }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["ou"], "MAT");
    // Fields absent from the update stay untouched.
    assert_eq!(body["givenName"], "Ana");
}

#[actix_web::test]
async fn test_update_missing_user_passes_through_not_found() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::put()
        .uri("/users")
        .set_json(json!({ "username": "ghost", "ou": "CC" }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_delete_user_success() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::delete().uri("/users/ana").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert!(body["message"].as_str().unwrap().contains("deleted"));

    let req = test::TestRequest::get().uri("/users").to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn test_delete_missing_user_passes_through_not_found() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::delete().uri("/users/ghost").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("not found"));
}

#[actix_web::test]
async fn test_catalog_endpoints() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get().uri("/ous").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, json!(["CC", "MAT"]));

    let req = test::TestRequest::get().uri("/groups").to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, json!(["G1", "G2"]));
}

#[actix_web::test]
async fn test_column_catalog_endpoint() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get().uri("/columns").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    let columns = body.as_array().unwrap();
    assert_eq!(columns[0]["key"], "username");
    assert_eq!(columns[0]["fixed"], true);
    let groups = columns.iter().find(|c| c["key"] == "groups").unwrap();
    assert_eq!(groups["sortable"], false);
}
