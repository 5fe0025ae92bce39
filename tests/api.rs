//! End-to-end API tests against a real PostgreSQL database.
//!
//! Run with a database available:
//!   DATABASE_URL=postgres://localhost/wishlist_test cargo test -- --ignored

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use wishlist_api::{app, ensure_database_exists, ensure_schema, AppState};

async fn test_app() -> Router {
    let url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgres://postgres@localhost:5432/wishlist_test".into());
    ensure_database_exists(&url).await.unwrap();
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .unwrap();
    ensure_schema(&pool).await.unwrap();
    app(AppState { pool })
}

async fn send(app: &Router, method: &str, path: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(path);
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Unique per process and per call, so tests can share one database.
fn unique(tag: &str) -> String {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}-{}", tag, std::process::id(), n)
}

async fn create_user(app: &Router, tag: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/users",
        Some(json!({
            "name": tag,
            "email": format!("{}@example.com", unique(tag)),
            "password": "hunter2"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

async fn create_merchant(app: &Router, name: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/merchants",
        Some(json!({
            "name": name,
            "login": unique("login"),
            "password": "s3cret",
            "description": "test merchant"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

async fn create_product(app: &Router, merchant_id: i64, name: &str, price: i64) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/products",
        Some(json!({
            "name": name,
            "description": "test product",
            "img": "product.png",
            "price": price,
            "merchantId": merchant_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

#[tokio::test]
#[ignore = "requires PostgreSQL; set DATABASE_URL and run with --ignored"]
async fn creating_a_user_also_creates_their_wishlist() {
    let app = test_app().await;
    let user_id = create_user(&app, "with-list").await;

    let (status, list) = send(&app, "GET", &format!("/users/{user_id}/wishlist"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["userId"].as_i64().unwrap(), user_id);
    assert_eq!(list["items"], json!([]));
    assert_eq!(list["isPublic"], json!(false));
}

#[tokio::test]
#[ignore = "requires PostgreSQL; set DATABASE_URL and run with --ignored"]
async fn password_never_appears_in_any_user_response() {
    let app = test_app().await;

    let (status, created) = send(
        &app,
        "POST",
        "/users",
        Some(json!({
            "name": "Secret Keeper",
            "email": format!("{}@example.com", unique("secret")),
            "password": "do-not-leak"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created.get("password").is_none());
    let user_id = created["id"].as_i64().unwrap();

    let (_, fetched) = send(&app, "GET", &format!("/users/{user_id}"), None).await;
    assert!(fetched.get("password").is_none());

    let (_, listed) = send(&app, "GET", "/users", None).await;
    let mine = listed
        .as_array()
        .unwrap()
        .iter()
        .find(|u| u["id"].as_i64() == Some(user_id))
        .unwrap();
    assert!(mine.get("password").is_none());

    let (_, patched) = send(
        &app,
        "PATCH",
        &format!("/users/{user_id}"),
        Some(json!({ "name": "Renamed" })),
    )
    .await;
    assert_eq!(patched["name"], "Renamed");
    assert!(patched.get("password").is_none());
}

#[tokio::test]
#[ignore = "requires PostgreSQL; set DATABASE_URL and run with --ignored"]
async fn duplicate_email_is_a_conflict() {
    let app = test_app().await;
    let email = format!("{}@example.com", unique("taken"));

    let (status, _) = send(
        &app,
        "POST",
        "/users",
        Some(json!({ "name": "First", "email": email, "password": "pw" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        "POST",
        "/users",
        Some(json!({ "name": "Second", "email": email, "password": "pw" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Already exists");
}

#[tokio::test]
#[ignore = "requires PostgreSQL; set DATABASE_URL and run with --ignored"]
async fn merchant_responses_omit_the_password_too() {
    let app = test_app().await;
    let merchant_id = create_merchant(&app, "Quiet Shop").await;

    let (_, fetched) = send(&app, "GET", &format!("/merchants/{merchant_id}"), None).await;
    assert!(fetched.get("password").is_none());
    assert_eq!(fetched["name"], "Quiet Shop");
}

#[tokio::test]
#[ignore = "requires PostgreSQL; set DATABASE_URL and run with --ignored"]
async fn duplicate_login_is_a_conflict() {
    let app = test_app().await;
    let login = unique("login");

    let (status, _) = send(
        &app,
        "POST",
        "/merchants",
        Some(json!({
            "name": "First Shop",
            "login": login,
            "password": "pw",
            "description": "the first one here"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        "POST",
        "/merchants",
        Some(json!({
            "name": "Second Shop",
            "login": login,
            "password": "pw",
            "description": "wants the same login"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Already exists");
}

#[tokio::test]
#[ignore = "requires PostgreSQL; set DATABASE_URL and run with --ignored"]
async fn duplicate_wishlist_is_a_conflict() {
    let app = test_app().await;
    let user_id = create_user(&app, "hoarder").await;

    let (status, body) = send(&app, "POST", &format!("/users/{user_id}/wishlist"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "WishList already exists");

    // Still exactly one list for the user.
    let (status, _) = send(&app, "GET", &format!("/users/{user_id}/wishlist"), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires PostgreSQL; set DATABASE_URL and run with --ignored"]
async fn wishlist_can_be_deleted_and_recreated() {
    let app = test_app().await;
    let user_id = create_user(&app, "rebuilder").await;

    let (status, body) = send(&app, "DELETE", &format!("/users/{user_id}/wishlist"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "WishList deleted");

    let (status, _) = send(&app, "GET", &format!("/users/{user_id}/wishlist"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, recreated) =
        send(&app, "POST", &format!("/users/{user_id}/wishlist"), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(recreated["userId"].as_i64().unwrap(), user_id);

    // But never for a user that does not exist.
    let (status, body) = send(&app, "POST", "/users/2000000000/wishlist", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
#[ignore = "requires PostgreSQL; set DATABASE_URL and run with --ignored"]
async fn wishlist_title_and_visibility_are_updatable() {
    let app = test_app().await;
    let user_id = create_user(&app, "curator").await;

    let (status, updated) = send(
        &app,
        "PATCH",
        &format!("/users/{user_id}/wishlist"),
        Some(json!({ "title": "Birthday", "isPublic": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Birthday");
    assert_eq!(updated["isPublic"], json!(true));

    // An empty body changes nothing.
    let (_, unchanged) = send(
        &app,
        "PATCH",
        &format!("/users/{user_id}/wishlist"),
        Some(json!({})),
    )
    .await;
    assert_eq!(unchanged["title"], "Birthday");
    assert_eq!(unchanged["isPublic"], json!(true));

    // An explicit null clears the title.
    let (_, cleared) = send(
        &app,
        "PATCH",
        &format!("/users/{user_id}/wishlist"),
        Some(json!({ "title": null })),
    )
    .await;
    assert_eq!(cleared["title"], Value::Null);
    assert_eq!(cleared["isPublic"], json!(true));
}

#[tokio::test]
#[ignore = "requires PostgreSQL; set DATABASE_URL and run with --ignored"]
async fn self_subscription_is_rejected_and_creates_nothing() {
    let app = test_app().await;
    let user_id = create_user(&app, "narcissist").await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/users/{user_id}/subscriptions"),
        Some(json!({ "subscribedToUserId": user_id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Cannot subscribe to oneself");

    let (_, subs) = send(&app, "GET", &format!("/users/{user_id}/subscriptions"), None).await;
    assert_eq!(subs, json!([]));
}

#[tokio::test]
#[ignore = "requires PostgreSQL; set DATABASE_URL and run with --ignored"]
async fn subscriptions_round_trip_with_nested_users() {
    let app = test_app().await;
    let follower = create_user(&app, "follower").await;
    let followed = create_user(&app, "followed").await;

    let (status, sub) = send(
        &app,
        "POST",
        &format!("/users/{follower}/subscriptions"),
        Some(json!({ "subscribedToUserId": followed })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(sub["userId"].as_i64().unwrap(), follower);
    assert_eq!(sub["subscribedToUserId"].as_i64().unwrap(), followed);
    let sub_id = sub["id"].as_i64().unwrap();

    let (_, following) = send(&app, "GET", &format!("/users/{follower}/subscriptions"), None).await;
    let entry = &following.as_array().unwrap()[0];
    assert_eq!(entry["subscribedTo"]["id"].as_i64().unwrap(), followed);
    assert!(entry["subscribedTo"].get("password").is_none());
    assert!(entry["subscribedTo"].get("email").is_some());

    let (_, followers) = send(&app, "GET", &format!("/users/{followed}/subscribers"), None).await;
    let entry = &followers.as_array().unwrap()[0];
    assert_eq!(entry["subscriber"]["id"].as_i64().unwrap(), follower);

    // Only the owning user may remove it.
    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/users/{followed}/subscriptions/{sub_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Subscription not found or not belongs to this user");

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/users/{follower}/subscriptions/{sub_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Unsubscribed");

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/users/{follower}/subscriptions/{sub_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires PostgreSQL; set DATABASE_URL and run with --ignored"]
async fn subscribing_to_a_missing_user_is_not_found() {
    let app = test_app().await;
    let user_id = create_user(&app, "hopeful").await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/users/{user_id}/subscriptions"),
        Some(json!({ "subscribedToUserId": 2000000000 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
#[ignore = "requires PostgreSQL; set DATABASE_URL and run with --ignored"]
async fn foreign_wishlist_item_reads_as_absent() {
    let app = test_app().await;
    let owner = create_user(&app, "owner").await;
    let other = create_user(&app, "other").await;
    let merchant_id = create_merchant(&app, "Item Shop").await;
    let product_id = create_product(&app, merchant_id, "Mug", 500).await;

    let (status, item) = send(
        &app,
        "POST",
        &format!("/users/{owner}/wishlist/items"),
        Some(json!({ "productId": product_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let item_id = item["id"].as_i64().unwrap();

    // Same item id through the wrong user's path is invisible.
    let (status, body) = send(
        &app,
        "GET",
        &format!("/users/{other}/wishlist/items/{item_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Item not found");

    let (status, found) = send(
        &app,
        "GET",
        &format!("/users/{owner}/wishlist/items/{item_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["product"]["id"].as_i64().unwrap(), product_id);
    assert_eq!(found["wishListId"], item["wishListId"]);
}

#[tokio::test]
#[ignore = "requires PostgreSQL; set DATABASE_URL and run with --ignored"]
async fn wishlist_items_carry_status_and_their_product() {
    let app = test_app().await;
    let user_id = create_user(&app, "status-user").await;
    let merchant_id = create_merchant(&app, "Status Shop").await;
    let product_id = create_product(&app, merchant_id, "Lamp", 2500).await;

    let (_, item) = send(
        &app,
        "POST",
        &format!("/users/{user_id}/wishlist/items"),
        Some(json!({ "productId": product_id })),
    )
    .await;
    let item_id = item["id"].as_i64().unwrap();
    assert_eq!(item["status"], Value::Null);

    let (status, updated) = send(
        &app,
        "PATCH",
        &format!("/users/{user_id}/wishlist/items/{item_id}"),
        Some(json!({ "status": "received" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "received");

    let (_, list) = send(&app, "GET", &format!("/users/{user_id}/wishlist"), None).await;
    let nested = &list["items"].as_array().unwrap()[0];
    assert_eq!(nested["status"], "received");
    assert_eq!(nested["product"]["name"], "Lamp");
    assert_eq!(nested["product"]["merchantId"].as_i64().unwrap(), merchant_id);

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/users/{user_id}/wishlist/items/{item_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Item removed from wishlist");

    let (_, items) = send(&app, "GET", &format!("/users/{user_id}/wishlist/items"), None).await;
    assert_eq!(items, json!([]));
}

#[tokio::test]
#[ignore = "requires PostgreSQL; set DATABASE_URL and run with --ignored"]
async fn adding_an_unknown_product_is_not_found() {
    let app = test_app().await;
    let user_id = create_user(&app, "optimist").await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/users/{user_id}/wishlist/items"),
        Some(json!({ "productId": 2000000000 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
#[ignore = "requires PostgreSQL; set DATABASE_URL and run with --ignored"]
async fn patch_changes_only_the_fields_present() {
    let app = test_app().await;
    let merchant_id = create_merchant(&app, "Patch Shop").await;
    let product_id = create_product(&app, merchant_id, "Kettle", 500).await;

    let (status, updated) = send(
        &app,
        "PATCH",
        &format!("/products/{product_id}"),
        Some(json!({ "price": 999 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["price"], 999);
    assert_eq!(updated["name"], "Kettle");
    assert_eq!(updated["description"], "test product");
    assert_eq!(updated["img"], "product.png");

    // Nullable user fields distinguish null from absent.
    let user_id = create_user(&app, "patchee").await;
    let (_, with_img) = send(
        &app,
        "PATCH",
        &format!("/users/{user_id}"),
        Some(json!({ "img": "me.png" })),
    )
    .await;
    assert_eq!(with_img["img"], "me.png");

    let (_, renamed) = send(
        &app,
        "PATCH",
        &format!("/users/{user_id}"),
        Some(json!({ "name": "Still Imaged" })),
    )
    .await;
    assert_eq!(renamed["img"], "me.png");
    assert_eq!(renamed["name"], "Still Imaged");

    let (_, cleared) = send(
        &app,
        "PATCH",
        &format!("/users/{user_id}"),
        Some(json!({ "img": null })),
    )
    .await;
    assert_eq!(cleared["img"], Value::Null);
    assert_eq!(cleared["name"], "Still Imaged");
}

#[tokio::test]
#[ignore = "requires PostgreSQL; set DATABASE_URL and run with --ignored"]
async fn deleting_missing_ids_is_not_found_never_a_server_error() {
    let app = test_app().await;
    for (path, message) in [
        ("/users/2000000000", "User not found"),
        ("/merchants/2000000000", "Merchant not found"),
        ("/products/2000000000", "Product not found"),
        ("/users/2000000000/wishlist", "WishList not found"),
    ] {
        let (status, body) = send(&app, "DELETE", path, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "unexpected status for {path}");
        assert_eq!(body["message"], message, "unexpected message for {path}");
    }
}

#[tokio::test]
#[ignore = "requires PostgreSQL; set DATABASE_URL and run with --ignored"]
async fn merchant_catalog_end_to_end() {
    let app = test_app().await;
    let needle = unique("searchable");
    let merchant_id = create_merchant(&app, "Catalog Shop").await;
    let product_id = create_product(&app, merchant_id, &needle, 1500).await;

    let (status, products) =
        send(&app, "GET", &format!("/merchants/{merchant_id}/products"), None).await;
    assert_eq!(status, StatusCode::OK);
    let products = products.as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["id"].as_i64().unwrap(), product_id);

    let (_, hits) = send(&app, "GET", &format!("/products?search={needle}"), None).await;
    let hits = hits.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["id"].as_i64().unwrap(), product_id);

    let (_, misses) = send(&app, "GET", &format!("/products?search={needle}-nope"), None).await;
    assert_eq!(misses, json!([]));

    let (status, body) = send(&app, "GET", "/merchants/2000000000/products", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Merchant not found");

    let (status, body) = send(
        &app,
        "POST",
        "/products",
        Some(json!({
            "name": "Orphan",
            "description": "no merchant",
            "img": "x.png",
            "price": 10,
            "merchantId": 2000000000
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Merchant not found");
}

#[tokio::test]
#[ignore = "requires PostgreSQL; set DATABASE_URL and run with --ignored"]
async fn negative_prices_are_rejected() {
    let app = test_app().await;
    let merchant_id = create_merchant(&app, "Fair Shop").await;

    let (status, body) = send(
        &app,
        "POST",
        "/products",
        Some(json!({
            "name": "Freebie",
            "description": "pays you",
            "img": "x.png",
            "price": -5,
            "merchantId": merchant_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Price must be non-negative");

    let product_id = create_product(&app, merchant_id, "Soap", 300).await;
    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/products/{product_id}"),
        Some(json!({ "price": -1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires PostgreSQL; set DATABASE_URL and run with --ignored"]
async fn deletes_cascade_through_the_graph() {
    let app = test_app().await;
    let user_id = create_user(&app, "doomed").await;
    let bystander = create_user(&app, "bystander").await;
    let merchant_id = create_merchant(&app, "Doomed Shop").await;
    let product_id = create_product(&app, merchant_id, "Vase", 700).await;

    send(
        &app,
        "POST",
        &format!("/users/{user_id}/wishlist/items"),
        Some(json!({ "productId": product_id })),
    )
    .await;
    send(
        &app,
        "POST",
        &format!("/users/{user_id}/subscriptions"),
        Some(json!({ "subscribedToUserId": bystander })),
    )
    .await;

    let (status, body) = send(&app, "DELETE", &format!("/users/{user_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User deleted");

    let (status, _) = send(&app, "GET", &format!("/users/{user_id}/wishlist"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, followers) = send(&app, "GET", &format!("/users/{bystander}/subscribers"), None).await;
    assert!(followers
        .as_array()
        .unwrap()
        .iter()
        .all(|s| s["userId"].as_i64() != Some(user_id)));

    // Deleting the merchant removes its catalog.
    let (status, _) = send(&app, "DELETE", &format!("/merchants/{merchant_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "GET", &format!("/products/{product_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
