//! Route composition: REST resources, API docs, and operational endpoints.

use crate::docs;
use crate::handlers::{
    add_wishlist_item, create_merchant, create_product, create_subscription, create_user,
    create_wishlist, delete_merchant, delete_product, delete_subscription, delete_user,
    delete_wishlist, get_merchant, get_product, get_user, get_wishlist, get_wishlist_item,
    list_merchant_products, list_merchants, list_products, list_subscribers, list_subscriptions,
    list_users, list_wishlist_items, remove_wishlist_item, update_merchant, update_product,
    update_user, update_wishlist, update_wishlist_item,
};
use crate::state::AppState;
use axum::{
    extract::State,
    routing::{delete, get},
    Json, Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer};

const MAX_BODY_BYTES: usize = 1024 * 1024;

/// All REST resources. Wishlists, items, and subscriptions hang off the
/// owning user's path.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:user_id",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .route(
            "/users/:user_id/wishlist",
            get(get_wishlist)
                .post(create_wishlist)
                .patch(update_wishlist)
                .delete(delete_wishlist),
        )
        .route(
            "/users/:user_id/wishlist/items",
            get(list_wishlist_items).post(add_wishlist_item),
        )
        .route(
            "/users/:user_id/wishlist/items/:item_id",
            get(get_wishlist_item)
                .patch(update_wishlist_item)
                .delete(remove_wishlist_item),
        )
        .route(
            "/users/:user_id/subscriptions",
            get(list_subscriptions).post(create_subscription),
        )
        .route(
            "/users/:user_id/subscriptions/:subscription_id",
            delete(delete_subscription),
        )
        .route("/users/:user_id/subscribers", get(list_subscribers))
        .route("/merchants", get(list_merchants).post(create_merchant))
        .route(
            "/merchants/:merchant_id",
            get(get_merchant).patch(update_merchant).delete(delete_merchant),
        )
        .route("/merchants/:merchant_id/products", get(list_merchant_products))
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/:product_id",
            get(get_product).patch(update_product).delete(delete_product),
        )
        .with_state(state)
}

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
}

#[derive(Serialize)]
struct ReadyBody {
    status: &'static str,
    database: &'static str,
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

async fn ready(
    State(state): State<AppState>,
) -> Result<Json<ReadyBody>, (axum::http::StatusCode, Json<ReadyBody>)> {
    if sqlx::query("SELECT 1").fetch_optional(&state.pool).await.is_err() {
        return Err((
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadyBody {
                status: "degraded",
                database: "unavailable",
            }),
        ));
    }
    Ok(Json(ReadyBody {
        status: "ok",
        database: "ok",
    }))
}

async fn version() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Operational routes: GET /health, GET /ready, GET /version.
pub fn ops_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/version", get(version))
        .with_state(state)
}

/// The full application: resources, docs, and ops with the shared layers.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(api_routes(state.clone()))
        .merge(ops_routes(state))
        .merge(docs::docs_routes())
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
}
