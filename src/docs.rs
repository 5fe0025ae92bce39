//! OpenAPI document assembly and the `/api-docs` viewer.
//!
//! The document is generated at runtime from the handler annotations; the
//! viewer is a static shell that loads Swagger UI from a CDN and points it
//! at `/api-docs/openapi.json`.

use axum::{response::Html, routing::get, Json, Router};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Wishlist",
        description = "Wishlists, merchants, products, and user subscriptions"
    ),
    paths(
        crate::handlers::users::list_users,
        crate::handlers::users::create_user,
        crate::handlers::users::get_user,
        crate::handlers::users::update_user,
        crate::handlers::users::delete_user,
        crate::handlers::merchants::list_merchants,
        crate::handlers::merchants::create_merchant,
        crate::handlers::merchants::get_merchant,
        crate::handlers::merchants::update_merchant,
        crate::handlers::merchants::delete_merchant,
        crate::handlers::merchants::list_merchant_products,
        crate::handlers::products::list_products,
        crate::handlers::products::create_product,
        crate::handlers::products::get_product,
        crate::handlers::products::update_product,
        crate::handlers::products::delete_product,
        crate::handlers::wishlists::get_wishlist,
        crate::handlers::wishlists::create_wishlist,
        crate::handlers::wishlists::update_wishlist,
        crate::handlers::wishlists::delete_wishlist,
        crate::handlers::wishlist_items::list_wishlist_items,
        crate::handlers::wishlist_items::add_wishlist_item,
        crate::handlers::wishlist_items::get_wishlist_item,
        crate::handlers::wishlist_items::update_wishlist_item,
        crate::handlers::wishlist_items::remove_wishlist_item,
        crate::handlers::subscriptions::list_subscriptions,
        crate::handlers::subscriptions::create_subscription,
        crate::handlers::subscriptions::list_subscribers,
        crate::handlers::subscriptions::delete_subscription,
    ),
    components(schemas(
        crate::models::User,
        crate::models::Merchant,
        crate::models::Product,
        crate::models::WishList,
        crate::models::WishListItem,
        crate::models::Subscription,
        crate::models::UserSummary,
        crate::models::WishListWithItems,
        crate::models::WishListItemWithProduct,
        crate::models::SubscriptionWithTarget,
        crate::models::SubscriptionWithSubscriber,
        crate::models::CreateUser,
        crate::models::CreateMerchant,
        crate::models::CreateProduct,
        crate::models::CreateWishListItem,
        crate::models::CreateSubscription,
        crate::models::UpdateUser,
        crate::models::UpdateMerchant,
        crate::models::UpdateProduct,
        crate::models::UpdateWishList,
        crate::models::UpdateWishListItem,
        crate::response::Message,
    )),
    tags(
        (name = "Users", description = "User accounts"),
        (name = "Merchants", description = "Merchant accounts"),
        (name = "Products", description = "Merchant catalog"),
        (name = "WishList", description = "One wishlist per user"),
        (name = "WishListItem", description = "Products saved in a wishlist"),
        (name = "Subscriptions", description = "Users following other users")
    )
)]
pub struct ApiDoc;

const SWAGGER_PAGE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>Wishlist API docs</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.onload = () => {
      SwaggerUIBundle({ url: "/api-docs/openapi.json", dom_id: "#swagger-ui" });
    };
  </script>
</body>
</html>"##;

async fn swagger_page() -> Html<&'static str> {
    Html(SWAGGER_PAGE)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// GET /api-docs (viewer) and GET /api-docs/openapi.json (document).
pub fn docs_routes() -> Router {
    Router::new()
        .route("/api-docs", get(swagger_page))
        .route("/api-docs/openapi.json", get(openapi_json))
}
