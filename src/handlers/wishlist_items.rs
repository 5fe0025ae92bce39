//! Wishlist item handlers, nested under `/users/{userId}/wishlist/items`.
//! Items are always resolved through the owner's wishlist, so an item id
//! from someone else's list reads as absent.

use crate::error::AppError;
use crate::models::{
    CreateWishListItem, Product, UpdateWishListItem, WishListItem, WishListItemWithProduct,
};
use crate::response::Message;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};

const ITEM_COLUMNS: &str = "id, wish_list_id, product_id, status, created_at, updated_at";

const ITEM_PRODUCT_SELECT: &str = "SELECT i.id, i.wish_list_id, i.product_id, i.status, \
     i.created_at, i.updated_at, \
     p.id AS p_id, p.name AS p_name, p.description AS p_description, p.img AS p_img, \
     p.price AS p_price, p.merchant_id AS p_merchant_id, \
     p.created_at AS p_created_at, p.updated_at AS p_updated_at \
     FROM wish_list_items i JOIN products p ON p.id = i.product_id";

/// One joined row of an item and its product, flattened with `p_` aliases.
#[derive(sqlx::FromRow)]
struct ItemProductRow {
    id: i32,
    wish_list_id: i32,
    product_id: i32,
    status: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    p_id: i32,
    p_name: String,
    p_description: String,
    p_img: String,
    p_price: i32,
    p_merchant_id: i32,
    p_created_at: DateTime<Utc>,
    p_updated_at: DateTime<Utc>,
}

impl ItemProductRow {
    fn into_item(self) -> WishListItemWithProduct {
        WishListItemWithProduct {
            id: self.id,
            wish_list_id: self.wish_list_id,
            product_id: self.product_id,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
            product: Product {
                id: self.p_id,
                name: self.p_name,
                description: self.p_description,
                img: self.p_img,
                price: self.p_price,
                merchant_id: self.p_merchant_id,
                created_at: self.p_created_at,
                updated_at: self.p_updated_at,
            },
        }
    }
}

pub(super) async fn fetch_items_with_products(
    pool: &sqlx::PgPool,
    wish_list_id: i32,
) -> Result<Vec<WishListItemWithProduct>, AppError> {
    let rows = sqlx::query_as::<_, ItemProductRow>(&format!(
        "{ITEM_PRODUCT_SELECT} WHERE i.wish_list_id = $1 ORDER BY i.id"
    ))
    .bind(wish_list_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(ItemProductRow::into_item).collect())
}

async fn wishlist_or_not_found(
    pool: &sqlx::PgPool,
    user_id: i32,
) -> Result<crate::models::WishList, AppError> {
    super::wishlists::fetch_wishlist_of_user(pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("WishList not found".into()))
}

/// List every item in a user's wishlist, each with its product.
#[utoipa::path(
    get,
    path = "/users/{userId}/wishlist/items",
    tag = "WishListItem",
    params(("userId" = i32, Path, description = "Owning user id")),
    responses(
        (status = 200, description = "Array of items", body = [WishListItemWithProduct]),
        (status = 404, description = "WishList not found", body = Message)
    )
)]
pub async fn list_wishlist_items(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let list = wishlist_or_not_found(&state.pool, user_id).await?;
    let items = fetch_items_with_products(&state.pool, list.id).await?;
    Ok(Json(items))
}

/// Add a product to a user's wishlist.
#[utoipa::path(
    post,
    path = "/users/{userId}/wishlist/items",
    tag = "WishListItem",
    params(("userId" = i32, Path, description = "Owning user id")),
    request_body = CreateWishListItem,
    responses(
        (status = 201, description = "Item created", body = WishListItem),
        (status = 404, description = "WishList or product not found", body = Message)
    )
)]
pub async fn add_wishlist_item(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    Json(body): Json<CreateWishListItem>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let list = wishlist_or_not_found(&state.pool, user_id).await?;
    let product_exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM products WHERE id = $1)")
            .bind(body.product_id)
            .fetch_one(&state.pool)
            .await?;
    if !product_exists {
        return Err(AppError::NotFound("Product not found".into()));
    }
    let item = sqlx::query_as::<_, WishListItem>(&format!(
        "INSERT INTO wish_list_items (wish_list_id, product_id) \
         VALUES ($1, $2) RETURNING {ITEM_COLUMNS}"
    ))
    .bind(list.id)
    .bind(body.product_id)
    .fetch_one(&state.pool)
    .await?;
    Ok((axum::http::StatusCode::CREATED, Json(item)))
}

/// Fetch one item from a user's wishlist, with its product.
#[utoipa::path(
    get,
    path = "/users/{userId}/wishlist/items/{itemId}",
    tag = "WishListItem",
    params(
        ("userId" = i32, Path, description = "Owning user id"),
        ("itemId" = i32, Path, description = "Item id")
    ),
    responses(
        (status = 200, description = "The item", body = WishListItemWithProduct),
        (status = 404, description = "WishList or item not found", body = Message)
    )
)]
pub async fn get_wishlist_item(
    State(state): State<AppState>,
    Path((user_id, item_id)): Path<(i32, i32)>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let list = wishlist_or_not_found(&state.pool, user_id).await?;
    let row = sqlx::query_as::<_, ItemProductRow>(&format!(
        "{ITEM_PRODUCT_SELECT} WHERE i.id = $1 AND i.wish_list_id = $2"
    ))
    .bind(item_id)
    .bind(list.id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Item not found".into()))?;
    Ok(Json(row.into_item()))
}

/// Update an item's `status` if present in the body.
#[utoipa::path(
    patch,
    path = "/users/{userId}/wishlist/items/{itemId}",
    tag = "WishListItem",
    params(
        ("userId" = i32, Path, description = "Owning user id"),
        ("itemId" = i32, Path, description = "Item id")
    ),
    request_body = UpdateWishListItem,
    responses(
        (status = 200, description = "Updated item", body = WishListItem),
        (status = 404, description = "WishList or item not found", body = Message)
    )
)]
pub async fn update_wishlist_item(
    State(state): State<AppState>,
    Path((user_id, item_id)): Path<(i32, i32)>,
    Json(body): Json<UpdateWishListItem>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let list = wishlist_or_not_found(&state.pool, user_id).await?;
    let mut qb = sqlx::QueryBuilder::new("UPDATE wish_list_items SET updated_at = NOW()");
    if let Some(status) = &body.status {
        qb.push(", status = ").push_bind(status);
    }
    qb.push(" WHERE id = ").push_bind(item_id);
    qb.push(" AND wish_list_id = ").push_bind(list.id);
    qb.push(format!(" RETURNING {ITEM_COLUMNS}"));
    tracing::debug!(sql = qb.sql(), "query");
    let item = qb
        .build_query_as::<WishListItem>()
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Item not found".into()))?;
    Ok(Json(item))
}

/// Remove an item from a user's wishlist.
#[utoipa::path(
    delete,
    path = "/users/{userId}/wishlist/items/{itemId}",
    tag = "WishListItem",
    params(
        ("userId" = i32, Path, description = "Owning user id"),
        ("itemId" = i32, Path, description = "Item id")
    ),
    responses(
        (status = 200, description = "Item removed", body = Message),
        (status = 404, description = "WishList or item not found", body = Message)
    )
)]
pub async fn remove_wishlist_item(
    State(state): State<AppState>,
    Path((user_id, item_id)): Path<(i32, i32)>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let list = wishlist_or_not_found(&state.pool, user_id).await?;
    sqlx::query_scalar::<_, i32>(
        "DELETE FROM wish_list_items WHERE id = $1 AND wish_list_id = $2 RETURNING id",
    )
    .bind(item_id)
    .bind(list.id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Item not found".into()))?;
    Ok(Json(Message::new("Item removed from wishlist")))
}
