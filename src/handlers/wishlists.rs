//! Wishlist handlers. Every wishlist is addressed through its owner:
//! `/users/{userId}/wishlist`, one list per user.

use crate::error::AppError;
use crate::models::{UpdateWishList, WishList, WishListWithItems};
use crate::response::Message;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};

const WISHLIST_COLUMNS: &str = "id, user_id, title, is_public, created_at, updated_at";

pub(super) async fn fetch_wishlist_of_user(
    pool: &sqlx::PgPool,
    user_id: i32,
) -> Result<Option<WishList>, AppError> {
    let list = sqlx::query_as::<_, WishList>(&format!(
        "SELECT {WISHLIST_COLUMNS} FROM wish_lists WHERE user_id = $1"
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(list)
}

/// Fetch a user's wishlist with its items and each item's product.
#[utoipa::path(
    get,
    path = "/users/{userId}/wishlist",
    tag = "WishList",
    params(("userId" = i32, Path, description = "Owning user id")),
    responses(
        (status = 200, description = "The wishlist with nested items", body = WishListWithItems),
        (status = 404, description = "WishList not found", body = Message)
    )
)]
pub async fn get_wishlist(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let list = fetch_wishlist_of_user(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("WishList not found".into()))?;
    let items = super::wishlist_items::fetch_items_with_products(&state.pool, list.id).await?;
    Ok(Json(WishListWithItems::assemble(list, items)))
}

/// Create the wishlist for a user who somehow lacks one (normally it is
/// created with the user). Duplicate creation trips the unique index on
/// `user_id` and reports a conflict.
#[utoipa::path(
    post,
    path = "/users/{userId}/wishlist",
    tag = "WishList",
    params(("userId" = i32, Path, description = "Owning user id")),
    responses(
        (status = 201, description = "WishList created", body = WishList),
        (status = 404, description = "User not found", body = Message),
        (status = 409, description = "WishList already exists", body = Message)
    )
)]
pub async fn create_wishlist(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let user_exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
            .bind(user_id)
            .fetch_one(&state.pool)
            .await?;
    if !user_exists {
        return Err(AppError::NotFound("User not found".into()));
    }
    let list = sqlx::query_as::<_, WishList>(&format!(
        "INSERT INTO wish_lists (user_id) VALUES ($1) RETURNING {WISHLIST_COLUMNS}"
    ))
    .bind(user_id)
    .fetch_one(&state.pool)
    .await
    .map_err(|err| match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict("WishList already exists".into())
        }
        _ => AppError::Db(err),
    })?;
    Ok((axum::http::StatusCode::CREATED, Json(list)))
}

/// Apply optional `title` / `isPublic` changes to a user's wishlist.
#[utoipa::path(
    patch,
    path = "/users/{userId}/wishlist",
    tag = "WishList",
    params(("userId" = i32, Path, description = "Owning user id")),
    request_body = UpdateWishList,
    responses(
        (status = 200, description = "Updated wishlist", body = WishList),
        (status = 404, description = "WishList not found", body = Message)
    )
)]
pub async fn update_wishlist(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    Json(body): Json<UpdateWishList>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let mut qb = sqlx::QueryBuilder::new("UPDATE wish_lists SET updated_at = NOW()");
    if let Some(title) = &body.title {
        qb.push(", title = ").push_bind(title);
    }
    if let Some(is_public) = body.is_public {
        qb.push(", is_public = ").push_bind(is_public);
    }
    qb.push(" WHERE user_id = ").push_bind(user_id);
    qb.push(format!(" RETURNING {WISHLIST_COLUMNS}"));
    tracing::debug!(sql = qb.sql(), "query");
    let list = qb
        .build_query_as::<WishList>()
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("WishList not found".into()))?;
    Ok(Json(list))
}

/// Delete a user's wishlist along with its items.
#[utoipa::path(
    delete,
    path = "/users/{userId}/wishlist",
    tag = "WishList",
    params(("userId" = i32, Path, description = "Owning user id")),
    responses(
        (status = 200, description = "WishList deleted", body = Message),
        (status = 404, description = "WishList not found", body = Message)
    )
)]
pub async fn delete_wishlist(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    sqlx::query_scalar::<_, i32>("DELETE FROM wish_lists WHERE user_id = $1 RETURNING id")
        .bind(user_id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("WishList not found".into()))?;
    Ok(Json(Message::new("WishList deleted")))
}
