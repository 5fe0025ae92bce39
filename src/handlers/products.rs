//! Product catalog handlers: list with search, create, read, update, delete.

use crate::error::AppError;
use crate::models::{CreateProduct, ListQuery, Product, UpdateProduct};
use crate::response::Message;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};

pub(super) const PRODUCT_COLUMNS: &str =
    "id, name, description, img, price, merchant_id, created_at, updated_at";

/// List products, optionally filtered by a name substring.
#[utoipa::path(
    get,
    path = "/products",
    tag = "Products",
    params(ListQuery),
    responses((status = 200, description = "Array of products", body = [Product]))
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let mut qb = sqlx::QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM products"));
    if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
        qb.push(" WHERE name LIKE ").push_bind(format!("%{}%", search));
    }
    qb.push(" ORDER BY id");
    let products = qb
        .build_query_as::<Product>()
        .fetch_all(&state.pool)
        .await?;
    Ok(Json(products))
}

/// Create a product under an existing merchant. An unknown `merchantId`
/// is rejected up front instead of surfacing as a raw constraint error.
#[utoipa::path(
    post,
    path = "/products",
    tag = "Products",
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Negative price", body = Message),
        (status = 404, description = "Merchant not found", body = Message)
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(body): Json<CreateProduct>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    if body.price < 0 {
        return Err(AppError::BadRequest("Price must be non-negative".into()));
    }
    let merchant_exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM merchants WHERE id = $1)")
            .bind(body.merchant_id)
            .fetch_one(&state.pool)
            .await?;
    if !merchant_exists {
        return Err(AppError::NotFound("Merchant not found".into()));
    }
    let product = sqlx::query_as::<_, Product>(&format!(
        "INSERT INTO products (name, description, img, price, merchant_id) \
         VALUES ($1, $2, $3, $4, $5) RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(&body.name)
    .bind(&body.description)
    .bind(&body.img)
    .bind(body.price)
    .bind(body.merchant_id)
    .fetch_one(&state.pool)
    .await?;
    Ok((axum::http::StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    get,
    path = "/products/{productId}",
    tag = "Products",
    params(("productId" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "The product", body = Product),
        (status = 404, description = "Product not found", body = Message)
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let product = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
    ))
    .bind(product_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Product not found".into()))?;
    Ok(Json(product))
}

#[utoipa::path(
    patch,
    path = "/products/{productId}",
    tag = "Products",
    params(("productId" = i32, Path, description = "Product id")),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Updated product", body = Product),
        (status = 400, description = "Negative price", body = Message),
        (status = 404, description = "Product not found", body = Message)
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
    Json(body): Json<UpdateProduct>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    if matches!(body.price, Some(p) if p < 0) {
        return Err(AppError::BadRequest("Price must be non-negative".into()));
    }
    let mut qb = sqlx::QueryBuilder::new("UPDATE products SET updated_at = NOW()");
    if let Some(name) = &body.name {
        qb.push(", name = ").push_bind(name);
    }
    if let Some(description) = &body.description {
        qb.push(", description = ").push_bind(description);
    }
    if let Some(img) = &body.img {
        qb.push(", img = ").push_bind(img);
    }
    if let Some(price) = body.price {
        qb.push(", price = ").push_bind(price);
    }
    qb.push(" WHERE id = ").push_bind(product_id);
    qb.push(format!(" RETURNING {PRODUCT_COLUMNS}"));
    tracing::debug!(sql = qb.sql(), "query");
    let product = qb
        .build_query_as::<Product>()
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".into()))?;
    Ok(Json(product))
}

/// Delete a product; wishlist items referencing it are removed by cascade.
#[utoipa::path(
    delete,
    path = "/products/{productId}",
    tag = "Products",
    params(("productId" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted", body = Message),
        (status = 404, description = "Product not found", body = Message)
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    sqlx::query_scalar::<_, i32>("DELETE FROM products WHERE id = $1 RETURNING id")
        .bind(product_id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".into()))?;
    Ok(Json(Message::new("Product deleted")))
}
