//! Merchant handlers: list with search, create, read, update, delete,
//! and the merchant's product listing.

use crate::error::AppError;
use crate::models::{CreateMerchant, ListQuery, Merchant, Product, UpdateMerchant};
use crate::response::Message;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};

const MERCHANT_COLUMNS: &str =
    "id, name, login, img, description, address, address_link, created_at, updated_at";

/// List merchants, optionally filtered by a name substring. Passwords are
/// never selected.
#[utoipa::path(
    get,
    path = "/merchants",
    tag = "Merchants",
    params(ListQuery),
    responses((status = 200, description = "Array of merchants", body = [Merchant]))
)]
pub async fn list_merchants(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let mut qb = sqlx::QueryBuilder::new(format!("SELECT {MERCHANT_COLUMNS} FROM merchants"));
    if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
        qb.push(" WHERE name LIKE ").push_bind(format!("%{}%", search));
    }
    qb.push(" ORDER BY id");
    let merchants = qb
        .build_query_as::<Merchant>()
        .fetch_all(&state.pool)
        .await?;
    Ok(Json(merchants))
}

#[utoipa::path(
    post,
    path = "/merchants",
    tag = "Merchants",
    request_body = CreateMerchant,
    responses(
        (status = 201, description = "Merchant created", body = Merchant),
        (status = 409, description = "Login already taken", body = Message)
    )
)]
pub async fn create_merchant(
    State(state): State<AppState>,
    Json(body): Json<CreateMerchant>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let merchant = sqlx::query_as::<_, Merchant>(&format!(
        "INSERT INTO merchants (name, login, password, img, description, address, address_link) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {MERCHANT_COLUMNS}"
    ))
    .bind(&body.name)
    .bind(&body.login)
    .bind(&body.password)
    .bind(&body.img)
    .bind(&body.description)
    .bind(&body.address)
    .bind(&body.address_link)
    .fetch_one(&state.pool)
    .await?;
    Ok((axum::http::StatusCode::CREATED, Json(merchant)))
}

#[utoipa::path(
    get,
    path = "/merchants/{merchantId}",
    tag = "Merchants",
    params(("merchantId" = i32, Path, description = "Merchant id")),
    responses(
        (status = 200, description = "The merchant", body = Merchant),
        (status = 404, description = "Merchant not found", body = Message)
    )
)]
pub async fn get_merchant(
    State(state): State<AppState>,
    Path(merchant_id): Path<i32>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let merchant = sqlx::query_as::<_, Merchant>(&format!(
        "SELECT {MERCHANT_COLUMNS} FROM merchants WHERE id = $1"
    ))
    .bind(merchant_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Merchant not found".into()))?;
    Ok(Json(merchant))
}

#[utoipa::path(
    patch,
    path = "/merchants/{merchantId}",
    tag = "Merchants",
    params(("merchantId" = i32, Path, description = "Merchant id")),
    request_body = UpdateMerchant,
    responses(
        (status = 200, description = "Updated merchant", body = Merchant),
        (status = 404, description = "Merchant not found", body = Message)
    )
)]
pub async fn update_merchant(
    State(state): State<AppState>,
    Path(merchant_id): Path<i32>,
    Json(body): Json<UpdateMerchant>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let mut qb = sqlx::QueryBuilder::new("UPDATE merchants SET updated_at = NOW()");
    if let Some(name) = &body.name {
        qb.push(", name = ").push_bind(name);
    }
    if let Some(img) = &body.img {
        qb.push(", img = ").push_bind(img);
    }
    if let Some(description) = &body.description {
        qb.push(", description = ").push_bind(description);
    }
    if let Some(address) = &body.address {
        qb.push(", address = ").push_bind(address);
    }
    if let Some(address_link) = &body.address_link {
        qb.push(", address_link = ").push_bind(address_link);
    }
    qb.push(" WHERE id = ").push_bind(merchant_id);
    qb.push(format!(" RETURNING {MERCHANT_COLUMNS}"));
    tracing::debug!(sql = qb.sql(), "query");
    let merchant = qb
        .build_query_as::<Merchant>()
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Merchant not found".into()))?;
    Ok(Json(merchant))
}

/// Delete a merchant and, via cascade, every product it sells.
#[utoipa::path(
    delete,
    path = "/merchants/{merchantId}",
    tag = "Merchants",
    params(("merchantId" = i32, Path, description = "Merchant id")),
    responses(
        (status = 200, description = "Merchant deleted", body = Message),
        (status = 404, description = "Merchant not found", body = Message)
    )
)]
pub async fn delete_merchant(
    State(state): State<AppState>,
    Path(merchant_id): Path<i32>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    sqlx::query_scalar::<_, i32>("DELETE FROM merchants WHERE id = $1 RETURNING id")
        .bind(merchant_id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Merchant not found".into()))?;
    Ok(Json(Message::new("Merchant deleted")))
}

/// Everything a merchant sells. The merchant must exist even when the
/// listing would be empty.
#[utoipa::path(
    get,
    path = "/merchants/{merchantId}/products",
    tag = "Merchants",
    params(("merchantId" = i32, Path, description = "Merchant id")),
    responses(
        (status = 200, description = "The merchant's products", body = [Product]),
        (status = 404, description = "Merchant not found", body = Message)
    )
)]
pub async fn list_merchant_products(
    State(state): State<AppState>,
    Path(merchant_id): Path<i32>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let merchant_exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM merchants WHERE id = $1)")
            .bind(merchant_id)
            .fetch_one(&state.pool)
            .await?;
    if !merchant_exists {
        return Err(AppError::NotFound("Merchant not found".into()));
    }
    let products = sqlx::query_as::<_, Product>(&format!(
        "SELECT {} FROM products WHERE merchant_id = $1 ORDER BY id",
        super::products::PRODUCT_COLUMNS
    ))
    .bind(merchant_id)
    .fetch_all(&state.pool)
    .await?;
    Ok(Json(products))
}
