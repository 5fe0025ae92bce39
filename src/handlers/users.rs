//! User account handlers: list, create, read, update, delete.

use crate::error::AppError;
use crate::models::{CreateUser, UpdateUser, User};
use crate::response::Message;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};

const USER_COLUMNS: &str = "id, name, email, date_of_birth, img, created_at, updated_at";

/// List all users. Passwords are never selected.
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    responses((status = 200, description = "Array of users", body = [User]))
)]
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let users =
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
            .fetch_all(&state.pool)
            .await?;
    Ok(Json(users))
}

/// Create a user together with their (initially empty) wishlist.
/// Both rows are written in one transaction so a user never exists
/// without a wishlist.
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 409, description = "Email already taken", body = Message)
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUser>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let mut tx = state.pool.begin().await?;
    let user = sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (name, email, password, date_of_birth, img) \
         VALUES ($1, $2, $3, $4, $5) RETURNING {USER_COLUMNS}"
    ))
    .bind(&body.name)
    .bind(&body.email)
    .bind(&body.password)
    .bind(body.date_of_birth)
    .bind(&body.img)
    .fetch_one(&mut *tx)
    .await?;
    sqlx::query("INSERT INTO wish_lists (user_id) VALUES ($1)")
        .bind(user.id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok((axum::http::StatusCode::CREATED, Json(user)))
}

/// Fetch one user by id.
#[utoipa::path(
    get,
    path = "/users/{userId}",
    tag = "Users",
    params(("userId" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "The user, password omitted", body = User),
        (status = 404, description = "User not found", body = Message)
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let user =
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(user_id)
            .fetch_optional(&state.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(Json(user))
}

/// Apply the fields present in the body; absent fields stay untouched,
/// explicit nulls clear nullable columns.
#[utoipa::path(
    patch,
    path = "/users/{userId}",
    tag = "Users",
    params(("userId" = i32, Path, description = "User id")),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 404, description = "User not found", body = Message)
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    Json(body): Json<UpdateUser>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let mut qb = sqlx::QueryBuilder::new("UPDATE users SET updated_at = NOW()");
    if let Some(name) = &body.name {
        qb.push(", name = ").push_bind(name);
    }
    if let Some(email) = &body.email {
        qb.push(", email = ").push_bind(email);
    }
    if let Some(date_of_birth) = body.date_of_birth {
        qb.push(", date_of_birth = ").push_bind(date_of_birth);
    }
    if let Some(img) = &body.img {
        qb.push(", img = ").push_bind(img);
    }
    qb.push(" WHERE id = ").push_bind(user_id);
    qb.push(format!(" RETURNING {USER_COLUMNS}"));
    tracing::debug!(sql = qb.sql(), "query");
    let user = qb
        .build_query_as::<User>()
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(Json(user))
}

/// Delete a user. The wishlist, its items, and all subscriptions in
/// either direction go with it via cascading foreign keys.
#[utoipa::path(
    delete,
    path = "/users/{userId}",
    tag = "Users",
    params(("userId" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = Message),
        (status = 404, description = "User not found", body = Message)
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    sqlx::query_scalar::<_, i32>("DELETE FROM users WHERE id = $1 RETURNING id")
        .bind(user_id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(Json(Message::new("User deleted")))
}
