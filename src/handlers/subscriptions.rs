//! Subscription handlers: users following other users' wishlists.

use crate::error::AppError;
use crate::models::{
    CreateSubscription, Subscription, SubscriptionWithSubscriber, SubscriptionWithTarget,
    UserSummary,
};
use crate::response::Message;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};

const SUBSCRIPTION_COLUMNS: &str = "id, user_id, subscribed_to_user_id, created_at, updated_at";

/// A subscription row joined with one side's user, flattened with `u_` aliases.
#[derive(sqlx::FromRow)]
struct SubscriptionUserRow {
    id: i32,
    user_id: i32,
    subscribed_to_user_id: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    u_id: i32,
    u_name: String,
    u_email: String,
}

impl SubscriptionUserRow {
    fn user_summary(&self) -> UserSummary {
        UserSummary {
            id: self.u_id,
            name: self.u_name.clone(),
            email: self.u_email.clone(),
        }
    }
}

/// List whom a user is subscribed to. An unknown user simply has none.
#[utoipa::path(
    get,
    path = "/users/{userId}/subscriptions",
    tag = "Subscriptions",
    params(("userId" = i32, Path, description = "Subscriber's user id")),
    responses(
        (status = 200, description = "Array of subscriptions with the followed user", body = [SubscriptionWithTarget])
    )
)]
pub async fn list_subscriptions(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let rows = sqlx::query_as::<_, SubscriptionUserRow>(
        "SELECT s.id, s.user_id, s.subscribed_to_user_id, s.created_at, s.updated_at, \
         u.id AS u_id, u.name AS u_name, u.email AS u_email \
         FROM subscriptions s JOIN users u ON u.id = s.subscribed_to_user_id \
         WHERE s.user_id = $1 ORDER BY s.id",
    )
    .bind(user_id)
    .fetch_all(&state.pool)
    .await?;
    let subs: Vec<SubscriptionWithTarget> = rows
        .into_iter()
        .map(|row| SubscriptionWithTarget {
            subscribed_to: row.user_summary(),
            id: row.id,
            user_id: row.user_id,
            subscribed_to_user_id: row.subscribed_to_user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
        .collect();
    Ok(Json(subs))
}

/// Subscribe a user to another user. Self-subscription is rejected and
/// both sides must exist.
#[utoipa::path(
    post,
    path = "/users/{userId}/subscriptions",
    tag = "Subscriptions",
    params(("userId" = i32, Path, description = "Subscriber's user id")),
    request_body = CreateSubscription,
    responses(
        (status = 201, description = "Subscription created", body = Subscription),
        (status = 400, description = "Cannot subscribe to oneself", body = Message),
        (status = 404, description = "User not found", body = Message)
    )
)]
pub async fn create_subscription(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    Json(body): Json<CreateSubscription>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    if user_id == body.subscribed_to_user_id {
        return Err(AppError::BadRequest("Cannot subscribe to oneself".into()));
    }
    let (subscriber_exists, target_exists) = sqlx::query_as::<_, (bool, bool)>(
        "SELECT EXISTS (SELECT 1 FROM users WHERE id = $1), \
         EXISTS (SELECT 1 FROM users WHERE id = $2)",
    )
    .bind(user_id)
    .bind(body.subscribed_to_user_id)
    .fetch_one(&state.pool)
    .await?;
    if !subscriber_exists || !target_exists {
        return Err(AppError::NotFound("User not found".into()));
    }
    let sub = sqlx::query_as::<_, Subscription>(&format!(
        "INSERT INTO subscriptions (user_id, subscribed_to_user_id) \
         VALUES ($1, $2) RETURNING {SUBSCRIPTION_COLUMNS}"
    ))
    .bind(user_id)
    .bind(body.subscribed_to_user_id)
    .fetch_one(&state.pool)
    .await?;
    Ok((axum::http::StatusCode::CREATED, Json(sub)))
}

/// List a user's subscribers, each with the follower's public fields.
#[utoipa::path(
    get,
    path = "/users/{userId}/subscribers",
    tag = "Subscriptions",
    params(("userId" = i32, Path, description = "Followed user's id")),
    responses(
        (status = 200, description = "Array of subscriptions with the follower", body = [SubscriptionWithSubscriber])
    )
)]
pub async fn list_subscribers(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let rows = sqlx::query_as::<_, SubscriptionUserRow>(
        "SELECT s.id, s.user_id, s.subscribed_to_user_id, s.created_at, s.updated_at, \
         u.id AS u_id, u.name AS u_name, u.email AS u_email \
         FROM subscriptions s JOIN users u ON u.id = s.user_id \
         WHERE s.subscribed_to_user_id = $1 ORDER BY s.id",
    )
    .bind(user_id)
    .fetch_all(&state.pool)
    .await?;
    let subs: Vec<SubscriptionWithSubscriber> = rows
        .into_iter()
        .map(|row| SubscriptionWithSubscriber {
            subscriber: row.user_summary(),
            id: row.id,
            user_id: row.user_id,
            subscribed_to_user_id: row.subscribed_to_user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
        .collect();
    Ok(Json(subs))
}

/// Unsubscribe. The subscription must belong to the user in the path.
#[utoipa::path(
    delete,
    path = "/users/{userId}/subscriptions/{subscriptionId}",
    tag = "Subscriptions",
    params(
        ("userId" = i32, Path, description = "Subscriber's user id"),
        ("subscriptionId" = i32, Path, description = "Subscription id")
    ),
    responses(
        (status = 200, description = "Unsubscribed", body = Message),
        (status = 404, description = "Subscription not found", body = Message)
    )
)]
pub async fn delete_subscription(
    State(state): State<AppState>,
    Path((user_id, subscription_id)): Path<(i32, i32)>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    sqlx::query_scalar::<_, i32>(
        "DELETE FROM subscriptions WHERE id = $1 AND user_id = $2 RETURNING id",
    )
    .bind(subscription_id)
    .bind(user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| {
        AppError::NotFound("Subscription not found or not belongs to this user".into())
    })?;
    Ok(Json(Message::new("Unsubscribed")))
}
