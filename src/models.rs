//! Entities and request payloads.
//!
//! Wire names follow the public API: foreign keys and timestamps are
//! camelCase (`userId`, `merchantId`, `createdAt`), plain attributes keep
//! snake_case (`date_of_birth`, `address_link`). Password columns exist in
//! the schema but never on a response type, so they cannot leak.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

// ---------------------------------------------------------------------------
// Entities as returned by the API.

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub date_of_birth: Option<NaiveDate>,
    pub img: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Merchant {
    pub id: i32,
    pub name: String,
    pub login: String,
    pub img: Option<String>,
    pub description: String,
    pub address: Option<String>,
    pub address_link: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub img: String,
    /// Price in the currency's minor unit, never negative.
    pub price: i32,
    #[serde(rename = "merchantId")]
    pub merchant_id: i32,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct WishList {
    pub id: i32,
    #[serde(rename = "userId")]
    pub user_id: i32,
    pub title: Option<String>,
    #[serde(rename = "isPublic")]
    pub is_public: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct WishListItem {
    pub id: i32,
    #[serde(rename = "wishListId")]
    pub wish_list_id: i32,
    #[serde(rename = "productId")]
    pub product_id: i32,
    /// Free-form application data, e.g. "reserved" or "received".
    pub status: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Subscription {
    pub id: i32,
    #[serde(rename = "userId")]
    pub user_id: i32,
    #[serde(rename = "subscribedToUserId")]
    pub subscribed_to_user_id: i32,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Public slice of a user, embedded in subscription listings.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct UserSummary {
    pub id: i32,
    pub name: String,
    pub email: String,
}

// ---------------------------------------------------------------------------
// Assembled read models for the eager-loading endpoints.

#[derive(Debug, Serialize, ToSchema)]
pub struct WishListItemWithProduct {
    pub id: i32,
    #[serde(rename = "wishListId")]
    pub wish_list_id: i32,
    #[serde(rename = "productId")]
    pub product_id: i32,
    pub status: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    pub product: Product,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WishListWithItems {
    pub id: i32,
    #[serde(rename = "userId")]
    pub user_id: i32,
    pub title: Option<String>,
    #[serde(rename = "isPublic")]
    pub is_public: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    pub items: Vec<WishListItemWithProduct>,
}

impl WishListWithItems {
    pub fn assemble(list: WishList, items: Vec<WishListItemWithProduct>) -> Self {
        WishListWithItems {
            id: list.id,
            user_id: list.user_id,
            title: list.title,
            is_public: list.is_public,
            created_at: list.created_at,
            updated_at: list.updated_at,
            items,
        }
    }
}

/// A subscription row with the followed user's public fields.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubscriptionWithTarget {
    pub id: i32,
    #[serde(rename = "userId")]
    pub user_id: i32,
    #[serde(rename = "subscribedToUserId")]
    pub subscribed_to_user_id: i32,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "subscribedTo")]
    pub subscribed_to: UserSummary,
}

/// A subscription row with the follower's public fields.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubscriptionWithSubscriber {
    pub id: i32,
    #[serde(rename = "userId")]
    pub user_id: i32,
    #[serde(rename = "subscribedToUserId")]
    pub subscribed_to_user_id: i32,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    pub subscriber: UserSummary,
}

// ---------------------------------------------------------------------------
// Create payloads.

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub date_of_birth: Option<NaiveDate>,
    pub img: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMerchant {
    pub name: String,
    pub login: String,
    pub password: String,
    pub description: String,
    pub img: Option<String>,
    pub address: Option<String>,
    pub address_link: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProduct {
    pub name: String,
    pub description: String,
    pub img: String,
    pub price: i32,
    #[serde(rename = "merchantId")]
    pub merchant_id: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateWishListItem {
    #[serde(rename = "productId")]
    pub product_id: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSubscription {
    #[serde(rename = "subscribedToUserId")]
    pub subscribed_to_user_id: i32,
}

/// Query parameters for the merchant and product listings.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Substring match on the name column; empty means no filter.
    pub search: Option<String>,
}

// ---------------------------------------------------------------------------
// Partial-update payloads. Only fields present in the body are applied.
// Nullable columns use the double-Option pattern so "field": null clears the
// column while an absent field leaves it untouched.

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<NaiveDate>)]
    pub date_of_birth: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub img: Option<Option<String>>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateMerchant {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub img: Option<Option<String>>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub address_link: Option<Option<String>>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub img: Option<String>,
    pub price: Option<i32>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateWishList {
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub title: Option<Option<String>>,
    #[serde(rename = "isPublic")]
    pub is_public: Option<bool>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateWishListItem {
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub status: Option<Option<String>>,
}

/// Maps a present-but-null field to `Some(None)`; combined with
/// `#[serde(default)]`, an absent field stays `None`.
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}
