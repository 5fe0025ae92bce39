//! Wishlist backend: users, merchants, products, wishlists, and
//! subscriptions over PostgreSQL.

pub mod config;
pub mod error;
pub mod response;
pub mod state;
pub mod schema;
pub mod models;
pub mod handlers;
pub mod routes;
pub mod docs;

pub use config::Settings;
pub use error::{AppError, ConfigError};
pub use response::Message;
pub use routes::{api_routes, app, ops_routes};
pub use schema::{ensure_database_exists, ensure_schema};
pub use state::AppState;
