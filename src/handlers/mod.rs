//! HTTP handlers for accounts, catalog, wishlists, and subscriptions.

pub mod merchants;
pub mod products;
pub mod subscriptions;
pub mod users;
pub mod wishlist_items;
pub mod wishlists;

pub use merchants::*;
pub use products::*;
pub use subscriptions::*;
pub use users::*;
pub use wishlist_items::*;
pub use wishlists::*;
