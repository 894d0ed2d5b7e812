//! Recipebook Core Library
//!
//! Recipe and shopping list stores, the data they hold, and the JSON sync
//! protocol that mirrors them to a per-user remote database.

pub mod auth;
pub mod models;
pub mod store;
pub mod sync;

#[cfg(test)]
mod testing;

pub use auth::{ActiveUser, AuthError, AuthProvider, IdentityToolkitAuth, Session};
pub use models::{Difficulty, ImageError, ImageRef, Ingredient, Recipe};
pub use store::{EntryId, RecipeStore, ShoppingListStore, StoreError};
pub use sync::{HttpTransport, Remote, Resource, SyncError, Transport};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
