//! In-memory stores for the recipe book and the shopping list.
//!
//! Each store owns one ordered list. Local edits are synchronous and visible
//! to the next read; reads hand out copies. The remote document is the only
//! durable copy: `fetch_list` replaces the local list with it and
//! `store_list` overwrites it with the local list.

mod collection;
mod recipes;
mod shopping_list;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

pub use collection::{Collection, EntryId, StoreError};
pub use recipes::RecipeStore;
pub use shopping_list::ShoppingListStore;

use crate::sync::{decode_list, encode_list, Remote, Resource, SyncError};

/// Replace `collection` with the remote copy of `resource`.
///
/// The collection is only touched once the whole response has been decoded,
/// so a failed fetch leaves it exactly as it was.
async fn fetch_into<T>(
    collection: &mut Collection<T>,
    remote: &Remote,
    resource: Resource,
    token: &str,
) -> Result<Vec<T>, SyncError>
where
    T: Clone + DeserializeOwned,
{
    let body = remote.fetch(resource, token).await?;
    let items: Vec<T> = decode_list(body)?;

    collection.replace_all(items.clone());
    info!(%resource, count = items.len(), "Fetched list");
    Ok(items)
}

/// Overwrite the remote copy of `resource` with `collection`.
async fn store_from<T>(
    collection: &Collection<T>,
    remote: &Remote,
    resource: Resource,
    token: &str,
) -> Result<Option<Value>, SyncError>
where
    T: Clone + Serialize,
{
    let body = encode_list(&collection.to_vec())?;
    let response = remote.store(resource, token, &body).await?;

    info!(%resource, count = collection.len(), "Stored list");
    Ok(response)
}
