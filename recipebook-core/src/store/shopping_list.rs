use serde_json::Value;

use super::{fetch_into, store_from, Collection, EntryId, StoreError};
use crate::models::Ingredient;
use crate::sync::{Remote, Resource, SyncError};

/// The signed-in user's shopping list.
///
/// Items are only ever added or removed; there is no in-place edit.
#[derive(Debug, Clone, Default)]
pub struct ShoppingListStore {
    items: Collection<Ingredient>,
}

impl ShoppingListStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_item(&mut self, name: impl Into<String>, amount: f64) -> EntryId {
        self.items.push(Ingredient::new(name, amount))
    }

    /// Append every item in order. Items already on the list are not merged,
    /// so the same name can appear more than once.
    pub fn add_items(&mut self, items: impl IntoIterator<Item = Ingredient>) -> Vec<EntryId> {
        self.items.extend(items)
    }

    /// Copy of every item in insertion order.
    pub fn items(&self) -> Vec<Ingredient> {
        self.items.to_vec()
    }

    pub fn entries(&self) -> Vec<(EntryId, Ingredient)> {
        self.items.entries()
    }

    pub fn get(&self, index: usize) -> Option<&Ingredient> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn remove_item(&mut self, index: usize) -> Result<Ingredient, StoreError> {
        self.items.remove_at(index)
    }

    pub fn remove_by_id(&mut self, id: EntryId) -> Result<Ingredient, StoreError> {
        self.items.remove(id)
    }

    pub async fn store_list(
        &self,
        remote: &Remote,
        token: &str,
    ) -> Result<Option<Value>, SyncError> {
        store_from(&self.items, remote, Resource::ShoppingList, token).await
    }

    pub async fn fetch_list(
        &mut self,
        remote: &Remote,
        token: &str,
    ) -> Result<Vec<Ingredient>, SyncError> {
        fetch_into(&mut self.items, remote, Resource::ShoppingList, token).await
    }

    pub async fn load(&mut self, remote: &Remote) -> Result<Vec<Ingredient>, SyncError> {
        let token = remote.id_token().await?;
        self.fetch_list(remote, &token).await
    }

    pub async fn save(&self, remote: &Remote) -> Result<Option<Value>, SyncError> {
        let token = remote.id_token().await?;
        self.store_list(remote, &token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeAuth, FakeTransport};
    use serde_json::json;
    use std::sync::Arc;

    fn names(store: &ShoppingListStore) -> Vec<String> {
        store.items().into_iter().map(|i| i.name).collect()
    }

    fn remote_with(auth: FakeAuth) -> (Remote, Arc<FakeTransport>) {
        let transport = Arc::new(FakeTransport::new());
        let remote = Remote::new("https://db.example.com", transport.clone(), Arc::new(auth));
        (remote, transport)
    }

    #[test]
    fn test_add_item() {
        let mut store = ShoppingListStore::new();
        store.add_item("Milk", 2.0);
        store.add_item("Eggs", 12.0);

        assert_eq!(
            store.items(),
            vec![Ingredient::new("Milk", 2.0), Ingredient::new("Eggs", 12.0)]
        );
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_add_items_keeps_duplicates() {
        let mut store = ShoppingListStore::new();
        let salt = Ingredient::named("Salt");
        let pepper = Ingredient::named("Pepper");

        let ids = store.add_items(vec![salt.clone(), pepper.clone()]);
        store.add_items(vec![salt.clone()]);

        assert_eq!(ids.len(), 2);
        assert_eq!(store.items(), vec![salt.clone(), pepper, salt]);
    }

    #[test]
    fn test_items_returns_copy() {
        let mut store = ShoppingListStore::new();
        store.add_item("Milk", 1.0);

        let mut copy = store.items();
        copy[0].amount = 5.0;
        copy.clear();

        assert_eq!(store.items(), vec![Ingredient::new("Milk", 1.0)]);
    }

    #[test]
    fn test_remove_item_shifts_later_entries() {
        let mut store = ShoppingListStore::new();
        for name in ["A", "B", "C", "D"] {
            store.add_item(name, 1.0);
        }
        let d_id = store.entries()[3].0;

        assert_eq!(store.remove_item(1).unwrap().name, "B");
        assert_eq!(names(&store), vec!["A", "C", "D"]);

        assert_eq!(store.remove_by_id(d_id).unwrap().name, "D");
        assert_eq!(names(&store), vec!["A", "C"]);
    }

    #[test]
    fn test_remove_item_out_of_range() {
        let mut store = ShoppingListStore::new();
        store.add_item("Milk", 1.0);

        assert_eq!(
            store.remove_item(3),
            Err(StoreError::IndexOutOfRange { index: 3, len: 1 })
        );
        assert_eq!(names(&store), vec!["Milk"]);
    }

    #[tokio::test]
    async fn test_save_puts_shopping_list() {
        let (remote, transport) = remote_with(FakeAuth::signed_in("user-1"));
        let mut store = ShoppingListStore::new();
        store.add_item("Milk", 2.0);

        store.save(&remote).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].method, "PUT");
        assert_eq!(
            requests[0].url,
            "https://db.example.com/user-1/shopping-list.json?auth=token-user-1"
        );
        assert_eq!(
            requests[0].body,
            Some(json!([{ "name": "Milk", "amount": 2.0 }]))
        );
    }

    #[tokio::test]
    async fn test_fetch_list_replaces_items() {
        let (remote, transport) = remote_with(FakeAuth::signed_in("user-1"));
        transport.respond_with(Ok(Some(json!([
            { "name": "Flour", "amount": 1 },
            null,
            { "name": "Sugar", "amount": 0.5 }
        ]))));
        let mut store = ShoppingListStore::new();
        store.add_item("Old", 1.0);

        let fetched = store.fetch_list(&remote, "tok").await.unwrap();

        assert_eq!(
            fetched,
            vec![Ingredient::new("Flour", 1.0), Ingredient::new("Sugar", 0.5)]
        );
        assert_eq!(store.items(), fetched);
    }

    #[tokio::test]
    async fn test_fetch_list_null_clears() {
        let (remote, transport) = remote_with(FakeAuth::signed_in("user-1"));
        transport.respond_with(Ok(None));
        let mut store = ShoppingListStore::new();
        store.add_item("Milk", 1.0);

        store.fetch_list(&remote, "tok").await.unwrap();

        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_list_error_keeps_items() {
        let (remote, transport) = remote_with(FakeAuth::signed_in("user-1"));
        transport.respond_with(Err(SyncError::Http("connection refused".to_string())));
        let mut store = ShoppingListStore::new();
        store.add_item("Milk", 1.0);

        let err = store.fetch_list(&remote, "tok").await.unwrap_err();

        assert_eq!(err, SyncError::Http("connection refused".to_string()));
        assert_eq!(names(&store), vec!["Milk"]);
    }

    #[tokio::test]
    async fn test_load_when_signed_out() {
        let (remote, transport) = remote_with(FakeAuth::signed_out());
        let mut store = ShoppingListStore::new();
        store.add_item("Milk", 1.0);

        assert_eq!(store.load(&remote).await, Err(SyncError::NotSignedIn));
        assert!(transport.requests().is_empty());
        assert_eq!(store.len(), 1);
    }
}
