use serde_json::Value;

use super::{fetch_into, store_from, Collection, EntryId, StoreError};
use crate::models::{Difficulty, ImageRef, Ingredient, Recipe};
use crate::sync::{Remote, Resource, SyncError};

/// The signed-in user's recipe book.
#[derive(Debug, Clone, Default)]
pub struct RecipeStore {
    recipes: Collection<Recipe>,
}

impl RecipeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a recipe. The store does no validation.
    pub fn add_recipe(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        difficulty: Difficulty,
        ingredients: Vec<Ingredient>,
        image: Option<ImageRef>,
    ) -> EntryId {
        self.recipes.push(
            Recipe::new(title, description, difficulty)
                .with_ingredients(ingredients)
                .with_image(image),
        )
    }

    /// Copy of every recipe in insertion order.
    pub fn recipes(&self) -> Vec<Recipe> {
        self.recipes.to_vec()
    }

    pub fn entries(&self) -> Vec<(EntryId, Recipe)> {
        self.recipes.entries()
    }

    pub fn get(&self, index: usize) -> Option<&Recipe> {
        self.recipes.get(index)
    }

    pub fn get_by_id(&self, id: EntryId) -> Option<&Recipe> {
        self.recipes.get_by_id(id)
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Replace the recipe at `index` with a new one built from the given
    /// fields. The entry keeps its id.
    pub fn update_recipe(
        &mut self,
        index: usize,
        title: impl Into<String>,
        description: impl Into<String>,
        difficulty: Difficulty,
        ingredients: Vec<Ingredient>,
        image: Option<ImageRef>,
    ) -> Result<EntryId, StoreError> {
        self.recipes.replace_at(
            index,
            Recipe::new(title, description, difficulty)
                .with_ingredients(ingredients)
                .with_image(image),
        )
    }

    pub fn update_by_id(&mut self, id: EntryId, recipe: Recipe) -> Result<(), StoreError> {
        self.recipes.replace(id, recipe)
    }

    /// Remove the recipe at `index`; the ones after it move up by one.
    pub fn remove_recipe(&mut self, index: usize) -> Result<Recipe, StoreError> {
        self.recipes.remove_at(index)
    }

    pub fn remove_by_id(&mut self, id: EntryId) -> Result<Recipe, StoreError> {
        self.recipes.remove(id)
    }

    /// Overwrite the remote recipe list with this one.
    pub async fn store_list(
        &self,
        remote: &Remote,
        token: &str,
    ) -> Result<Option<Value>, SyncError> {
        store_from(&self.recipes, remote, Resource::Recipes, token).await
    }

    /// Replace this list with the remote one. An empty remote document
    /// empties the list; an error leaves it unchanged.
    pub async fn fetch_list(
        &mut self,
        remote: &Remote,
        token: &str,
    ) -> Result<Vec<Recipe>, SyncError> {
        fetch_into(&mut self.recipes, remote, Resource::Recipes, token).await
    }

    /// Get a fresh token, then fetch.
    pub async fn load(&mut self, remote: &Remote) -> Result<Vec<Recipe>, SyncError> {
        let token = remote.id_token().await?;
        self.fetch_list(remote, &token).await
    }

    /// Get a fresh token, then store.
    pub async fn save(&self, remote: &Remote) -> Result<Option<Value>, SyncError> {
        let token = remote.id_token().await?;
        self.store_list(remote, &token).await
    }
}
