use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::difficulty::Difficulty;
use super::image::ImageRef;
use super::ingredient::Ingredient;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    /// Older records were saved without this field; it reads back as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ingredients: Vec<Ingredient>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
}

impl Recipe {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            difficulty,
            ingredients: Vec::new(),
            image: None,
        }
    }

    pub fn with_ingredients(mut self, ingredients: Vec<Ingredient>) -> Self {
        self.ingredients = ingredients;
        self
    }

    pub fn with_image(mut self, image: Option<ImageRef>) -> Self {
        self.image = image;
        self
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Ingredient>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Ingredient>>::deserialize(deserializer)?.unwrap_or_default())
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", "=".repeat(self.title.chars().count()))?;
        writeln!(f, "Difficulty: {}", self.difficulty)?;

        if let Some(image) = &self.image {
            writeln!(f, "Photo: {}", image)?;
        }

        if !self.description.is_empty() {
            writeln!(f, "\n{}", self.description)?;
        }

        if !self.ingredients.is_empty() {
            writeln!(f, "\nIngredients:")?;
            for ingredient in &self.ingredients {
                writeln!(f, "  - {}", ingredient.name)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_new() {
        let recipe = Recipe::new("Soup", "desc", Difficulty::Easy);
        assert_eq!(recipe.title, "Soup");
        assert_eq!(recipe.description, "desc");
        assert_eq!(recipe.difficulty, Difficulty::Easy);
        assert!(recipe.ingredients.is_empty());
        assert!(recipe.image.is_none());
    }

    #[test]
    fn test_recipe_builder() {
        let recipe = Recipe::new("Salad", "Mix it", Difficulty::Medium)
            .with_ingredients(vec![Ingredient::named("Lettuce"), Ingredient::named("Tomato")])
            .with_image(Some(ImageRef::url("https://example.com/salad.jpg")));

        assert_eq!(recipe.ingredients.len(), 2);
        assert!(recipe.image.is_some());
    }

    #[test]
    fn test_missing_ingredients_read_as_empty() {
        let recipe: Recipe = serde_json::from_str(
            r#"{"title":"Toast","description":"Bread","difficulty":"Easy"}"#,
        )
        .unwrap();
        assert!(recipe.ingredients.is_empty());
        assert!(recipe.image.is_none());
    }

    #[test]
    fn test_null_ingredients_read_as_empty() {
        let recipe: Recipe = serde_json::from_str(
            r#"{"title":"Toast","description":"Bread","difficulty":"Hard","ingredients":null}"#,
        )
        .unwrap();
        assert!(recipe.ingredients.is_empty());
    }

    #[test]
    fn test_missing_image_is_omitted_on_write() {
        let json = serde_json::to_value(Recipe::new("Soup", "desc", Difficulty::Easy)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "title": "Soup",
                "description": "desc",
                "difficulty": "Easy",
                "ingredients": []
            })
        );
    }

    #[test]
    fn test_recipe_display() {
        let recipe = Recipe::new("Soup", "Hot water", Difficulty::Hard)
            .with_ingredients(vec![Ingredient::named("Salt")]);

        let output = format!("{}", recipe);
        assert!(output.contains("Soup\n===="));
        assert!(output.contains("Difficulty: Hard"));
        assert!(output.contains("Hot water"));
        assert!(output.contains("  - Salt"));
    }
}
