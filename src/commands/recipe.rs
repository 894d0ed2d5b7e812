use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

use recipebook_core::{
    Difficulty, ImageRef, Ingredient, Recipe, RecipeStore, ShoppingListStore,
};

use super::{confirm, position_to_index, OutputFormat};
use crate::app::App;

#[derive(Args)]
pub struct RecipeCommand {
    #[command(subcommand)]
    pub command: RecipeSubcommand,
}

#[derive(Subcommand)]
pub enum RecipeSubcommand {
    /// List all recipes
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a recipe's details
    Show {
        /// Position in the recipe list (1-based)
        position: usize,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Create a new recipe
    Create {
        /// Title of the recipe
        title: String,

        /// Short description
        #[arg(long)]
        description: String,

        /// easy, medium or hard
        #[arg(long, default_value = "medium")]
        difficulty: Difficulty,

        /// Ingredient name (can be repeated)
        #[arg(long = "ingredient", value_name = "NAME")]
        ingredients: Vec<String>,

        /// Photo: an http(s) URL, or a local file to embed
        #[arg(long, value_name = "PATH_OR_URL")]
        image: Option<String>,
    },

    /// Update an existing recipe
    Update {
        /// Position in the recipe list (1-based)
        position: usize,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// New difficulty
        #[arg(long)]
        difficulty: Option<Difficulty>,

        /// Add an ingredient (can be repeated)
        #[arg(long = "ingredient", value_name = "NAME")]
        ingredients: Vec<String>,

        /// Drop the current ingredients before adding new ones
        #[arg(long)]
        clear_ingredients: bool,

        /// New photo: an http(s) URL, or a local file to embed
        #[arg(long, value_name = "PATH_OR_URL")]
        image: Option<String>,
    },

    /// Delete a recipe
    Delete {
        /// Position in the recipe list (1-based)
        position: usize,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Add a recipe's ingredients to the shopping list
    Shop {
        /// Position in the recipe list (1-based)
        position: usize,
    },

    /// Save a recipe's embedded photo to a file
    Image {
        /// Position in the recipe list (1-based)
        position: usize,

        /// Where to write the image
        #[arg(long, short)]
        output: PathBuf,
    },
}

impl RecipeCommand {
    pub async fn run(&self, app: &App) -> Result<(), Box<dyn std::error::Error>> {
        let remote = app.remote();
        let mut recipes = RecipeStore::new();
        recipes.load(remote).await?;

        match &self.command {
            RecipeSubcommand::List { format } => {
                if recipes.is_empty() {
                    println!("No recipes found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&recipes.recipes())?);
                    }
                    OutputFormat::Text => {
                        println!("{:>3}  {:<30}  {:<10}  INGREDIENTS", "#", "TITLE", "DIFFICULTY");
                        println!("{}", "-".repeat(60));
                        for (i, recipe) in recipes.recipes().iter().enumerate() {
                            println!(
                                "{:>3}  {:<30}  {:<10}  {}",
                                i + 1,
                                truncate(&recipe.title, 30),
                                recipe.difficulty,
                                recipe.ingredients.len()
                            );
                        }
                        println!("\nTotal: {} recipe(s)", recipes.len());
                    }
                }
                Ok(())
            }

            RecipeSubcommand::Show { position, format } => {
                let recipe = find(&recipes, *position)?;
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(recipe)?);
                    }
                    OutputFormat::Text => {
                        println!("{}", recipe);
                    }
                }
                Ok(())
            }

            RecipeSubcommand::Create {
                title,
                description,
                difficulty,
                ingredients,
                image,
            } => {
                let title = required("Title", title)?;
                let description = required("Description", description)?;
                let ingredients = parse_ingredients(ingredients)?;
                let image = image.as_deref().map(resolve_image).transpose()?;

                recipes.add_recipe(title, description, *difficulty, ingredients, image);
                recipes.save(remote).await?;

                if let Some(created) = recipes.get(recipes.len() - 1) {
                    println!("Created recipe #{}:", recipes.len());
                    println!("{}", created);
                }
                Ok(())
            }

            RecipeSubcommand::Update {
                position,
                title,
                description,
                difficulty,
                ingredients,
                clear_ingredients,
                image,
            } => {
                let has_updates = title.is_some()
                    || description.is_some()
                    || difficulty.is_some()
                    || !ingredients.is_empty()
                    || *clear_ingredients
                    || image.is_some();

                if !has_updates {
                    return Err("Nothing to update. Provide at least one option.".into());
                }

                let index = position_to_index(*position, recipes.len(), "recipe")?;
                let current = find(&recipes, *position)?.clone();

                let title = match title {
                    Some(title) => required("Title", title)?,
                    None => current.title,
                };
                let description = match description {
                    Some(description) => required("Description", description)?,
                    None => current.description,
                };
                let mut new_ingredients = if *clear_ingredients {
                    Vec::new()
                } else {
                    current.ingredients
                };
                new_ingredients.extend(parse_ingredients(ingredients)?);
                let image = match image {
                    Some(image) => Some(resolve_image(image)?),
                    None => current.image,
                };

                recipes.update_recipe(
                    index,
                    title,
                    description,
                    difficulty.unwrap_or(current.difficulty),
                    new_ingredients,
                    image,
                )?;
                recipes.save(remote).await?;

                if let Some(updated) = recipes.get(index) {
                    println!("Updated recipe:");
                    println!("{}", updated);
                }
                Ok(())
            }

            RecipeSubcommand::Delete { position, force } => {
                let index = position_to_index(*position, recipes.len(), "recipe")?;
                let title = find(&recipes, *position)?.title.clone();

                // Confirm deletion unless --force is used
                if !force && !confirm(&format!("Delete recipe '{}'?", title))? {
                    println!("Deletion cancelled.");
                    return Ok(());
                }

                let removed = recipes.remove_recipe(index)?;
                recipes.save(remote).await?;
                println!("Deleted recipe: {}", removed.title);
                Ok(())
            }

            RecipeSubcommand::Shop { position } => {
                let recipe = find(&recipes, *position)?;
                if recipe.ingredients.is_empty() {
                    println!("'{}' has no ingredients to add", recipe.title);
                    return Ok(());
                }

                let mut shopping = ShoppingListStore::new();
                shopping.load(remote).await?;
                shopping.add_items(recipe.ingredients.clone());
                shopping.save(remote).await?;

                println!(
                    "Added {} ingredient(s) from '{}' to the shopping list",
                    recipe.ingredients.len(),
                    recipe.title
                );
                Ok(())
            }

            RecipeSubcommand::Image { position, output } => {
                let recipe = find(&recipes, *position)?;
                let image = recipe
                    .image
                    .as_ref()
                    .ok_or_else(|| format!("'{}' has no photo", recipe.title))?;
                if !image.is_embedded() {
                    return Err(format!("The photo is a link: {}", image.as_str()).into());
                }

                let bytes = image.decode()?;
                std::fs::write(output, &bytes)?;
                println!("Wrote {} bytes to {}", bytes.len(), output.display());
                Ok(())
            }
        }
    }
}

fn find(recipes: &RecipeStore, position: usize) -> Result<&Recipe, String> {
    let index = position_to_index(position, recipes.len(), "recipe")?;
    recipes
        .get(index)
        .ok_or_else(|| format!("No recipe at position {}", position))
}

/// Trimmed value, or an error naming the empty field.
fn required(field: &str, value: &str) -> Result<String, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(format!("{} cannot be empty", field));
    }
    Ok(value.to_string())
}

fn parse_ingredients(names: &[String]) -> Result<Vec<Ingredient>, String> {
    names
        .iter()
        .map(|name| required("Ingredient name", name).map(Ingredient::named))
        .collect()
}

fn resolve_image(value: &str) -> Result<ImageRef, Box<dyn std::error::Error>> {
    let value = value.trim();
    if value.starts_with("http://") || value.starts_with("https://") {
        return Ok(ImageRef::url(value));
    }
    Ok(ImageRef::from_file(Path::new(value))?)
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let cut: String = text.chars().take(width - 3).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}
