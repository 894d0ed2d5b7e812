mod difficulty;
mod image;
mod ingredient;
mod recipe;

pub use difficulty::Difficulty;
pub use image::{ImageError, ImageRef};
pub use ingredient::{Ingredient, DEFAULT_AMOUNT};
pub use recipe::Recipe;
