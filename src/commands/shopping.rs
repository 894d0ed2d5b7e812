//! Shopping list CLI commands.
//!
//! The list is loaded from the remote before every command and written back
//! after every change. Removing an item is how it gets ticked off.

use clap::{Args, Subcommand};

use recipebook_core::models::DEFAULT_AMOUNT;
use recipebook_core::ShoppingListStore;

use super::{position_to_index, OutputFormat};
use crate::app::App;

#[derive(Args)]
pub struct ShoppingCommand {
    #[command(subcommand)]
    pub command: ShoppingSubcommand,
}

#[derive(Subcommand)]
pub enum ShoppingSubcommand {
    /// List shopping list items
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Add an item to the shopping list
    Add {
        /// Item name
        name: String,

        /// How much to buy
        #[arg(long, short, default_value_t = DEFAULT_AMOUNT)]
        amount: f64,
    },

    /// Remove an item (tick it off)
    Remove {
        /// Position in the shopping list (1-based)
        position: usize,
    },
}

impl ShoppingCommand {
    pub async fn run(&self, app: &App) -> Result<(), Box<dyn std::error::Error>> {
        let remote = app.remote();
        let mut list = ShoppingListStore::new();
        list.load(remote).await?;

        match &self.command {
            ShoppingSubcommand::List { format } => {
                if list.is_empty() {
                    println!("Shopping list is empty");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&list.items())?);
                    }
                    OutputFormat::Text => {
                        println!("{:>3}  {:<30}  AMOUNT", "#", "ITEM");
                        println!("{}", "-".repeat(45));
                        for (i, item) in list.items().iter().enumerate() {
                            println!("{:>3}  {:<30}  {}", i + 1, item.name, item.amount);
                        }
                        println!("\nTotal: {} item(s)", list.len());
                    }
                }
                Ok(())
            }

            ShoppingSubcommand::Add { name, amount } => {
                let name = name.trim();
                if name.is_empty() {
                    return Err("Item name cannot be empty".into());
                }
                validate_amount(*amount)?;

                list.add_item(name, *amount);
                list.save(remote).await?;
                println!("Added to shopping list: {} ({})", name, amount);
                Ok(())
            }

            ShoppingSubcommand::Remove { position } => {
                let index = position_to_index(*position, list.len(), "item")?;
                let removed = list.remove_item(index)?;
                list.save(remote).await?;
                println!("Removed from shopping list: {}", removed.name);
                Ok(())
            }
        }
    }
}

fn validate_amount(amount: f64) -> Result<(), String> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err("Amount must be a positive number".to_string());
    }
    Ok(())
}
