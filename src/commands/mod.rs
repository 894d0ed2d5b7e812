mod auth;
mod config_cmd;
mod recipe;
mod shopping;

pub use auth::AuthCommand;
pub use config_cmd::ConfigCommand;
pub use recipe::RecipeCommand;
pub use shopping::ShoppingCommand;

use clap::ValueEnum;
use std::io::{self, Write};

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Turn a 1-based position from the command line into a list index.
fn position_to_index(position: usize, len: usize, noun: &str) -> Result<usize, String> {
    if position == 0 || position > len {
        return Err(format!(
            "No {} at position {} (the list has {} entr{})",
            noun,
            position,
            len,
            if len == 1 { "y" } else { "ies" }
        ));
    }
    Ok(position - 1)
}

/// Print `label` and read one trimmed line from stdin.
fn prompt(label: &str) -> io::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn confirm(question: &str) -> io::Result<bool> {
    let answer = prompt(&format!("{} [y/N] ", question))?;
    Ok(answer.eq_ignore_ascii_case("y"))
}
