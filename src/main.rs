use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod commands;
mod config;
mod session;

use app::App;
use commands::{AuthCommand, ConfigCommand, RecipeCommand, ShoppingCommand};
use config::Config;

#[derive(Parser)]
#[command(name = "recipebook")]
#[command(version)]
#[command(about = "Keep recipes and a shopping list in sync with your account", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign up, sign in and out
    Auth(AuthCommand),

    /// Manage recipes
    Recipe(RecipeCommand),

    /// Manage the shopping list
    Shopping(ShoppingCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;

    match cli.command {
        Some(Commands::Auth(cmd)) => {
            cmd.run(&config).await?;
        }
        Some(Commands::Recipe(cmd)) => {
            let app = App::connect(&config)?;
            let result = cmd.run(&app).await;
            // A token refresh may have happened even if the command failed
            app.persist_session()?;
            result?;
        }
        Some(Commands::Shopping(cmd)) => {
            let app = App::connect(&config)?;
            let result = cmd.run(&app).await;
            app.persist_session()?;
            result?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
