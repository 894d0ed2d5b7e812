use clap::{Args, Subcommand};

use super::OutputFormat;
use crate::config::{mask, Config, ConfigValue};

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");

                        if let Some(path) = &config.config_file {
                            println!("Config file: {}", path.display());
                        } else {
                            println!(
                                "Config file: {} (not found)",
                                Config::default_config_path().display()
                            );
                        }
                        println!();

                        print_optional("remote.database_url", &config.database_url, |v| {
                            v.to_string()
                        });
                        print_optional("remote.api_key", &config.api_key, mask);

                        println!("remote.auth_url: {}", config.auth_url.value);
                        println!("  source: {}", config.auth_url.source);
                        println!();

                        println!("remote.token_url: {}", config.token_url.value);
                        println!("  source: {}", config.token_url.source);
                        println!();

                        println!("remote.timeout_secs: {}", config.timeout_secs.value);
                        println!("  source: {}", config.timeout_secs.source);
                        println!();

                        println!("session_path: {}", config.session_path.value.display());
                        println!("  source: {}", config.session_path.source);
                    }
                }
                Ok(())
            }
        }
    }
}

fn print_optional(key: &str, value: &ConfigValue<Option<String>>, show: impl Fn(&str) -> String) {
    match &value.value {
        Some(v) => println!("{}: {}", key, show(v)),
        None => println!("{}: (not set)", key),
    }
    println!("  source: {}", value.source);
    println!();
}
