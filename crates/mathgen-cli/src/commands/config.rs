use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use mathgen::Provider;
use mathgen::config::{Config, ConfigStore};

use crate::error::CliResult;
use crate::output::{OutputFormat, mask_secret};

#[derive(Parser)]
pub struct ConfigCommand {
    #[clap(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    #[clap(about = "Show current configuration")]
    Show,

    #[clap(about = "Save provider settings to the config file")]
    Save(SaveArgs),

    #[clap(about = "Print the config file location")]
    Path,
}

#[derive(Parser)]
pub struct SaveArgs {
    #[clap(long, short, help = "Provider: deepseek, openai or anthropic")]
    pub provider: Option<Provider>,

    #[clap(long, help = "API key to store")]
    pub api_key: Option<String>,

    #[clap(long, help = "Base URL override (empty string clears it)")]
    pub base_url: Option<String>,

    #[clap(long, help = "Model override (empty string clears it)")]
    pub model: Option<String>,
}

impl SaveArgs {
    /// Apply the given fields; unset fields keep their saved values.
    pub fn apply(&self, config: &mut Config) {
        if let Some(provider) = self.provider {
            config.provider.name = provider;
        }
        if let Some(api_key) = &self.api_key {
            config.provider.api_key = api_key.trim().to_string();
        }
        if let Some(base_url) = &self.base_url {
            config.provider.base_url = Some(base_url.trim())
                .filter(|u| !u.is_empty())
                .map(str::to_string);
        }
        if let Some(model) = &self.model {
            config.provider.model = Some(model.trim())
                .filter(|m| !m.is_empty())
                .map(str::to_string);
        }
    }
}

impl ConfigCommand {
    pub async fn execute(&self, store: &ConfigStore, format: OutputFormat) -> CliResult<()> {
        match &self.command {
            ConfigSubcommand::Show => Self::show(store, format),
            ConfigSubcommand::Save(args) => Self::save(store, args, format),
            ConfigSubcommand::Path => Self::path(store, format),
        }
    }

    fn show(store: &ConfigStore, format: OutputFormat) -> CliResult<()> {
        let config = store.load()?;
        let provider = config.provider.to_provider_config();

        match format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "path": store.path(),
                    "provider": {
                        "name": config.provider.name.as_str(),
                        "api_key": mask_secret(&config.provider.api_key),
                        "api_key_env": config.provider.api_key_env,
                        "base_url": provider.base_url(),
                        "model": provider.model(),
                    },
                    "generation": {
                        "default_difficulty": config.generation.default_difficulty.as_str(),
                        "problem_count": config.generation.problem_count,
                        "temperature": config.generation.temperature,
                        "max_tokens": config.generation.max_tokens,
                        "timeout_secs": config.generation.timeout_secs,
                    },
                    "logging": {
                        "level": config.logging.level,
                    }
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => {
                if store.exists() {
                    println!("Configuration from: {}", store.path().display());
                } else {
                    println!("Configuration: (using defaults)");
                }
                println!("==============================\n");

                println!("[Provider]");
                let mut provider_table = Table::new();
                provider_table
                    .load_preset(UTF8_FULL_CONDENSED)
                    .set_content_arrangement(ContentArrangement::Dynamic)
                    .set_header(["Setting", "Value"]);

                provider_table.add_row(["name", config.provider.name.as_str()]);
                provider_table.add_row(["api_key", mask_secret(&config.provider.api_key).as_str()]);
                provider_table.add_row(["api_key_env", config.provider.api_key_env.as_str()]);
                provider_table.add_row(["base_url", provider.base_url()]);
                provider_table.add_row(["model", provider.model()]);

                println!("{provider_table}\n");

                println!("[Generation]");
                let mut generation_table = Table::new();
                generation_table
                    .load_preset(UTF8_FULL_CONDENSED)
                    .set_content_arrangement(ContentArrangement::Dynamic)
                    .set_header(["Setting", "Value"]);

                generation_table.add_row([
                    "default_difficulty",
                    config.generation.default_difficulty.as_str(),
                ]);
                generation_table.add_row([
                    "problem_count",
                    config.generation.problem_count.to_string().as_str(),
                ]);
                generation_table.add_row([
                    "temperature",
                    config.generation.temperature.to_string().as_str(),
                ]);
                generation_table.add_row(["max_tokens", config.generation.max_tokens.to_string().as_str()]);
                generation_table.add_row([
                    "timeout_secs",
                    config
                        .generation
                        .timeout_secs
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "(not set)".to_string())
                        .as_str(),
                ]);

                println!("{generation_table}\n");

                println!("[Logging]");
                let mut logging_table = Table::new();
                logging_table
                    .load_preset(UTF8_FULL_CONDENSED)
                    .set_content_arrangement(ContentArrangement::Dynamic)
                    .set_header(["Setting", "Value"]);

                logging_table.add_row(["level", config.logging.level.as_str()]);

                println!("{logging_table}");
            }
        }

        Ok(())
    }

    fn save(store: &ConfigStore, args: &SaveArgs, format: OutputFormat) -> CliResult<()> {
        let mut config = if store.exists() {
            store.load()?
        } else {
            Config::default()
        };

        args.apply(&mut config);
        store.save(&config)?;

        match format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "path": store.path(),
                    "provider": config.provider.name.as_str(),
                    "saved": true,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => {
                println!("Configuration saved to: {}", store.path().display());
            }
        }

        Ok(())
    }

    fn path(store: &ConfigStore, format: OutputFormat) -> CliResult<()> {
        match format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "path": store.path(),
                    "exists": store.exists(),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => {
                let suffix = if store.exists() { "" } else { " (not created yet)" };
                println!("{}{}", store.path().display(), suffix);
            }
        }

        Ok(())
    }
}
