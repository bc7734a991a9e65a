use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use mathgen::config::{Config, ProviderSettings};
use mathgen::{
    Difficulty, GenerationRequest, PromptBuilder, Provider, RequestOrchestrator, SanitizedDocument,
};

use crate::error::CliResult;
use crate::output::OutputFormat;

#[derive(Parser)]
pub struct GenerateCommand {
    #[clap(help = "Math topic (e.g. '导数')")]
    pub topic: String,

    #[clap(long, short, help = "Difficulty: simple, medium or hard")]
    pub difficulty: Option<Difficulty>,

    #[clap(long, short, help = "Provider: deepseek, openai or anthropic")]
    pub provider: Option<Provider>,

    #[clap(long, help = "API key (overrides the saved key)")]
    pub api_key: Option<String>,

    #[clap(long, help = "Base URL override")]
    pub base_url: Option<String>,

    #[clap(long, help = "Model override")]
    pub model: Option<String>,

    #[clap(long, short = 'n', help = "Number of problems to request")]
    pub count: Option<u32>,

    #[clap(
        long,
        short,
        help = "Write the document to this file",
        conflicts_with_all = ["out_dir", "stdout"]
    )]
    pub output: Option<PathBuf>,

    #[clap(
        long,
        help = "Directory for the generated {topic}_{timestamp}.tex file",
        conflicts_with = "stdout"
    )]
    pub out_dir: Option<PathBuf>,

    #[clap(long, help = "Print the document instead of writing a file")]
    pub stdout: bool,
}

/// Result of a finished generation
#[derive(Debug)]
pub struct GenerateOutcome {
    pub document: SanitizedDocument,
    pub provider: Provider,
    pub difficulty: Difficulty,
    /// Where the document was written; `None` with `--stdout`
    pub path: Option<PathBuf>,
}

impl GenerateCommand {
    pub async fn execute(&self, config: &Config, format: OutputFormat) -> CliResult<()> {
        let outcome = self.run(config, matches!(format, OutputFormat::Table)).await?;

        match format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "topic": self.topic.trim(),
                    "difficulty": outcome.difficulty.as_str(),
                    "provider": outcome.provider.as_str(),
                    "path": outcome.path,
                    "bytes": outcome.document.as_str().len(),
                    "latex": outcome.path.is_none().then(|| outcome.document.as_str()),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => match &outcome.path {
                Some(path) => println!("LaTeX document saved to: {}", path.display()),
                None => println!("{}", outcome.document),
            },
        }

        Ok(())
    }

    /// Generate the document and write it unless `--stdout` was given.
    pub async fn run(&self, config: &Config, show_progress: bool) -> CliResult<GenerateOutcome> {
        let settings = self.provider_settings(config);
        let provider_config = settings.to_provider_config();
        let difficulty = self
            .difficulty
            .unwrap_or(config.generation.default_difficulty);
        let count = self.count.unwrap_or(config.generation.problem_count);

        let orchestrator = RequestOrchestrator::new(config.generation.params())
            .with_prompt_builder(PromptBuilder::new().with_problem_count(count));
        let request = GenerationRequest::new(self.topic.as_str(), difficulty);

        let spinner = show_progress.then(|| progress_spinner(provider_config.provider));
        let result = orchestrator.run(&request, &provider_config).await;
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }
        let document = result?;

        let path = if self.stdout {
            None
        } else {
            let path = self.output_path(Utc::now());
            write_document(&path, &document)?;
            tracing::info!("Wrote {}", path.display());
            Some(path)
        };

        Ok(GenerateOutcome {
            document,
            provider: provider_config.provider,
            difficulty,
            path,
        })
    }

    /// Saved settings with command line overrides applied
    pub fn provider_settings(&self, config: &Config) -> ProviderSettings {
        let mut settings = config.provider.clone();
        if let Some(provider) = self.provider {
            settings.name = provider;
        }
        if let Some(api_key) = &self.api_key {
            settings.api_key = api_key.clone();
        }
        if let Some(base_url) = &self.base_url {
            settings.base_url = Some(base_url.clone());
        }
        if let Some(model) = &self.model {
            settings.model = Some(model.clone());
        }
        settings
    }

    pub fn output_path(&self, now: DateTime<Utc>) -> PathBuf {
        if let Some(path) = &self.output {
            return path.clone();
        }

        let file_name = SanitizedDocument::file_name(&self.topic, now);
        match &self.out_dir {
            Some(dir) => dir.join(file_name),
            None => PathBuf::from(file_name),
        }
    }
}

fn progress_spinner(provider: Provider) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed}] {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("Generating problems with {provider}..."));
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

fn write_document(path: &Path, document: &SanitizedDocument) -> CliResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, document.as_str())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn parse(args: &[&str]) -> GenerateCommand {
        let mut argv = vec!["generate"];
        argv.extend_from_slice(args);
        GenerateCommand::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_parses_difficulty_and_provider() {
        let cmd = parse(&["导数", "-d", "hard", "--provider", "anthropic"]);
        assert_eq!(cmd.topic, "导数");
        assert_eq!(cmd.difficulty, Some(Difficulty::Hard));
        assert_eq!(cmd.provider, Some(Provider::Anthropic));
    }

    #[test]
    fn test_rejects_unknown_difficulty() {
        assert!(GenerateCommand::try_parse_from(["generate", "导数", "-d", "extreme"]).is_err());
    }

    #[test]
    fn test_output_conflicts_with_stdout() {
        assert!(
            GenerateCommand::try_parse_from(["generate", "导数", "-o", "a.tex", "--stdout"])
                .is_err()
        );
    }

    #[test]
    fn test_overrides_apply_to_saved_settings() {
        let mut config = Config::default();
        config.provider.api_key = "saved".to_string();
        config.provider.base_url = Some("https://saved.example.com/v1".to_string());

        let cmd = parse(&["导数", "--provider", "openai", "--api-key", "cli-key"]);
        let settings = cmd.provider_settings(&config);

        assert_eq!(settings.name, Provider::OpenAI);
        assert_eq!(settings.api_key, "cli-key");
        assert_eq!(
            settings.base_url.as_deref(),
            Some("https://saved.example.com/v1")
        );
    }

    #[test]
    fn test_output_path_defaults_to_topic_and_timestamp() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();

        let cmd = parse(&["导数"]);
        assert_eq!(cmd.output_path(now), PathBuf::from("导数_1700000000000.tex"));

        let cmd = parse(&["导数", "--out-dir", "/tmp/out"]);
        assert_eq!(
            cmd.output_path(now),
            PathBuf::from("/tmp/out/导数_1700000000000.tex")
        );

        let cmd = parse(&["导数", "-o", "exact.tex"]);
        assert_eq!(cmd.output_path(now), PathBuf::from("exact.tex"));
    }
}
