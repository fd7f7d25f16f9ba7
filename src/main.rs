// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{debug, error, info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use transguard::app_config::{self, Config, TranslationProvider};
use transguard::{TranslationRequest, TranslationService};

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Ollama,
    Anthropic,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
            CliTranslationProvider::Anthropic => TranslationProvider::Anthropic,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// Options shared by every command that talks to a backend
#[derive(Parser, Debug, Clone)]
struct BackendArgs {
    /// Configuration file path
    #[arg(short, long = "config", default_value = "conf.json")]
    config_path: PathBuf,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Text to translate (read from --input or stdin when omitted)
    #[arg(value_name = "TEXT")]
    text: Option<String>,

    /// Source language code (e.g., 'ko', 'en-US', 'kor')
    #[arg(short, long)]
    source_language: String,

    /// Target language code (e.g., 'en', 'fr')
    #[arg(short, long)]
    target_language: String,

    /// Read the text from a file
    #[arg(short, long, conflicts_with = "text")]
    input: Option<PathBuf>,

    /// Maximum number of quality-driven re-translations
    #[arg(long)]
    max_retries: Option<u32>,

    #[command(flatten)]
    backend: BackendArgs,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Screen and translate a text
    Translate(TranslateArgs),

    /// Check that the configured backend is reachable
    Check(BackendArgs),

    /// Generate shell completions for transguard
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// transguard - guarded machine translation with AI
///
/// Screens text for personal data, harmful content and prompt injection,
/// translates it with an LLM and verifies the translation quality.
#[derive(Parser, Debug)]
#[command(name = "transguard")]
#[command(version)]
#[command(about = "Guarded AI translation tool")]
#[command(long_about = "transguard screens a text for unsafe content, translates it using an AI provider and checks the result.

EXAMPLES:
    transguard translate -s ko -t en '안녕하세요'          # Translate a text
    transguard translate -s kr -t en --input note.txt   # Translate a file
    transguard translate -s en -t fr -p anthropic 'Hi'  # Use a specific provider
    transguard check                                    # Probe the backend
    transguard completions bash > transguard.bash       # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.

OUTPUT:
    The outcome is printed to stdout as JSON. Logs go to stderr.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Tag and ANSI color for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("ERROR", "1;31"),
            Level::Warn => ("WARN ", "1;33"),
            Level::Info => ("INFO ", "1;32"),
            Level::Debug => ("DEBUG", "1;36"),
            Level::Trace => ("TRACE", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (tag, color) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {} {}\x1B[0m", color, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = CustomLogger::init(LevelFilter::Info) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let cli = CommandLineOptions::parse();

    let result = match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "transguard", &mut std::io::stdout());
            Ok(())
        }
        Commands::Translate(args) => run_translate(args).await,
        Commands::Check(args) => run_check(args).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            println!("{}", serde_json::json!({ "error": format!("{:#}", e) }));
            ExitCode::FAILURE
        }
    }
}

/// Load the configuration and apply command line overrides
fn load_config(backend: &BackendArgs) -> Result<Config> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &backend.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load_or_create(&backend.config_path)?;

    if let Some(provider) = &backend.provider {
        config.translation.provider = provider.clone().into();
    }

    if let Some(model) = &backend.model {
        let provider = config.translation.provider;
        match config.translation.get_active_provider_config_mut() {
            Some(provider_config) => provider_config.model = model.clone(),
            None => {
                let mut provider_config = app_config::ProviderConfig::new(provider);
                provider_config.model = model.clone();
                config.translation.available_providers.push(provider_config);
            }
        }
    }

    if let Some(log_level) = &backend.log_level {
        config.log_level = log_level.clone().into();
    } else {
        log::set_max_level(config.log_level.to_level_filter());
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

/// Resolve the text from the positional argument, a file, or stdin
fn read_input_text(text: Option<String>, input: Option<&Path>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }

    if let Some(path) = input {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display()));
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read text from stdin")?;
    if buffer.is_empty() {
        return Err(anyhow!("No text given: pass TEXT, --input or pipe it on stdin"));
    }
    Ok(buffer)
}

async fn run_translate(args: TranslateArgs) -> Result<()> {
    let mut config = load_config(&args.backend)?;
    if let Some(max_retries) = args.max_retries {
        config.translation.common.max_retry_count = max_retries;
    }

    let text = read_input_text(args.text, args.input.as_deref())?;
    let service = TranslationService::new(&config.translation)?;

    let request = TranslationRequest::new(args.source_language, args.target_language, text);
    let outcome = service.translate(request).await?;
    debug!("Outcome: {:?}", outcome);

    let json = serde_json::to_string_pretty(&outcome).context("Failed to serialize outcome")?;
    println!("{}", json);
    Ok(())
}

async fn run_check(args: BackendArgs) -> Result<()> {
    let config = load_config(&args)?;
    let service = TranslationService::new(&config.translation)?;

    service
        .test_connection()
        .await
        .with_context(|| format!("Failed to connect to {}", config.translation.provider.display_name()))?;

    info!(
        "Successfully connected to {} ({})",
        config.translation.provider.display_name(),
        config.translation.get_model()
    );
    println!(
        "{}",
        serde_json::json!({
            "status": "ok",
            "provider": config.translation.provider.to_lowercase_string(),
            "model": config.translation.get_model(),
        })
    );
    Ok(())
}
