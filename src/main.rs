// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, warn};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use yasrai::app_config::{self, Config, OracleProvider};
use yasrai::app_controller::{Controller, RunSummary};

/// CLI Wrapper for OracleProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliOracleProvider {
    #[value(name = "openai")]
    OpenAI,
    Anthropic,
    Ollama,
    #[value(name = "lmstudio")]
    LMStudio,
}

impl From<CliOracleProvider> for OracleProvider {
    fn from(cli_provider: CliOracleProvider) -> Self {
        match cli_provider {
            CliOracleProvider::OpenAI => OracleProvider::OpenAI,
            CliOracleProvider::Anthropic => OracleProvider::Anthropic,
            CliOracleProvider::Ollama => OracleProvider::Ollama,
            CliOracleProvider::LMStudio => OracleProvider::LMStudio,
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

#[derive(Subcommand, Debug)]
enum Commands {
    /// Re-time subtitles using a reference file with correct timings
    Align(AlignArgs),

    /// Translate subtitles window by window
    Translate(TranslateArgs),

    /// Generate shell completions for yasrai
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct AlignArgs {
    /// SRT file with correct timings
    #[arg(value_name = "REFERENCE_SRT")]
    reference: PathBuf,

    /// SRT file in the wanted language with incorrect timings
    #[arg(value_name = "SOURCE_SRT")]
    source: PathBuf,

    /// Output file (defaults to <SOURCE>.autofixed.srt)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force overwrite of an existing output file
    #[arg(short, long)]
    force_overwrite: bool,
}

#[derive(Args, Debug)]
struct TranslateArgs {
    /// What the subtitles belong to, e.g. "series Castle, season 1"
    #[arg(value_name = "DESCRIPTION")]
    description: String,

    /// Target language name or ISO 639 code (e.g. 'German', 'de', 'deu')
    #[arg(value_name = "TARGET_LANGUAGE")]
    target_language: String,

    /// SRT file to translate
    #[arg(value_name = "INPUT_SRT")]
    input: PathBuf,

    /// Where to write the translation
    #[arg(value_name = "OUTPUT_SRT")]
    output: PathBuf,

    /// Force overwrite of an existing output file
    #[arg(short, long)]
    force_overwrite: bool,
}

/// Options shared by every command
#[derive(Args, Debug)]
struct GlobalOptions {
    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config_path: String,

    /// Oracle provider to use
    #[arg(short, long, global = true, value_enum)]
    provider: Option<CliOracleProvider>,

    /// Model name to use
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// API key of the provider
    #[arg(long, global = true, env = "YASRAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Cues per window, for the selected command
    #[arg(long, global = true)]
    window_size: Option<usize>,

    /// Cues shared by consecutive windows, for the selected command
    #[arg(long, global = true)]
    overlap: Option<usize>,
}

/// YASRAI - Yet Another Subtitle Reconciler with AI
///
/// Fixes subtitle timings by matching phrases against a reference subtitle,
/// or translates subtitles, by asking an LLM one window of cues at a time.
#[derive(Parser, Debug)]
#[command(name = "yasrai")]
#[command(version = "0.1.0")]
#[command(about = "LLM-driven subtitle re-timing and translation")]
#[command(long_about = "YASRAI reconciles subtitle files with the help of an LLM.

EXAMPLES:
    yasrai align movie.en.srt movie.ru.srt              # Writes movie.ru.autofixed.srt
    yasrai align -f -o fixed.srt ref.srt bad.srt        # Explicit output, overwrite
    yasrai translate \"series Castle, season 1\" de in.srt out.srt
    yasrai -p ollama -m llama3.1 translate \"a film\" French in.srt out.srt
    yasrai completions bash > yasrai.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically. The API key may also be set with YASRAI_API_KEY.

SUPPORTED PROVIDERS:
    openai    - OpenAI API (default: gpt-4o, requires API key)
    anthropic - Anthropic Claude API (requires API key)
    ollama    - Local Ollama server
    lmstudio  - LM Studio local server (OpenAI-compatible on http://localhost:1234/v1)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOptions,
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
        // Filtering happens through log::max_level so it can be raised later
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and marker for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
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
            let (color, marker) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, marker, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "yasrai", &mut std::io::stdout());
        }
        Commands::Align(args) => {
            run_align(&cli.global, args).await?;
        }
        Commands::Translate(args) => {
            run_translate(&cli.global, args).await?;
        }
    }

    Ok(())
}

async fn run_align(options: &GlobalOptions, args: AlignArgs) -> Result<RunSummary> {
    let mut config = load_config(options)?;
    if let Some(window_size) = options.window_size {
        config.alignment.window_size = window_size;
    }
    if let Some(overlap) = options.overlap {
        config.alignment.overlap = overlap;
    }

    let controller = Controller::with_config(config)
        .context("Configuration validation failed")?;
    controller
        .run_alignment(&args.reference, &args.source, args.output, args.force_overwrite)
        .await
}

async fn run_translate(options: &GlobalOptions, args: TranslateArgs) -> Result<RunSummary> {
    let mut config = load_config(options)?;
    if let Some(window_size) = options.window_size {
        config.translation.window_size = window_size;
    }
    if let Some(overlap) = options.overlap {
        config.translation.overlap = overlap;
    }

    let controller = Controller::with_config(config)
        .context("Configuration validation failed")?;
    controller
        .run_translation(
            &args.description,
            &args.target_language,
            &args.input,
            &args.output,
            args.force_overwrite,
        )
        .await
}

/// Load or create the configuration file, then apply CLI overrides
fn load_config(options: &GlobalOptions) -> Result<Config> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Override config with CLI options if provided
    if let Some(provider) = &options.provider {
        config.oracle.provider = provider.clone().into();
    }
    if let Some(model) = &options.model {
        config.oracle.active_provider_config_mut().model = model.clone();
    }
    if let Some(api_key) = options.api_key.as_ref().filter(|key| !key.is_empty()) {
        config.oracle.active_provider_config_mut().api_key = api_key.clone();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    Ok(config)
}
