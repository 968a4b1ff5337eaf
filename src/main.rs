// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use subtext::app_config::{self, Config};
use subtext::app_controller::{ExtractionWorkflow, NamingMode};
use subtext::file_utils::FileManager;
use subtext::subtitle_processor::CaptionConverter;
use subtext::tools::ffmpeg::FfmpegTool;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
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
    /// Extract the subtitles of a video as plain text (default command)
    Extract(ExtractArgs),

    /// Show the title of a video and the file name derived from it
    Analyze {
        /// Video URL or path
        #[arg(value_name = "LOCATOR")]
        locator: String,
    },

    /// Convert existing caption files to plain text
    Convert {
        /// Caption file, or directory searched for caption files
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        /// Output file (single input file only)
        #[arg(short = 'O', long)]
        output: Option<PathBuf>,
    },

    /// Generate shell completions for subtext
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// Video URL or path
    #[arg(value_name = "LOCATOR")]
    locator: String,

    /// Custom output name (sanitized); the media title is used otherwise
    #[arg(short, long, conflicts_with = "use_title")]
    name: Option<String>,

    /// Name the output after the media title
    #[arg(short, long)]
    use_title: bool,
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Directory for the generated files
    #[arg(short, long, global = true)]
    output_dir: Option<PathBuf>,

    /// Keep the intermediate caption file
    #[arg(short, long, global = true)]
    keep_caption: bool,
}

/// subtext - embedded subtitles to plain text
///
/// Reads the title of a video, extracts its first subtitle track with ffmpeg
/// and writes the captions as a single paragraph of text.
#[derive(Parser, Debug)]
#[command(name = "subtext")]
#[command(version)]
#[command(about = "Extract video subtitles as plain text")]
#[command(long_about = "subtext extracts the first subtitle track of a video with ffmpeg and converts it to plain text.

EXAMPLES:
    subtext https://example.com/video.mp4            # Name the text file after the video title
    subtext -n lecture https://example.com/v.mp4     # Write lecture.txt
    subtext analyze movie.mkv                        # Only show the title
    subtext convert ./captions/                      # Convert every .srt under a directory
    subtext completions bash > subtext.bash          # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Video URL or path
    #[arg(value_name = "LOCATOR")]
    locator: Option<String>,

    /// Custom output name (sanitized); the media title is used otherwise
    #[arg(short, long, conflicts_with = "use_title")]
    name: Option<String>,

    /// Name the output after the media title
    #[arg(short, long)]
    use_title: bool,

    #[command(flatten)]
    common: CommonArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger { level: LevelFilter::Trace }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and tag for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "ERROR"),
            Level::Warn => ("1;33", "WARN "),
            Level::Info => ("1;32", "INFO "),
            Level::Debug => ("1;36", "DEBUG"),
            Level::Trace => ("1;35", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, tag) = Self::style_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                color, now, tag, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subtext", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Extract(args)) => {
            let config = load_config(&cli.common)?;
            run_extract(args, config).await
        }
        Some(Commands::Analyze { locator }) => {
            let config = load_config(&cli.common)?;
            run_analyze(&locator, config).await
        }
        Some(Commands::Convert { input_path, output }) => {
            let config = load_config(&cli.common)?;
            run_convert(&input_path, output.as_deref(), &config)
        }
        None => {
            // Default behavior - use top-level args
            let locator = cli.locator.ok_or_else(|| {
                anyhow!("LOCATOR is required when no subcommand is specified")
            })?;
            let config = load_config(&cli.common)?;
            let args = ExtractArgs {
                locator,
                name: cli.name,
                use_title: cli.use_title,
            };
            run_extract(args, config).await
        }
    }
}

/// Load the configuration, apply command line overrides and set the log level
fn load_config(common: &CommonArgs) -> Result<Config> {
    if let Some(level) = common.log_level {
        let level: app_config::LogLevel = level.into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load_or_create(&common.config_path)?;

    if let Some(level) = common.log_level {
        config.log_level = level.into();
    }
    if let Some(output_dir) = &common.output_dir {
        config.output_dir = output_dir.clone();
    }
    if common.keep_caption {
        config.keep_caption_file = true;
    }

    config.validate()
        .context("Configuration validation failed")?;

    log::set_max_level(config.log_level.to_level_filter());
    Ok(config)
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .expect("Invalid spinner template"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

async fn run_analyze(locator: &str, config: Config) -> Result<()> {
    let mut workflow = ExtractionWorkflow::new(FfmpegTool::from_config(&config), &config);

    let pb = spinner("Analyzing video metadata");
    let result = workflow.analyze(locator).await;
    pb.finish_and_clear();
    let report = result?;

    println!("{}", report.message());
    if report.default_name.is_empty() {
        println!("No file name can be derived from the title; use --name");
    } else {
        println!("File name: {}.{}", report.default_name, config.text_extension);
    }
    Ok(())
}

async fn run_extract(args: ExtractArgs, config: Config) -> Result<()> {
    let mut workflow = ExtractionWorkflow::new(FfmpegTool::from_config(&config), &config);

    let pb = spinner("Analyzing video metadata");
    let analysis = workflow.analyze(&args.locator).await;
    pb.finish_and_clear();
    let analysis = analysis?;
    info!("{}", analysis.message());

    match &args.name {
        Some(name) if !args.use_title => {
            workflow.set_naming_mode(NamingMode::Custom)?;
            workflow.set_custom_name(name)?;
        }
        _ => workflow.set_naming_mode(NamingMode::UseTitle)?,
    }

    let pb = spinner("Extracting subtitles");
    let extraction = workflow.extract(&args.locator).await;
    pb.finish_and_clear();
    let report = extraction?;

    println!("{}", report.message());
    workflow.reset();
    Ok(())
}

fn run_convert(input_path: &Path, output: Option<&Path>, config: &Config) -> Result<()> {
    if input_path.is_file() {
        let output = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| input_path.with_extension(&config.text_extension));
        let stats = CaptionConverter::convert_file_to(input_path, &output)?;
        info!("Converted {:?}: {}", input_path, stats);
        println!("{}", output.display());
        return Ok(());
    }

    if !input_path.is_dir() {
        return Err(anyhow!("Input path does not exist: {:?}", input_path));
    }
    if output.is_some() {
        warn!("--output is ignored when converting a directory");
    }

    let files = FileManager::find_files(input_path, &config.caption_extension)?;
    if files.is_empty() {
        warn!("No .{} files found in {:?}", config.caption_extension, input_path);
        return Ok(());
    }

    let mut converted = 0;
    for file in &files {
        let target = file.with_extension(&config.text_extension);
        match CaptionConverter::convert_file_to(file, &target) {
            Ok(_) => {
                converted += 1;
                println!("{}", target.display());
            }
            Err(e) => error!("Error converting {:?}: {:#}", file, e),
        }
    }

    info!("Finished converting {} of {} files", converted, files.len());
    Ok(())
}
