use clap::Parser;
use color_eyre::Result;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

mod ai;
mod cache;
mod config;
mod error;
mod fingerprint;
mod generate;
mod output;
mod selection;
#[cfg(test)]
mod test_utils;

use ai::AsyncAiProvider;
use ai::prompt::language_for_path;
use cache::SuggestionCache;
use config::Overrides;
use config::credentials::resolve_api_key;
use error::ConfigError;
use generate::{CacheWrite, Generator};
use output::{Output, OutputTarget, default_output_path};
use selection::TerminalSelector;

/// Exit status when the test was produced but the suggestion cache was not updated
const EXIT_CACHE_WRITE_FAILED: u8 = 2;

/// Suggest and generate unit tests for a source file
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Suggest and generate unit tests for a source file using an LLM"
)]
struct Args {
    /// Source file to generate unit tests for
    path: PathBuf,

    /// AI provider to use (openai, anthropic)
    #[arg(long = "ai-provider", value_name = "PROVIDER")]
    ai_provider: Option<String>,

    /// File holding the provider API key
    #[arg(long = "ai-secret-path", value_name = "PATH")]
    ai_secret_path: Option<PathBuf>,

    /// Environment variable holding the provider API key
    #[arg(long = "ai-secret-env-var", value_name = "NAME")]
    ai_secret_env_var: Option<String>,

    /// Request timeout in seconds
    #[arg(long = "timeout-secs", value_name = "SECS")]
    timeout_secs: Option<u64>,

    /// Directory for cached suggestions
    #[arg(long = "cache-dir", value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    /// Append the generated test to unit_test.<ext> next to the source file
    #[arg(long)]
    write: bool,

    /// Append the generated test to this file
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Log debug output to stderr
    #[arg(long)]
    debug: bool,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            provider: self.ai_provider.clone(),
            secret_path: self.ai_secret_path.clone(),
            secret_env_var: self.ai_secret_env_var.clone(),
            timeout_secs: self.timeout_secs,
            cache_dir: self.cache_dir.clone(),
            no_color: self.no_color,
        }
    }

    fn output_target(&self) -> OutputTarget {
        match (&self.output, self.write) {
            (Some(path), _) => OutputTarget::File(path.clone()),
            (None, true) => OutputTarget::File(default_output_path(&self.path)),
            (None, false) => OutputTarget::Stdout,
        }
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    init_logging(args.debug);
    color_eyre::install()?;

    let config_result = config::load_config()?;
    if let Some(warning) = &config_result.warning {
        eprintln!("Warning: {}", warning);
    }

    let mut config = config_result.config;
    config.apply_overrides(&args.overrides())?;

    let api_key = resolve_api_key(&config.ai)?;
    let provider = AsyncAiProvider::from_config(&config.ai, api_key)?;

    let content = std::fs::read(&args.path).map_err(|source| ConfigError::ReadInput {
        path: args.path.clone(),
        source,
    })?;

    let cache = SuggestionCache::open(config.cache.dir())?;
    let generator = Generator::new(provider, cache, language_for_path(&args.path));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let mut selector = TerminalSelector::stdio(config.output.color);
    let mut sink = Output::stdout(args.output_target());
    let report = runtime.block_on(generator.run(&content, &mut selector, &mut sink))?;

    log::debug!(
        "Done: hash={} source={:?} emitted={:?}",
        report.fingerprint,
        report.source,
        report.emitted
    );

    if let CacheWrite::Failed(e) = &report.cache_write {
        eprintln!("Warning: suggestions were not cached: {}", e);
        return Ok(ExitCode::from(EXIT_CACHE_WRITE_FAILED));
    }

    Ok(ExitCode::SUCCESS)
}

/// Log to stderr at Warn, or Debug with `--debug`; RUST_LOG refines either
fn init_logging(debug: bool) {
    let level = if debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .format(|buf, record| {
            use std::time::SystemTime;
            let datetime: chrono::DateTime<chrono::Local> = SystemTime::now().into();
            writeln!(
                buf,
                "[{}] [{}] {}",
                datetime.format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.level(),
                record.args()
            )
        })
        .init();

    log::debug!("=== UNITGEN DEBUG SESSION STARTED ===");
}
