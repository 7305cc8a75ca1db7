mod cli;
mod playground;

use std::path::Path;
use std::process::ExitCode;

use rod_common::ConfigError;
use rod_config::RodConfig;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVE: &str = "rod=info";

fn load_config(path: Option<&str>) -> Result<RodConfig, ConfigError> {
    match path {
        Some(path) => {
            let config = rod_config::load_from_path(Path::new(path))?;
            rod_config::validation::validate(&config)?;
            Ok(config)
        }
        None => rod_config::load_config(),
    }
}

fn init_logging(directive: &str) {
    let filter = EnvFilter::from_default_env();
    let filter = match directive
        .parse::<Directive>()
        .or_else(|_| DEFAULT_DIRECTIVE.parse())
    {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> ExitCode {
    let args = cli::parse();

    // Config decides the log level, so it loads before logging exists.
    let (config, config_error) = match load_config(args.config.as_deref()) {
        Ok(config) => (config, None),
        Err(e) => (RodConfig::default(), Some(e)),
    };

    let directive = args
        .log_level
        .as_deref()
        .unwrap_or(config.logging.level.as_str());
    init_logging(directive);

    tracing::info!("Rod playground v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(ref path) = args.config {
        tracing::info!("Using config override: {path}");
    }
    if let Some(e) = config_error {
        tracing::warn!("Config load failed, using defaults: {e}");
    }
    tracing::debug!("Effective config: {}", rod_config::config_to_json(&config));

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let local = tokio::task::LocalSet::new();
    let result = local.block_on(&runtime, playground::run(&args, &config));
    match result {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Playground failed: {e}");
            ExitCode::FAILURE
        }
    }
}
