//! `petit-prof` server binary.
//!
//! Startup order: `.env`, CLI args, config, logger, guidance + provider +
//! relay, Ctrl-C watcher, then the HTTP channel until shutdown.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use petit_prof::config::{self, Config};
use petit_prof::error::AppError;
use petit_prof::logger::LevelSource;
use petit_prof::llm::providers;
use petit_prof::relay::Relay;
use petit_prof::tutor::Guidance;
use petit_prof::{comms, logger};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    // .env is optional.
    let _ = dotenvy::dotenv();

    let args = match parse_cli_args(std::env::args().skip(1)) {
        Ok(args) if args.help => {
            println!("{USAGE}");
            return Ok(());
        }
        Ok(args) => args,
        Err(msg) => return Err(AppError::Config(format!("{msg}\n\n{USAGE}"))),
    };

    let config = config::load(args.config_path.as_deref())?;

    let (effective_log_level, source) = match args.log_level {
        Some(level) => (level, LevelSource::Cli),
        None => (config.log_level.as_str(), LevelSource::Config),
    };

    logger::init(effective_log_level, source)?;

    info!(
        name = %config.name,
        configured_log_level = %config.log_level,
        effective_log_level = %effective_log_level,
        "config loaded"
    );

    let guidance = Arc::new(Guidance::from_config(&config.tutor)?);
    let provider = providers::build(&config.llm, config.llm_api_key.clone())?;
    let relay = Relay::new(provider, guidance);

    info!(provider = %config.llm.provider, model = %relay.model(), "relay ready");

    // Ctrl-C cancels the token; the http channel drains and returns.
    let shutdown = CancellationToken::new();
    let ctrlc_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("ctrl-c received, shutting down");
            ctrlc_token.cancel();
        }
    });

    print_startup_summary(&config);

    comms::run(&config, relay, shutdown.clone()).await?;

    shutdown.cancel();
    info!("shutdown complete");
    Ok(())
}

fn print_startup_summary(config: &Config) {
    let http_line = if config.comms_axum_should_load() {
        format!("http: {} (POST /chat, GET /)", config.comms.axum_channel.bind)
    } else {
        "http: disabled".to_string()
    };
    let llm_line = format!(
        "provider={} model={} timeout={}s",
        config.llm.provider,
        config.llm.active_model(),
        config.llm.active_timeout_seconds()
    );
    let tutor_line = match &config.tutor.system_prompt_file {
        Some(p) => format!("system prompt: {}", p.display()),
        None => "system prompt: built-in".to_string(),
    };

    println!("── {} ──", config.name);
    println!("  📡 {http_line}");
    println!("  🧠 {llm_line}");
    println!("  📚 {tutor_line}");
}

const USAGE: &str = "\
Usage: petit-prof [OPTIONS]

Options:
  -h, --help                 Print help
  -f, --config <PATH>        Configuration file (default: config/default.toml)
  -v, -vv, -vvv, -vvvv       Log warn / info / debug / trace, ignoring RUST_LOG";

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    help: bool,
    log_level: Option<&'static str>,
    config_path: Option<String>,
}

fn parse_cli_args(args: impl IntoIterator<Item = String>) -> Result<CliArgs, String> {
    let mut parsed = CliArgs::default();
    let mut verbosity = 0usize;

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--" => break,
            "-h" | "--help" => parsed.help = true,
            "-f" | "--config" => {
                let path = iter.next().ok_or("-f/--config requires a path argument")?;
                parsed.config_path = Some(path);
            }
            "--verbose" => verbosity += 1,
            a if a.len() > 1 && a.starts_with('-') && a[1..].bytes().all(|b| b == b'v') => {
                verbosity += a.len() - 1;
            }
            other => return Err(format!("unexpected argument '{other}'")),
        }
    }

    parsed.log_level = match verbosity {
        0 => None,
        1 => Some("warn"),
        2 => Some("info"),
        3 => Some("debug"),
        _ => Some("trace"),
    };
    Ok(parsed)
}
