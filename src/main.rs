//! # httpdiff Main Entry Point
//!
//! Parses arguments, loads the profile, runs one comparison and exits with
//! the outcome's code.

use httpdiff::cmd_args::CommandLineArgs;
use httpdiff::config::{get_profile_path, IniProfileStore, Settings, LOG_LEVEL_ENV_VAR};
use httpdiff::outcome::EXIT_FATAL;
use httpdiff::AppController;
use std::io::Write;

fn init_tracing(verbose: bool) {
    #[allow(clippy::disallowed_methods)]
    let log_level = std::env::var(LOG_LEVEL_ENV_VAR)
        .unwrap_or_else(|_| "warn".to_string())
        .to_lowercase();

    let level = match log_level.as_str() {
        "trace" => tracing::Level::TRACE,
        _ if verbose => tracing::Level::DEBUG,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: &CommandLineArgs) -> anyhow::Result<i32> {
    let store = IniProfileStore::new(&get_profile_path());
    let profile = store.get_profile(args.profile())?.unwrap_or_default();

    let mut settings = Settings::resolve(args, &profile)?;
    settings.mono |= !atty::is(atty::Stream::Stdout);

    let app = AppController::new(settings)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let outcome = app.run(&mut out).await?;
    out.flush()?;

    if let httpdiff::ComparisonOutcome::Fatal(message) = &outcome {
        tracing::debug!("Fatal: {}", message);
    }
    Ok(outcome.exit_code())
}

#[tokio::main]
async fn main() {
    let args = CommandLineArgs::parse();
    init_tracing(args.verbose());

    let code = match run(&args).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            EXIT_FATAL
        }
    };
    std::process::exit(code);
}
