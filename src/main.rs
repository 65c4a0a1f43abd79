use clap::Parser;
use mimalloc::MiMalloc;
use querydesk_provider::cli::{self, Cli};
use querydesk_provider::config::Config;
use querydesk_provider::error::{Diagnostic, Severity};
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = Cli::parse();

    let cfg = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_level(true)
                .with_target(false),
        )
        .init();

    debug!(
        host = %cfg.host.as_deref().unwrap_or("<none>"),
        loglevel = %cfg.loglevel,
        timeout_secs = cfg.timeout_secs
    );

    match cli::run(args, cfg).await {
        Ok(output) => {
            for warning in output.warnings.iter() {
                report(warning);
            }
            match serde_json::to_string_pretty(&output.value) {
                Ok(json) => {
                    println!("{json}");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    error!(error = %e, "failed to encode output");
                    ExitCode::FAILURE
                }
            }
        }
        Err(diags) => {
            for diag in diags.iter() {
                report(diag);
            }
            if diags.has_error() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
    }
}

fn report(diag: &Diagnostic) {
    let level = match diag.severity {
        Severity::Error => "Error",
        Severity::Warning => "Warning",
    };
    match diag.attribute.as_deref() {
        Some(attribute) => eprintln!("{level}: {} (at {attribute})\n  {}", diag.summary, diag.detail),
        None => eprintln!("{level}: {}\n  {}", diag.summary, diag.detail),
    }
}
