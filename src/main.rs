use anyhow::Context;
use clap::Parser;
use load_fanout::config::RunMode;
use load_fanout::utils::error::ErrorSeverity;
use load_fanout::utils::{logger, validation::Validate};
use load_fanout::{
    CliConfig, ConfigProvider, HttpRequestOperation, LoadConfig, LoadEngine, LoadError,
    TracingObserver,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting load-fanout");

    let config = match cli.to_load_config().and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config);

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no requests will be sent");
        return Ok(());
    }

    let operation = Arc::new(
        HttpRequestOperation::from_config(&config.target)
            .with_context(|| format!("failed to build HTTP client for {}", config.target_url()))?,
    );

    let engine = LoadEngine::from_config(operation, &config, Arc::new(TracingObserver));

    match engine.run().await {
        Ok(report) => {
            println!(
                "\nSuccessful requests: {}/{}",
                report.aggregate.successes, report.aggregate.total
            );
            println!("Finished in {:.2} seconds.", report.elapsed.as_secs_f64());

            if cli.json_logs {
                let json = report
                    .to_json()
                    .context("failed to serialize the run report")?;
                println!("{}", json);
            }
        }
        Err(e) => exit_with(&e),
    }

    Ok(())
}

fn display_config_summary(config: &LoadConfig) {
    tracing::info!("🎯 Target: {} {}", config.target.method.to_uppercase(), config.target_url());
    match config.run.mode {
        RunMode::Concurrent => tracing::info!(
            "📋 Concurrent mode: {} requests with {} workers",
            config.total_requests(),
            config.concurrency()
        ),
        RunMode::Paced => tracing::info!(
            "📋 Paced mode: {} requests over {:?}",
            config.total_requests(),
            config.paced_duration().unwrap_or_default()
        ),
    }
    tracing::info!(
        "⏳ Timeout: {:?}, success status: {}",
        config.request_timeout(),
        config.success_status()
    );
    if config.target.accept_invalid_certs {
        tracing::warn!("🔓 accept_invalid_certs is enabled");
    }
}

fn exit_with(e: &LoadError) -> ! {
    tracing::error!(
        "❌ Load run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
