use anyhow::{Context, Result};
use code_manager::manager::manager::WorkerPool;
use services::error_description_service::{self, ErrorDescriptionService};
use services::label_service::{self, LabelService};
use services::pair_service::{self, PairService};
use services::problem_list_service::{self, ProblemListService};
use services::stage::StageOutcome;
use tracing::info;
use tracing_appender::rolling;
use util::config::AppConfig;
use util::paths;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration and initialize logging
    let config = AppConfig::global().clone();
    let _log_guard = init_logging(&config.log_file, &config.log_level, config.log_to_stdout);

    info!(
        project = %config.project_name,
        env = %config.env,
        input_root = %paths::input_root().display(),
        workers = config.workers,
        "starting pipeline"
    );

    paths::ensure_dir(paths::generated_dir()).context("failed to create the generated directory")?;
    let pool = WorkerPool::new(config.workers);

    let outcome = ProblemListService::clean(config.force_clean)
        .with_context(|| format!("[{}] stage aborted", problem_list_service::STAGE))?;
    report(problem_list_service::STAGE, outcome);

    let outcome = PairService::run(&pool, config.force_pairs)
        .await
        .with_context(|| format!("[{}] stage aborted", pair_service::STAGE))?;
    report(pair_service::STAGE, outcome);

    let outcome = ErrorDescriptionService::run(&pool, config.force_errors)
        .await
        .with_context(|| format!("[{}] stage aborted", error_description_service::STAGE))?;
    report(error_description_service::STAGE, outcome);

    let outcome = LabelService::run(&pool, config.force_labels)
        .await
        .with_context(|| format!("[{}] stage aborted", label_service::STAGE))?;
    report(label_service::STAGE, outcome);

    info!("pipeline finished");
    Ok(())
}

fn report(stage: &str, outcome: StageOutcome) {
    info!(stage, "{}", outcome);
}

fn init_logging(
    log_file: &str,
    log_level: &str,
    log_to_stdout: bool,
) -> tracing_appender::non_blocking::WorkerGuard {
    use std::fs;
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    fs::create_dir_all("logs").ok();

    let file_appender = rolling::daily("logs", log_file);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true);

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_target(true);

    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| {
        EnvFilter::new("info")
    });

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer);

    if log_to_stdout {
        registry.with(stdout_layer).init();
    } else {
        registry.init();
    }

    guard
}
