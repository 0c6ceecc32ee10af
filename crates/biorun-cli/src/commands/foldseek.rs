use super::{docker_client, first_line};
use crate::cli::{FoldseekArgs, RuntimeArgs};
use crate::config;
use crate::error::{CliError, Result};
use crate::ui;
use crate::utils::progress::CliProgressHandler;
use biorun_core::core::format::DatabaseKind;
use biorun_core::engine::progress::ProgressReporter;
use biorun_core::workflows::search::{self, SearchReport};
use tracing::info;

fn describe_database(kind: DatabaseKind) -> &'static str {
    match kind {
        DatabaseKind::Structural => "structural (TM-score available)",
        DatabaseKind::SequenceOnly => "sequence-only (TM-score fields dropped)",
    }
}

pub async fn run(args: FoldseekArgs, runtime_args: &RuntimeArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let app = config::build_search_config(&args, runtime_args, &cwd)?;
    let job = &app.job;
    let mount = &app.runtime.mount_root;

    ui::banner("Foldseek Docker Runner");
    ui::info("Input", mount.resolve(&job.input_dir).display());
    ui::info("Database", mount.resolve(&job.database).display());
    if let Some(query) = &job.query_file {
        ui::info("Query", query);
    }
    if let Some(job_id) = &job.job_id {
        ui::info("Job ID", job_id);
    }

    let docker = docker_client(&app.runtime);
    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the search workflow...");
    let report = search::run(&docker, &app.runtime, job, &reporter).await?;

    for warning in &report.warnings {
        ui::warning(warning);
    }
    if report.is_empty() {
        ui::warning(format!(
            "No PDB files found in {}",
            mount.resolve(&job.input_dir).display()
        ));
        return Ok(());
    }

    print_summary(&report);

    if report.failed() > 0 {
        return Err(CliError::BatchFailed {
            failed: report.failed(),
            total: report.processed(),
        });
    }
    ui::success("All searches completed successfully!");
    Ok(())
}

fn print_summary(report: &SearchReport) {
    println!();
    ui::info("Database type", describe_database(report.database_kind));
    ui::info("Output format", &report.effective_format);
    ui::info("Processed", report.processed());
    ui::info("Successful", report.successful());
    ui::info("Failed", report.failed());

    for outcome in report.outcomes.iter().filter(|o| !o.success) {
        let name = outcome
            .query
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let reason = match outcome.exit_code {
            Some(code) => format!("exit code {}", code),
            None => "not started".to_string(),
        };
        ui::error(format!("{} ({}): {}", name, reason, first_line(&outcome.error)));
    }

    ui::info("Results saved to", report.output_dir.display());
    ui::info("Temporary files", report.tmp_dir.display());
    if let Some(marker) = &report.marker {
        ui::info("Completion marker", marker.display());
    }
    if let Some(info_file) = &report.info {
        ui::info("Job info", info_file.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_kinds_are_described_for_the_summary() {
        assert!(describe_database(DatabaseKind::Structural).contains("TM-score available"));
        assert!(describe_database(DatabaseKind::SequenceOnly).starts_with("sequence-only"));
    }
}
