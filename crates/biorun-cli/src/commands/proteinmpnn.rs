use super::docker_client;
use crate::cli::{ProteinmpnnArgs, RuntimeArgs};
use crate::config;
use crate::error::{CliError, Result};
use crate::ui;
use crate::utils::progress::CliProgressHandler;
use biorun_core::core::io::artifacts::{PREVIEW_LIMIT, Preview};
use biorun_core::engine::progress::ProgressReporter;
use biorun_core::workflows::design;
use tracing::{debug, info};

pub async fn run(args: ProteinmpnnArgs, runtime_args: &RuntimeArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let app = config::build_design_config(&args, runtime_args, &cwd)?;
    let job = &app.job;
    let params = &job.params;

    ui::banner("ProteinMPNN Docker Runner");
    ui::info("Input", job.input.display());
    ui::info(
        "Output",
        app.runtime.mount_root.resolve(&job.output_dir).display(),
    );
    ui::info("Chains", params.chain_restriction().unwrap_or("all"));
    ui::info("Designs", params.num_designs);
    ui::info("Temperature", &params.temperature);
    ui::info("Model", &params.model_name);
    if !params.omit_aa.is_empty() {
        ui::info("Omitted residues", &params.omit_aa);
    }

    let docker = docker_client(&app.runtime);
    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the design workflow...");
    let report = design::run(&docker, &app.runtime, job, &reporter).await?;
    debug!("ProteinMPNN stdout:\n{}", report.run.output.stdout);

    if !report.success() {
        ui::captured("STDERR", &report.run.output.stderr);
        return Err(CliError::ToolFailed {
            tool: "ProteinMPNN",
            code: report.run.exit_code(),
        });
    }

    if let Some(reorganization) = &report.reorganization {
        for warning in &reorganization.warnings {
            ui::warning(warning);
        }
    }
    ui::success("Sequence design completed successfully!");
    ui::info("Results saved to", report.run.output_dir.display());
    ui::preview(
        "Generated sequence files",
        &Preview::of(&report.run.artifacts, PREVIEW_LIMIT),
    );
    Ok(())
}
