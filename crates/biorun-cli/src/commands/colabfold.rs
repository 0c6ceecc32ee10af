use super::docker_client;
use crate::cli::{ColabfoldArgs, RuntimeArgs};
use crate::config;
use crate::error::{CliError, Result};
use crate::ui;
use crate::utils::progress::CliProgressHandler;
use biorun_core::core::io::artifacts::{PREVIEW_LIMIT, Preview};
use biorun_core::engine::progress::ProgressReporter;
use biorun_core::workflows::predict;
use tracing::{debug, info};

pub async fn run(args: ColabfoldArgs, runtime_args: &RuntimeArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    info!("Merging configuration from defaults, config file and CLI arguments...");
    let app = config::build_prediction_config(&args, runtime_args, &cwd)?;
    let job = &app.job;
    let params = &job.params;

    ui::banner("ColabFold Docker Runner");
    ui::info("Input", job.input.display());
    ui::info(
        "Output",
        app.runtime.mount_root.resolve(&job.output_dir).display(),
    );
    ui::info("Model type", &params.model_type);
    ui::info("Models", params.num_models);
    ui::info("Recycles", params.num_recycles);
    if let Some(max_msa) = &params.max_msa {
        ui::info("Max MSA", max_msa);
    }
    ui::info("GPU", if params.use_gpu { "enabled" } else { "disabled" });

    let docker = docker_client(&app.runtime);
    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the prediction workflow...");
    let report = predict::run(&docker, &app.runtime, job, &reporter).await?;
    debug!("ColabFold stdout:\n{}", report.output.stdout);

    if !report.success() {
        ui::captured("STDERR", &report.output.stderr);
        return Err(CliError::ToolFailed {
            tool: "ColabFold",
            code: report.exit_code(),
        });
    }

    ui::success("Prediction completed successfully!");
    ui::info("Results saved to", report.output_dir.display());
    ui::preview(
        "Generated PDB files",
        &Preview::of(&report.artifacts, PREVIEW_LIMIT),
    );
    Ok(())
}
