use super::single::{self, RunReport};
use crate::core::io::artifacts;
use crate::core::tools::colabfold;
use crate::engine::config::{PredictionJob, RuntimeConfig};
use crate::engine::docker::{DockerClient, RunOptions};
use crate::engine::error::EngineError;
use crate::engine::process::ProcessRunner;
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument};

/// Runs ColabFold on one input file.
///
/// A non-zero tool exit is not an error: it is returned in the report so the caller can surface
/// stderr and propagate the exit code.
#[instrument(skip_all, name = "predict_workflow", fields(input = %job.input.display()))]
pub async fn run<R: ProcessRunner>(
    docker: &DockerClient<R>,
    config: &RuntimeConfig,
    job: &PredictionJob,
    reporter: &ProgressReporter<'_>,
) -> Result<RunReport, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Structure prediction".to_string(),
    });

    let paths = single::resolve_paths(&config.mount_root, &job.input, &job.output_dir)?;
    let tool = colabfold::command(&job.params, &paths.input, &paths.output);
    let options = RunOptions {
        image: &config.images.colabfold,
        mount: Some(&config.mount_root),
        gpus: job.params.use_gpu,
    };

    let (command, output) =
        single::execute(docker, &options, &tool, &paths.output_host, reporter).await?;

    let artifacts = if output.success() {
        let found = artifacts::find_files(&paths.output_host, &["pdb"], true);
        info!("ColabFold produced {} structure file(s).", found.len());
        found
    } else {
        Vec::new()
    };

    reporter.report(Progress::PhaseFinish);
    Ok(RunReport {
        command,
        output,
        output_dir: paths.output_host,
        artifacts,
    })
}
