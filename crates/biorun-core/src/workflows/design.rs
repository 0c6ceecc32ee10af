use super::single::{self, RunReport};
use crate::core::io::artifacts;
use crate::core::io::fsops;
use crate::core::tools::proteinmpnn;
use crate::engine::config::{DesignJob, RuntimeConfig};
use crate::engine::docker::{DockerClient, RunOptions};
use crate::engine::error::EngineError;
use crate::engine::process::ProcessRunner;
use crate::engine::progress::{Progress, ProgressReporter};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Subdirectory ProteinMPNN writes designed sequences into.
pub const SEQS_DIR: &str = "seqs";

/// What happened while flattening `seqs/` into the output directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reorganization {
    pub moved: Vec<String>,
    pub seqs_removed: bool,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DesignReport {
    pub run: RunReport,
    /// `None` when the run failed or produced no `seqs/` directory.
    pub reorganization: Option<Reorganization>,
}

impl DesignReport {
    pub fn success(&self) -> bool {
        self.run.success()
    }
}

/// Moves every `seqs/*.fa` into `output_dir`, replacing files of the same name, then removes
/// `seqs/`. Individual failures become warnings.
pub fn reorganize_outputs(output_dir: &Path) -> Option<Reorganization> {
    let seqs_dir = output_dir.join(SEQS_DIR);
    if !seqs_dir.is_dir() {
        return None;
    }

    let mut result = Reorganization::default();
    for fasta in artifacts::find_files(&seqs_dir, &["fa"], false) {
        let Some(name) = fasta.file_name() else {
            continue;
        };
        let target = output_dir.join(name);
        let name = name.to_string_lossy().into_owned();
        match fsops::move_file(&fasta, &target) {
            Ok(()) => {
                debug!("Moved {} to {}", name, output_dir.display());
                result.moved.push(name);
            }
            Err(e) => {
                warn!("Failed to move {}: {}", name, e);
                result.warnings.push(format!("Failed to move {}: {}", name, e));
            }
        }
    }

    match fsops::remove_tree(&seqs_dir) {
        Ok(()) => result.seqs_removed = true,
        Err(e) => {
            warn!("Failed to remove {}: {}", seqs_dir.display(), e);
            result
                .warnings
                .push(format!("Failed to remove seqs directory: {}", e));
        }
    }
    Some(result)
}

/// Runs ProteinMPNN on one structure and flattens its output layout on success.
#[instrument(skip_all, name = "design_workflow", fields(input = %job.input.display()))]
pub async fn run<R: ProcessRunner>(
    docker: &DockerClient<R>,
    config: &RuntimeConfig,
    job: &DesignJob,
    reporter: &ProgressReporter<'_>,
) -> Result<DesignReport, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Sequence design".to_string(),
    });

    let paths = single::resolve_paths(&config.mount_root, &job.input, &job.output_dir)?;
    let tool = proteinmpnn::command(&job.params, &paths.input, &paths.output);
    let options = RunOptions {
        image: &config.images.proteinmpnn,
        mount: Some(&config.mount_root),
        gpus: false,
    };

    let (command, output) =
        single::execute(docker, &options, &tool, &paths.output_host, reporter).await?;

    let (reorganization, artifacts) = if output.success() {
        let reorganization = reorganize_outputs(&paths.output_host);
        if let Some(r) = &reorganization {
            reporter.report(Progress::Message(format!(
                "Reorganized output structure ({} file(s) moved)",
                r.moved.len()
            )));
        }
        let found = artifacts::find_files(&paths.output_host, &["fa"], false);
        info!("ProteinMPNN produced {} sequence file(s).", found.len());
        (reorganization, found)
    } else {
        (None, Vec::new())
    };

    reporter.report(Progress::PhaseFinish);
    Ok(DesignReport {
        run: RunReport {
            command,
            output,
            output_dir: paths.output_host,
            artifacts,
        },
        reorganization,
    })
}
