use crate::core::command::CommandLine;
use crate::core::mount::MountRoot;
use crate::engine::docker::{DockerClient, RunOptions};
use crate::engine::error::EngineError;
use crate::engine::process::{ProcessOutput, ProcessRunner};
use crate::engine::progress::{Progress, ProgressReporter};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Result of a one-shot container run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// The full `docker run` command line that was executed.
    pub command: CommandLine,
    pub output: ProcessOutput,
    pub output_dir: PathBuf,
    /// Produced files, empty when the run failed.
    pub artifacts: Vec<PathBuf>,
}

impl RunReport {
    pub fn success(&self) -> bool {
        self.output.success()
    }

    pub fn exit_code(&self) -> i32 {
        self.output.exit_code()
    }
}

/// Host and container forms of a single input file and an output directory.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedPaths {
    pub input: String,
    pub output: String,
    pub input_host: PathBuf,
    pub output_host: PathBuf,
}

/// Rewrites both paths into the container before anything touches the filesystem.
pub(crate) fn resolve_paths(
    mount: &MountRoot,
    input: &Path,
    output_dir: &Path,
) -> Result<ResolvedPaths, EngineError> {
    let input_host = mount.resolve(input);
    let output_host = mount.resolve(output_dir);
    let input_container = mount.to_container(&input_host)?;
    let output_container = mount.to_container(&output_host)?;

    if !input_host.is_file() {
        return Err(EngineError::precondition(format!(
            "Input file not found: {}",
            input_host.display()
        )));
    }

    Ok(ResolvedPaths {
        input: input_container,
        output: output_container,
        input_host,
        output_host,
    })
}

/// Preflight, output directory creation, and one `docker run --rm` of `tool`.
pub(crate) async fn execute<R: ProcessRunner>(
    docker: &DockerClient<R>,
    options: &RunOptions<'_>,
    tool: &CommandLine,
    output_dir: &Path,
    reporter: &ProgressReporter<'_>,
) -> Result<(CommandLine, ProcessOutput), EngineError> {
    docker.check_available().await?;
    fs::create_dir_all(output_dir)?;

    let cmd = docker.run_command(options, tool);
    info!("Running: {}", cmd);
    reporter.report(Progress::Command(cmd.to_string()));

    reporter.report(Progress::TaskStart { total_steps: 1 });
    let output = docker.execute(&cmd, None).await;
    reporter.report(Progress::TaskFinish);

    let output = output?;
    if !output.success() {
        warn!("Container exited with status {:?}", output.status);
    }
    Ok((cmd, output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn resolve_paths_rejects_paths_outside_the_root() {
        let dir = tempdir().unwrap();
        let mount = MountRoot::new(dir.path());
        let err = resolve_paths(&mount, Path::new("/elsewhere/x.pdb"), Path::new("out"))
            .unwrap_err();
        assert!(matches!(err, EngineError::PathResolution(_)));
    }

    #[test]
    fn resolve_paths_requires_an_existing_input() {
        let dir = tempdir().unwrap();
        let mount = MountRoot::new(dir.path());
        let err = resolve_paths(&mount, Path::new("input/x.pdb"), Path::new("out")).unwrap_err();
        assert!(matches!(err, EngineError::Precondition(_)));
    }

    #[test]
    fn resolve_paths_maps_relative_paths_into_the_mount() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("input")).unwrap();
        fs::write(dir.path().join("input/x.pdb"), "ATOM").unwrap();
        let mount = MountRoot::new(dir.path());

        let paths = resolve_paths(&mount, Path::new("input/x.pdb"), Path::new("out/run1")).unwrap();
        assert_eq!(paths.input, "/data/input/x.pdb");
        assert_eq!(paths.output, "/data/out/run1");
        assert_eq!(paths.output_host, dir.path().join("out/run1"));
    }
}
