use crate::core::command::{CommandBuilder, CommandLine};
use crate::core::mount::MountRoot;
use crate::engine::error::EngineError;
use crate::engine::process::{ProcessOutput, ProcessRunner};
use std::future::Future;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Options for a one-shot `docker run --rm`.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions<'a> {
    pub image: &'a str,
    pub mount: Option<&'a MountRoot>,
    pub gpus: bool,
}

/// Thin Docker CLI client on top of a [`ProcessRunner`].
///
/// Command construction is kept in plain functions returning [`CommandLine`] so it can be
/// checked without a daemon.
pub struct DockerClient<R> {
    runner: R,
    binary: String,
}

impl<R: ProcessRunner> DockerClient<R> {
    pub fn new(runner: R, binary: impl Into<String>) -> Self {
        Self {
            runner,
            binary: binary.into(),
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn docker(&self) -> CommandBuilder {
        CommandBuilder::new(self.binary.as_str())
    }

    /// `docker run --rm [--gpus all] [-v root:/data] <image> <tool...>`
    pub fn run_command(&self, options: &RunOptions<'_>, tool: &CommandLine) -> CommandLine {
        self.docker()
            .args(["run", "--rm"])
            .opt_flag("--gpus", options.gpus.then_some("all"))
            .opt_flag("-v", options.mount.map(MountRoot::volume_spec))
            .arg(options.image)
            .args(tool.tokens())
            .build()
    }

    /// Fails with a precondition error unless `docker --version` succeeds.
    pub async fn check_available(&self) -> Result<String, EngineError> {
        let cmd = self.docker().arg("--version").build();
        match self.runner.run(&cmd, None).await {
            Ok(output) if output.success() => {
                let version = output.stdout.trim().to_string();
                debug!("Docker available: {}", version);
                Ok(version)
            }
            Ok(_) | Err(_) => Err(EngineError::precondition(
                "Docker is not available or not running",
            )),
        }
    }

    /// Fails with a precondition error unless the daemon answers `docker info`.
    pub async fn check_daemon(&self) -> Result<(), EngineError> {
        let cmd = self.docker().arg("info").build();
        match self.runner.run(&cmd, None).await {
            Ok(output) if output.success() => Ok(()),
            _ => Err(EngineError::precondition("Docker daemon is not running")),
        }
    }

    /// True when `docker images -q <image>` lists at least one image id.
    pub async fn image_exists(&self, image: &str) -> Result<bool, EngineError> {
        let cmd = self.docker().args(["images", "-q", image]).build();
        let output = self.runner.run(&cmd, None).await?;
        Ok(output.success() && !output.stdout.trim().is_empty())
    }

    /// Runs a one-shot container and returns its captured output.
    pub async fn run(
        &self,
        options: &RunOptions<'_>,
        tool: &CommandLine,
        timeout: Option<Duration>,
    ) -> Result<(CommandLine, ProcessOutput), EngineError> {
        let cmd = self.run_command(options, tool);
        let output = self.execute(&cmd, timeout).await?;
        Ok((cmd, output))
    }

    /// Executes an already built Docker command line.
    pub async fn execute(
        &self,
        cmd: &CommandLine,
        timeout: Option<Duration>,
    ) -> Result<ProcessOutput, EngineError> {
        self.runner.run(cmd, timeout).await
    }

    /// Checks whether the image can see a CUDA device. Any failure counts as "no GPU".
    pub async fn gpu_available(&self, image: &str, timeout: Duration) -> bool {
        let probe = CommandBuilder::new("python")
            .args(["-c", "import torch; print(torch.cuda.is_available())"])
            .build();
        let options = RunOptions {
            image,
            mount: None,
            gpus: true,
        };
        match self.run(&options, &probe, Some(timeout)).await {
            Ok((_, output)) => output.success() && output.stdout.contains("True"),
            Err(e) => {
                debug!("GPU probe failed: {}", e);
                false
            }
        }
    }

    pub async fn start_detached(&self, name: &str, image: &str, gpus: bool) -> Result<(), EngineError> {
        let cmd = self
            .docker()
            .args(["run", "-d"])
            .flag("--name", name)
            .opt_flag("--gpus", gpus.then_some("all"))
            .arg(image)
            .args(["tail", "-f", "/dev/null"])
            .build();
        self.expect_success("start", &cmd, None).await.map(|_| ())
    }

    pub async fn copy_into(
        &self,
        host_path: &Path,
        container: &str,
        destination: &str,
    ) -> Result<(), EngineError> {
        let cmd = self
            .docker()
            .arg("cp")
            .arg(host_path.display().to_string())
            .arg(format!("{}:{}", container, destination))
            .build();
        self.expect_success("copy in", &cmd, None).await.map(|_| ())
    }

    pub async fn copy_from(
        &self,
        container: &str,
        source: &str,
        host_path: &Path,
    ) -> Result<(), EngineError> {
        let cmd = self
            .docker()
            .arg("cp")
            .arg(format!("{}:{}", container, source))
            .arg(host_path.display().to_string())
            .build();
        self.expect_success("copy out", &cmd, None).await.map(|_| ())
    }

    /// Runs `tool` inside a running container. A non-zero exit is returned, not an error.
    pub async fn exec(
        &self,
        container: &str,
        tool: &CommandLine,
        timeout: Option<Duration>,
    ) -> Result<ProcessOutput, EngineError> {
        let cmd = self
            .docker()
            .arg("exec")
            .arg(container)
            .args(tool.tokens())
            .build();
        self.runner.run(&cmd, timeout).await
    }

    pub async fn remove_container(&self, name: &str) -> Result<(), EngineError> {
        let cmd = self.docker().args(["rm", "-f", name]).build();
        self.expect_success("remove", &cmd, None).await.map(|_| ())
    }

    /// Starts a throwaway container, hands its name to `body`, and removes the container
    /// afterwards on every path, including when starting it or `body` failed.
    pub async fn with_temp_container<T, F, Fut>(
        &self,
        name: &str,
        image: &str,
        gpus: bool,
        body: F,
    ) -> Result<T, EngineError>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<T, EngineError>>,
    {
        info!("Starting container: {}", name);
        let result = match self.start_detached(name, image, gpus).await {
            Ok(()) => body(name.to_string()).await,
            Err(e) => Err(e),
        };

        if let Err(e) = self.remove_container(name).await {
            warn!("Failed to remove container {}: {}", name, e);
        }
        result
    }

    async fn expect_success(
        &self,
        operation: &'static str,
        cmd: &CommandLine,
        timeout: Option<Duration>,
    ) -> Result<ProcessOutput, EngineError> {
        let output = self.runner.run(cmd, timeout).await?;
        if output.success() {
            Ok(output)
        } else {
            Err(EngineError::Container {
                operation,
                message: output.stderr.trim().to_string(),
            })
        }
    }
}
