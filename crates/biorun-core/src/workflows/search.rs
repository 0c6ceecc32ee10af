use crate::core::command::CommandLine;
use crate::core::format::{self, DatabaseKind};
use crate::core::io::artifacts;
use crate::core::io::markers::{self, JobStatus, JobSummary};
use crate::core::tools::foldseek::{self, SearchTargets};
use crate::engine::config::{RuntimeConfig, SearchJob};
use crate::engine::docker::{DockerClient, RunOptions};
use crate::engine::error::EngineError;
use crate::engine::process::ProcessRunner;
use crate::engine::progress::{Progress, ProgressReporter};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// Suffix of the per-query result table (`<stem>_fs.tsv`).
pub const RESULT_SUFFIX: &str = "_fs.tsv";

/// Outcome of searching one query structure.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub query: PathBuf,
    pub result_file: PathBuf,
    pub command: CommandLine,
    pub success: bool,
    /// Exit status of the container, `None` when it never produced one.
    pub exit_code: Option<i32>,
    /// Captured stderr, or the launch error when the container could not be started.
    pub error: String,
}

#[derive(Debug, Clone)]
pub struct SearchReport {
    pub outcomes: Vec<FileOutcome>,
    pub database_kind: DatabaseKind,
    pub effective_format: String,
    pub output_dir: PathBuf,
    /// The tmp directory handed to Foldseek (job-scoped when a job id was given).
    pub tmp_dir: PathBuf,
    pub marker: Option<PathBuf>,
    pub info: Option<PathBuf>,
    pub warnings: Vec<String>,
}

impl SearchReport {
    pub fn processed(&self) -> usize {
        self.outcomes.len()
    }

    pub fn successful(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success).count()
    }

    pub fn failed(&self) -> usize {
        self.processed() - self.successful()
    }

    pub fn status(&self) -> JobStatus {
        JobStatus::from_failures(self.failed())
    }

    /// True when the batch had nothing to do.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

struct ContainerDirs {
    database: String,
    output: String,
    tmp: String,
}

fn result_file_name(query: &Path) -> String {
    let stem = query
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{}{}", stem, RESULT_SUFFIX)
}

/// Collects the query structures: the named file, or every `*.pdb` directly in `input_dir`.
fn select_queries(input_dir: &Path, query_file: Option<&str>) -> Result<Vec<PathBuf>, EngineError> {
    let Some(name) = query_file else {
        return Ok(artifacts::find_files(input_dir, &["pdb"], false));
    };

    let query = input_dir.join(name);
    if !query.is_file() {
        return Err(EngineError::precondition(format!(
            "Query file {} not found",
            query.display()
        )));
    }
    let is_pdb = query
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdb"));
    if !is_pdb {
        return Err(EngineError::precondition(format!(
            "Query file must be a PDB file: {}",
            name
        )));
    }
    Ok(vec![query])
}

/// Runs Foldseek `easy-search` for every query structure, one container at a time.
///
/// Per-file failures are counted and the batch continues. When the job has an id, a completion
/// marker and a job info file are written to the output directory afterwards.
#[instrument(skip_all, name = "search_workflow", fields(job_id = job.job_id.as_deref().unwrap_or("-")))]
pub async fn run<R: ProcessRunner>(
    docker: &DockerClient<R>,
    config: &RuntimeConfig,
    job: &SearchJob,
    reporter: &ProgressReporter<'_>,
) -> Result<SearchReport, EngineError> {
    let mount = &config.mount_root;
    let input_dir = mount.resolve(&job.input_dir);
    let output_dir = mount.resolve(&job.output_dir);
    let database = mount.resolve(&job.database);
    let tmp_dir = match &job.job_id {
        Some(id) => mount.resolve(&job.tmp_dir).join(id),
        None => mount.resolve(&job.tmp_dir),
    };

    mount.to_container(&input_dir)?;
    let dirs = ContainerDirs {
        database: mount.to_container(&database)?,
        output: mount.to_container(&output_dir)?,
        tmp: mount.to_container(&tmp_dir)?,
    };

    docker.check_available().await?;
    let image = config.images.foldseek.as_str();
    if !docker.image_exists(image).await? {
        return Err(EngineError::precondition(format!(
            "Foldseek Docker image '{}' not found. Build it first with: docker build -t {} .",
            image, image
        )));
    }
    if !database.exists() {
        return Err(EngineError::precondition(format!(
            "DB path {} not found",
            database.display()
        )));
    }
    if !input_dir.is_dir() {
        return Err(EngineError::precondition(format!(
            "Input directory {} not found",
            input_dir.display()
        )));
    }

    let queries = select_queries(&input_dir, job.query_file.as_deref())?;

    fs::create_dir_all(&output_dir)?;
    fs::create_dir_all(&tmp_dir)?;

    let database_kind = DatabaseKind::detect(&database);
    let effective_format = format::effective_format(&job.params.format, database_kind);
    if !database_kind.supports_tmscore() {
        info!(
            "No coordinate side-car for {}; TM-score fields disabled.",
            database.display()
        );
    }

    let mut report = SearchReport {
        outcomes: Vec::with_capacity(queries.len()),
        database_kind,
        effective_format,
        output_dir: output_dir.clone(),
        tmp_dir,
        marker: None,
        info: None,
        warnings: Vec::new(),
    };

    if queries.is_empty() {
        warn!("No PDB files found in {}", input_dir.display());
        return Ok(report);
    }

    reporter.report(Progress::PhaseStart {
        name: format!("Searching {} structure(s)", queries.len()),
    });
    reporter.report(Progress::TaskStart {
        total_steps: queries.len() as u64,
    });

    let options = RunOptions {
        image,
        mount: Some(mount),
        gpus: false,
    };
    for query in queries {
        let outcome = search_one(
            docker,
            &options,
            job,
            &dirs,
            database_kind,
            &query,
            &output_dir,
            reporter,
        )
        .await?;
        reporter.report(Progress::UnitFinished {
            name: display_name(&outcome.query),
            success: outcome.success,
            detail: display_name(&outcome.result_file),
        });
        reporter.report(Progress::TaskIncrement);
        report.outcomes.push(outcome);
    }

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);
    info!(
        "Completed: {} successful, {} failed",
        report.successful(),
        report.failed()
    );

    if let Some(job_id) = &job.job_id {
        write_bookkeeping(&mut report, job, job_id, &database);
    }
    Ok(report)
}

#[allow(clippy::too_many_arguments)]
async fn search_one<R: ProcessRunner>(
    docker: &DockerClient<R>,
    options: &RunOptions<'_>,
    job: &SearchJob,
    dirs: &ContainerDirs,
    kind: DatabaseKind,
    query: &Path,
    output_dir: &Path,
    reporter: &ProgressReporter<'_>,
) -> Result<FileOutcome, EngineError> {
    let file_name = result_file_name(query);
    let result_file = output_dir.join(&file_name);
    let targets = SearchTargets {
        query: options
            .mount
            .map(|m| m.to_container(query))
            .transpose()?
            .unwrap_or_else(|| query.display().to_string()),
        database: dirs.database.clone(),
        output: format!("{}/{}", dirs.output, file_name),
        tmp: dirs.tmp.clone(),
    };

    let tool = foldseek::command(&job.params, &targets, kind);
    let command = docker.run_command(options, &tool);
    info!("Processing {}", display_name(query));
    reporter.report(Progress::Command(command.to_string()));

    let outcome = match docker.execute(&command, None).await {
        Ok(output) => FileOutcome {
            query: query.to_path_buf(),
            result_file,
            success: output.success(),
            exit_code: output.status,
            error: output.stderr.trim().to_string(),
            command,
        },
        Err(e) => {
            warn!("Failed to launch Foldseek for {}: {}", display_name(query), e);
            FileOutcome {
                query: query.to_path_buf(),
                result_file,
                success: false,
                exit_code: None,
                error: e.to_string(),
                command,
            }
        }
    };
    if !outcome.success {
        warn!(
            "Foldseek failed ({:?}) for {}",
            outcome.exit_code,
            display_name(query)
        );
    }
    Ok(outcome)
}

fn write_bookkeeping(report: &mut SearchReport, job: &SearchJob, job_id: &str, database: &Path) {
    let now = Local::now();
    match markers::write_completion_marker(&report.output_dir, job_id, report.status(), &now) {
        Ok(path) => report.marker = Some(path),
        Err(e) => {
            warn!("Failed to create completion marker: {}", e);
            report
                .warnings
                .push(format!("Failed to create completion marker: {}", e));
        }
    }

    let summary = JobSummary {
        job_id: job_id.to_string(),
        processed: report.processed(),
        successful: report.successful(),
        failed: report.failed(),
        parameters: job.params.to_string(),
        database: database.to_path_buf(),
        output_format: job.params.format.clone(),
    };
    match markers::write_job_info(&report.output_dir, &summary) {
        Ok(path) => report.info = Some(path),
        Err(e) => {
            warn!("Failed to create job info file: {}", e);
            report
                .warnings
                .push(format!("Failed to create job info file: {}", e));
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::format::sidecar_path;
    use crate::engine::config::{RuntimeConfigBuilder, SearchJobBuilder};
    use crate::engine::process::testing::ScriptedRunner;
    use tempfile::{TempDir, tempdir};

    struct Fixture {
        dir: TempDir,
        config: RuntimeConfig,
    }

    impl Fixture {
        fn new(pdbs: &[&str], with_sidecar: bool) -> Self {
            let dir = tempdir().unwrap();
            let root = dir.path();
            fs::create_dir_all(root.join("input")).unwrap();
            for name in pdbs {
                fs::write(root.join("input").join(name), "ATOM").unwrap();
            }
            fs::create_dir_all(root.join("database")).unwrap();
            fs::write(root.join("database/fsDB"), "").unwrap();
            if with_sidecar {
                fs::write(sidecar_path(&root.join("database/fsDB")), "").unwrap();
            }
            let config = RuntimeConfigBuilder::new()
                .docker_binary("docker")
                .mount_root(root.to_path_buf())
                .build()
                .unwrap();
            Self { dir, config }
        }

        fn root(&self) -> &Path {
            self.dir.path()
        }

        fn job(&self, job_id: Option<&str>) -> SearchJob {
            SearchJobBuilder::new()
                .input_dir(PathBuf::from("input"))
                .output_dir(PathBuf::from("output"))
                .database(PathBuf::from("database/fsDB"))
                .tmp_dir(PathBuf::from("tmp"))
                .job_id(job_id.map(str::to_string))
                .build()
                .unwrap()
        }
    }

    fn docker_with_image() -> DockerClient<ScriptedRunner> {
        let runner = ScriptedRunner::new();
        runner.respond_to("images", ScriptedRunner::ok("3f2a9c1b\n"));
        DockerClient::new(runner, "docker")
    }

    #[tokio::test]
    async fn batch_counts_failures_and_marks_the_job_failed() {
        let fx = Fixture::new(&["a.pdb", "b.pdb", "c.pdb"], true);
        let docker = docker_with_image();
        docker.runner().push(ScriptedRunner::ok("")); // --version
        docker.runner().push(ScriptedRunner::ok("")); // a
        docker.runner().push(ScriptedRunner::exit(1, "segfault")); // b
        docker.runner().push(Err("broken pipe".to_string())); // c

        let report = run(&docker, &fx.config, &fx.job(Some("job42")), &ProgressReporter::new())
            .await
            .unwrap();

        assert_eq!(report.processed(), 3);
        assert_eq!(report.successful(), 1);
        assert_eq!(report.failed(), 2);
        assert_eq!(report.status(), JobStatus::Failed);

        let marker = fs::read_to_string(report.marker.unwrap()).unwrap();
        assert!(marker.starts_with("Job job42 completed with status: FAILED\n"));
        let info = fs::read_to_string(report.info.unwrap()).unwrap();
        assert!(info.contains("Processed files: 3\nSuccessful: 1\nFailed: 2\n"));

        assert!(fx.root().join("tmp/job42").is_dir());
        let first = &docker.runner().commands_with("run")[0];
        assert!(first.contains("/data/tmp/job42"));
        assert!(first.contains("/data/output/a_fs.tsv"));
    }

    #[tokio::test]
    async fn clean_batch_marks_success() {
        let fx = Fixture::new(&["a.pdb", "b.pdb"], true);
        let docker = docker_with_image();
        let report = run(&docker, &fx.config, &fx.job(Some("ok")), &ProgressReporter::new())
            .await
            .unwrap();

        assert_eq!(report.failed(), 0);
        let marker = fs::read_to_string(fx.root().join("output/ok.done.txt")).unwrap();
        assert!(marker.contains("status: SUCCESS"));
    }

    #[tokio::test]
    async fn sequence_only_database_drops_tmscore_everywhere() {
        let fx = Fixture::new(&["a.pdb"], false);
        let docker = docker_with_image();
        let report = run(&docker, &fx.config, &fx.job(None), &ProgressReporter::new())
            .await
            .unwrap();

        assert_eq!(report.database_kind, DatabaseKind::SequenceOnly);
        assert_eq!(report.effective_format, "query,target,evalue,pident,bits");
        let cmd = &report.outcomes[0].command;
        assert!(!cmd.contains("--tmscore-threshold"));
        assert_eq!(cmd.value_of("--format-output"), Some("query,target,evalue,pident,bits"));
        assert!(report.marker.is_none());
    }

    #[tokio::test]
    async fn structural_database_keeps_tmscore_threshold() {
        let fx = Fixture::new(&["a.pdb"], true);
        let docker = docker_with_image();
        let report = run(&docker, &fx.config, &fx.job(None), &ProgressReporter::new())
            .await
            .unwrap();
        let cmd = &report.outcomes[0].command;
        assert_eq!(cmd.value_of("--tmscore-threshold"), Some("0.0"));
        assert_eq!(cmd.value_of("--format-output"), Some(format::DEFAULT_FORMAT));
    }

    #[tokio::test]
    async fn empty_input_directory_is_not_an_error() {
        let fx = Fixture::new(&[], true);
        let docker = docker_with_image();
        let report = run(&docker, &fx.config, &fx.job(Some("none")), &ProgressReporter::new())
            .await
            .unwrap();
        assert!(report.is_empty());
        assert!(docker.runner().commands_with("run").is_empty());
        assert!(!fx.root().join("output/none.done.txt").exists());
    }

    #[tokio::test]
    async fn database_outside_the_mount_root_launches_nothing() {
        let fx = Fixture::new(&["a.pdb"], true);
        let docker = docker_with_image();
        let mut job = fx.job(None);
        job.database = PathBuf::from("/opt/shared/fsDB");

        let err = run(&docker, &fx.config, &job, &ProgressReporter::new())
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::PathResolution(_)));
        assert!(docker.runner().commands().is_empty());
    }

    #[tokio::test]
    async fn missing_image_is_a_precondition_failure() {
        let fx = Fixture::new(&["a.pdb"], true);
        let docker = DockerClient::new(ScriptedRunner::new(), "docker");
        let err = run(&docker, &fx.config, &fx.job(None), &ProgressReporter::new())
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Precondition(_)));
        assert!(docker.runner().commands_with("run").is_empty());
    }

    #[tokio::test]
    async fn rejected_query_leaves_no_directories_behind() {
        let fx = Fixture::new(&["a.pdb"], true);
        let docker = docker_with_image();

        let mut job = fx.job(Some("j1"));
        job.query_file = Some("absent.pdb".to_string());
        let err = run(&docker, &fx.config, &job, &ProgressReporter::new())
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::Precondition(_)));
        assert!(!fx.root().join("output").exists());
        assert!(!fx.root().join("tmp").exists());
        assert!(docker.runner().commands_with("run").is_empty());
    }

    #[tokio::test]
    async fn explicit_query_must_be_a_pdb_file() {
        let fx = Fixture::new(&["a.pdb"], true);
        fs::write(fx.root().join("input/notes.txt"), "").unwrap();
        fs::write(fx.root().join("input/B.PDB"), "ATOM").unwrap();
        let docker = docker_with_image();

        let mut job = fx.job(None);
        job.query_file = Some("notes.txt".to_string());
        let err = run(&docker, &fx.config, &job, &ProgressReporter::new())
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Precondition(_)));

        job.query_file = Some("B.PDB".to_string());
        let report = run(&docker, &fx.config, &job, &ProgressReporter::new())
            .await
            .unwrap();
        assert_eq!(report.processed(), 1);
        assert_eq!(report.outcomes[0].result_file, fx.root().join("output/B_fs.tsv"));
    }
}
