use crate::core::command::format_float;
use crate::core::io::artifacts;
use crate::core::io::benchmark::{BenchmarkLog, BenchmarkRow, BenchmarkSummary, round2};
use crate::core::tools::proteinmpnn;
use crate::engine::config::{BenchmarkJob, BenchmarkSetting, RuntimeConfig};
use crate::engine::docker::DockerClient;
use crate::engine::error::EngineError;
use crate::engine::process::{ProcessOutput, ProcessRunner};
use crate::engine::progress::{Progress, ProgressReporter};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

/// Where the structure is copied inside the temporary container.
pub const CONTAINER_INPUT_DIR: &str = "/data/input";
/// Where ProteinMPNN writes inside the temporary container.
pub const CONTAINER_OUTPUT_DIR: &str = "/data/output";

const CONTAINER_PREFIX: &str = "proteinmpnn_temp";
const SEQUENCE_EXTENSIONS: [&str; 2] = ["fa", "fasta"];

/// One benchmark run as it was logged.
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub row: BenchmarkRow,
    pub run_dir: PathBuf,
    /// Captured stderr of a failed run, or the error that prevented it from completing.
    pub error: Option<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct BenchmarkReport {
    pub gpu_used: bool,
    pub csv_path: PathBuf,
    pub inputs_found: usize,
    pub runs: Vec<RunRecord>,
    /// Read back from the CSV; `None` if that failed.
    pub summary: Option<BenchmarkSummary>,
    pub warnings: Vec<String>,
}

/// `<stem>_<n>seq_<t>temp_<YYYYmmdd_HHMMSS>`
pub fn run_dir_name(
    input: &Path,
    setting: &BenchmarkSetting,
    stamp: &chrono::DateTime<Local>,
) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!(
        "{}_{}seq_{}temp_{}",
        stem,
        setting.num_sequences,
        format_float(setting.temperature),
        stamp.format("%Y%m%d_%H%M%S")
    )
}

/// Counts `(sequence files, all files)` produced under `run_dir`.
pub fn count_outputs(run_dir: &Path) -> (usize, usize) {
    let all = artifacts::list_files(run_dir, true);
    let sequences = artifacts::find_files(run_dir, &SEQUENCE_EXTENSIONS, true).len();
    (sequences, all.len())
}

/// Benchmarks ProteinMPNN over every `*.pdb` in the input directory for each setting.
///
/// Each run gets its own temporary container which is removed whatever the outcome. Every
/// run, successful or not, appends one row to the CSV log.
#[instrument(skip_all, name = "benchmark_workflow")]
pub async fn run<R: ProcessRunner>(
    docker: &DockerClient<R>,
    config: &RuntimeConfig,
    job: &BenchmarkJob,
    reporter: &ProgressReporter<'_>,
) -> Result<BenchmarkReport, EngineError> {
    docker.check_available().await?;
    docker.check_daemon().await?;

    fs::create_dir_all(&job.input_dir)?;
    fs::create_dir_all(&job.output_dir)?;

    let image = config.images.proteinmpnn.as_str();
    reporter.report(Progress::Message("Checking GPU availability...".to_string()));
    let gpu_used = docker.gpu_available(image, job.gpu_probe_timeout).await;
    if gpu_used {
        info!("GPU support detected.");
    } else {
        warn!("GPU support not available, running on CPU.");
    }

    let log = BenchmarkLog::create(&job.csv_path)?;
    info!("Created CSV file: {}", log.path().display());

    let inputs = artifacts::find_files(&job.input_dir, &["pdb"], false);
    let mut report = BenchmarkReport {
        gpu_used,
        csv_path: log.path().to_path_buf(),
        inputs_found: inputs.len(),
        runs: Vec::new(),
        summary: None,
        warnings: Vec::new(),
    };
    if inputs.is_empty() {
        warn!("No PDB files found in {}", job.input_dir.display());
        report.summary = Some(BenchmarkSummary::from_rows(&[]));
        return Ok(report);
    }

    let mut sequence = 0usize;
    for (setting_index, setting) in job.settings.iter().enumerate() {
        reporter.report(Progress::PhaseStart {
            name: format!(
                "{} sequences, temperature {}",
                setting.num_sequences,
                format_float(setting.temperature)
            ),
        });
        reporter.report(Progress::TaskStart {
            total_steps: inputs.len() as u64,
        });

        for (input_index, input) in inputs.iter().enumerate() {
            sequence += 1;
            let record = benchmark_one(
                docker, image, job, setting, input, gpu_used, sequence, reporter,
            )
            .await;

            if let Err(e) = log.append(&record.row) {
                warn!("Failed to append benchmark row: {}", e);
                report
                    .warnings
                    .push(format!("Failed to append benchmark row: {}", e));
            }
            reporter.report(Progress::UnitFinished {
                name: record.row.input_file.clone(),
                success: record.row.success,
                detail: format!("{:.2}s", record.row.runtime_seconds),
            });
            reporter.report(Progress::TaskIncrement);
            report.runs.push(record);

            if input_index + 1 < inputs.len() {
                pause(job.pause_between_runs).await;
            }
        }

        reporter.report(Progress::TaskFinish);
        reporter.report(Progress::PhaseFinish);
        if setting_index + 1 < job.settings.len() {
            pause(job.pause_between_settings).await;
        }
    }

    match log.summary() {
        Ok(summary) => report.summary = Some(summary),
        Err(e) => {
            warn!("Error generating summary: {}", e);
            report.warnings.push(format!("Error generating summary: {}", e));
        }
    }
    info!("Benchmark completed. Results saved to {}", log.path().display());
    Ok(report)
}

async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}

#[allow(clippy::too_many_arguments)]
async fn benchmark_one<R: ProcessRunner>(
    docker: &DockerClient<R>,
    image: &str,
    job: &BenchmarkJob,
    setting: &BenchmarkSetting,
    input: &Path,
    gpu: bool,
    sequence: usize,
    reporter: &ProgressReporter<'_>,
) -> RunRecord {
    let input_file = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_size_kb = fs::metadata(input)
        .map(|m| round2(m.len() as f64 / 1024.0))
        .unwrap_or(0.0);
    let run_dir = job
        .output_dir
        .join(run_dir_name(input, setting, &Local::now()));
    let container = format!(
        "{}_{}_{}",
        CONTAINER_PREFIX,
        Local::now().timestamp_millis(),
        sequence
    );
    info!("Benchmarking {} in {}", input_file, container);

    let started = Instant::now();
    let result = run_in_container(
        docker, image, job, setting, input, gpu, &container, &run_dir, reporter,
    )
    .await;
    let runtime_seconds = round2(started.elapsed().as_secs_f64());
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    match result {
        Ok((output, warnings)) => {
            let (sequences_generated, output_files) = count_outputs(&run_dir);
            let success = output.success();
            if !success {
                warn!("ProteinMPNN failed for {}: {}", input_file, output.stderr.trim());
            }
            RunRecord {
                row: BenchmarkRow {
                    timestamp,
                    input_file,
                    file_size_kb,
                    num_sequences: setting.num_sequences,
                    temperature: setting.temperature,
                    runtime_seconds,
                    success,
                    gpu_used: gpu,
                    sequences_generated,
                    output_files,
                },
                run_dir,
                error: (!success).then(|| output.stderr.trim().to_string()),
                warnings,
            }
        }
        Err(e) => {
            warn!("Error benchmarking {}: {}", input_file, e);
            RunRecord {
                row: BenchmarkRow {
                    timestamp,
                    input_file,
                    file_size_kb,
                    num_sequences: setting.num_sequences,
                    temperature: setting.temperature,
                    runtime_seconds: 0.0,
                    success: false,
                    gpu_used: false,
                    sequences_generated: 0,
                    output_files: 0,
                },
                run_dir,
                error: Some(e.to_string()),
                warnings: Vec::new(),
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_in_container<R: ProcessRunner>(
    docker: &DockerClient<R>,
    image: &str,
    job: &BenchmarkJob,
    setting: &BenchmarkSetting,
    input: &Path,
    gpu: bool,
    container: &str,
    run_dir: &Path,
    reporter: &ProgressReporter<'_>,
) -> Result<(ProcessOutput, Vec<String>), EngineError> {
    fs::create_dir_all(run_dir)?;

    let file_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let container_input = format!("{}/{}", CONTAINER_INPUT_DIR, file_name);
    let tool = proteinmpnn::benchmark_command(
        setting.num_sequences,
        setting.temperature,
        job.seed,
        &container_input,
        CONTAINER_OUTPUT_DIR,
    );
    reporter.report(Progress::Command(tool.to_string()));

    docker
        .with_temp_container(container, image, gpu, move |name| async move {
            docker.copy_into(input, &name, &container_input).await?;
            let output = docker.exec(&name, &tool, Some(job.run_timeout)).await?;

            let mut warnings = Vec::new();
            if output.success() {
                let source = format!("{}/.", CONTAINER_OUTPUT_DIR);
                if let Err(e) = docker.copy_from(&name, &source, run_dir).await {
                    warn!("Failed to copy results back: {}", e);
                    warnings.push(format!("Failed to copy results back: {}", e));
                }
            }
            Ok((output, warnings))
        })
        .await
}
