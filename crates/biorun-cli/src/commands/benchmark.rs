use super::{docker_client, first_line};
use crate::cli::{BenchArgs, RuntimeArgs};
use crate::config;
use crate::error::Result;
use crate::ui;
use crate::utils::progress::CliProgressHandler;
use biorun_core::core::command::format_float;
use biorun_core::core::io::benchmark::BenchmarkSummary;
use biorun_core::engine::config::BenchmarkSetting;
use biorun_core::engine::progress::ProgressReporter;
use biorun_core::workflows::benchmark;
use tracing::info;

fn describe_settings(settings: &[BenchmarkSetting]) -> String {
    settings
        .iter()
        .map(|s| format!("{}@{}", s.num_sequences, format_float(s.temperature)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn summary_lines(summary: &BenchmarkSummary) -> Vec<(&'static str, String)> {
    let mut lines = vec![
        ("Total runs", summary.total_runs.to_string()),
        ("Successful runs", summary.successful_runs.to_string()),
    ];
    if let Some(rate) = summary.success_rate() {
        lines.push(("Success rate", format!("{:.1}%", rate)));
    }
    if let Some(average) = summary.average_runtime {
        lines.push(("Average runtime", format!("{:.2} seconds", average)));
    }
    lines
}

/// Individual run failures are recorded in the CSV and do not fail the command.
pub async fn run(args: BenchArgs, runtime_args: &RuntimeArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let app = config::build_benchmark_config(&args, runtime_args, &cwd)?;
    let job = &app.job;

    ui::banner("ProteinMPNN Benchmark");
    ui::info("Input", job.input_dir.display());
    ui::info("Output", job.output_dir.display());
    ui::info("CSV", job.csv_path.display());
    ui::info("Settings", describe_settings(&job.settings));
    ui::info("Timeout per run", format!("{}s", job.run_timeout.as_secs()));

    let docker = docker_client(&app.runtime);
    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the benchmark workflow...");
    let report = benchmark::run(&docker, &app.runtime, job, &reporter).await?;

    ui::info(
        "GPU",
        if report.gpu_used {
            "available"
        } else {
            "not available, running on CPU"
        },
    );
    if report.inputs_found == 0 {
        ui::warning(format!("No PDB files found in {}", job.input_dir.display()));
    }

    for record in &report.runs {
        if let Some(error) = &record.error {
            ui::error(format!("{}: {}", record.run_dir.display(), first_line(error)));
        }
        for warning in &record.warnings {
            ui::warning(warning);
        }
    }
    for warning in &report.warnings {
        ui::warning(warning);
    }

    if let Some(summary) = &report.summary {
        println!();
        ui::banner("Benchmark Summary");
        for (label, value) in summary_lines(summary) {
            ui::info(label, value);
        }
    }
    ui::success(format!("Results saved to {}", report.csv_path.display()));
    Ok(())
}
