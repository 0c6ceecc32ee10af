use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::{BenchArgs, ColabfoldArgs, FoldseekArgs, ProteinmpnnArgs, RuntimeArgs};
use crate::error::{CliError, Result};
use crate::utils::parser;
use biorun_core::core::msa;
use biorun_core::core::tools::colabfold::PredictionParams;
use biorun_core::core::tools::foldseek::SearchParams;
use biorun_core::core::tools::proteinmpnn::{DesignParams, MODEL_NAMES};
use biorun_core::engine::config::{
    BenchmarkJob, DesignJob, ImageNames, PredictionJob, RuntimeConfig, RuntimeConfigBuilder,
    SearchJob, SearchJobBuilder,
};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

pub fn load_file_config(args: &RuntimeArgs) -> Result<FileConfig> {
    let file_config = FileConfig::load(args.config.as_deref())?;
    apply_set_values(file_config, &args.set_values)
}

pub fn build_prediction_config(
    args: &ColabfoldArgs,
    runtime_args: &RuntimeArgs,
    cwd: &Path,
) -> Result<AppConfig<PredictionJob>> {
    merge_prediction(args, runtime_args, load_file_config(runtime_args)?, cwd)
}

pub fn build_search_config(
    args: &FoldseekArgs,
    runtime_args: &RuntimeArgs,
    cwd: &Path,
) -> Result<AppConfig<SearchJob>> {
    merge_search(args, runtime_args, load_file_config(runtime_args)?, cwd)
}

pub fn build_design_config(
    args: &ProteinmpnnArgs,
    runtime_args: &RuntimeArgs,
    cwd: &Path,
) -> Result<AppConfig<DesignJob>> {
    merge_design(args, runtime_args, load_file_config(runtime_args)?, cwd)
}

pub fn build_benchmark_config(
    args: &BenchArgs,
    runtime_args: &RuntimeArgs,
    cwd: &Path,
) -> Result<AppConfig<BenchmarkJob>> {
    merge_benchmark(args, runtime_args, load_file_config(runtime_args)?, cwd)
}

fn absolutize(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

fn merge_runtime(
    args: &RuntimeArgs,
    file_config: &mut FileConfig,
    cwd: &Path,
    defaults: &DefaultsConfig,
) -> Result<RuntimeConfig> {
    let runtime_file = file_config.runtime.clone().unwrap_or_default();
    let mount_root = args
        .mount_root
        .as_deref()
        .or(runtime_file.mount_root.as_deref())
        .map(|p| absolutize(cwd, p))
        .unwrap_or_else(|| cwd.to_path_buf());
    let docker_binary = args
        .docker
        .clone()
        .or(runtime_file.docker)
        .unwrap_or_else(|| defaults.docker_binary.clone());

    let images_file = file_config.images.take().unwrap_or_default();
    let base = ImageNames::default();
    let images = ImageNames {
        colabfold: images_file.colabfold.unwrap_or(base.colabfold),
        foldseek: images_file.foldseek.unwrap_or(base.foldseek),
        proteinmpnn: images_file.proteinmpnn.unwrap_or(base.proteinmpnn),
    };

    debug!(
        "Runtime: docker={}, mount root={}",
        docker_binary,
        mount_root.display()
    );
    RuntimeConfigBuilder::new()
        .docker_binary(docker_binary)
        .mount_root(mount_root)
        .images(images)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

fn merge_prediction(
    args: &ColabfoldArgs,
    runtime_args: &RuntimeArgs,
    mut file_config: FileConfig,
    cwd: &Path,
) -> Result<AppConfig<PredictionJob>> {
    let defaults = DefaultsConfig::default();
    let runtime = merge_runtime(runtime_args, &mut file_config, cwd, &defaults)?;
    let file_gpu = file_config.runtime.as_ref().and_then(|r| r.gpu);
    let file = file_config.colabfold.take().unwrap_or_default();

    let use_gpu = match (args.gpu.gpu, args.gpu.no_gpu) {
        (true, false) => true,
        (false, true) => false,
        _ => file_gpu.unwrap_or(defaults.use_gpu),
    };

    let msa_from_cli =
        args.max_seq.is_some() || args.max_extra_seq.is_some() || args.max_msa.is_some();
    let max_msa = if msa_from_cli {
        msa::derive_max_msa(args.max_seq, args.max_extra_seq, args.max_msa.as_deref())
    } else {
        msa::derive_max_msa(file.max_seq, file.max_extra_seq, file.max_msa.as_deref())
    }
    .map_err(|e| CliError::Argument(e.to_string()))?;

    let base = PredictionParams::default();
    let params = PredictionParams {
        model_type: args
            .model_type
            .clone()
            .or(file.model_type)
            .unwrap_or(base.model_type),
        num_models: args
            .num_models
            .or(file.num_models)
            .unwrap_or(base.num_models),
        num_recycles: args
            .num_recycles
            .or(file.num_recycles)
            .unwrap_or(base.num_recycles),
        max_msa,
        use_gpu,
    };

    Ok(AppConfig {
        runtime,
        job: PredictionJob {
            input: absolutize(cwd, &args.input_file),
            output_dir: args
                .output_dir
                .clone()
                .or(file.output_dir)
                .unwrap_or(defaults.colabfold_output_dir),
            params,
        },
    })
}

fn merge_search(
    args: &FoldseekArgs,
    runtime_args: &RuntimeArgs,
    mut file_config: FileConfig,
    cwd: &Path,
) -> Result<AppConfig<SearchJob>> {
    let defaults = DefaultsConfig::default();
    let runtime = merge_runtime(runtime_args, &mut file_config, cwd, &defaults)?;
    let file = file_config.foldseek.take().unwrap_or_default();

    let base = SearchParams::default();
    let params = SearchParams {
        format: args.format.clone().or(file.format).unwrap_or(base.format),
        sensitivity: args
            .sensitivity
            .or(file.sensitivity)
            .unwrap_or(base.sensitivity),
        evalue: args.evalue.or(file.evalue).unwrap_or(base.evalue),
        max_seqs: args.max_seqs.or(file.max_seqs).unwrap_or(base.max_seqs),
        threads: args.threads.or(file.threads).unwrap_or(base.threads),
        tmscore_threshold: args
            .tmscore_threshold
            .or(file.tmscore_threshold)
            .unwrap_or(base.tmscore_threshold),
        coverage: args.coverage.or(file.coverage).unwrap_or(base.coverage),
        min_seq_id: args
            .min_seq_id
            .or(file.min_seq_id)
            .unwrap_or(base.min_seq_id),
        alignment_mode: args
            .alignment_mode
            .or(file.alignment_mode)
            .unwrap_or(base.alignment_mode),
    };

    let job = SearchJobBuilder::new()
        .input_dir(
            args.input_dir
                .clone()
                .or(file.input_dir)
                .unwrap_or(defaults.foldseek_input_dir),
        )
        .output_dir(
            args.output_dir
                .clone()
                .or(file.output_dir)
                .unwrap_or(defaults.foldseek_output_dir),
        )
        .database(
            args.database
                .clone()
                .or(file.database)
                .unwrap_or(defaults.foldseek_database),
        )
        .tmp_dir(
            args.tmp_dir
                .clone()
                .or(file.tmp_dir)
                .unwrap_or(defaults.foldseek_tmp_dir),
        )
        .query_file(args.query.clone())
        .job_id(args.job_id.clone())
        .params(params)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig { runtime, job })
}

fn merge_design(
    args: &ProteinmpnnArgs,
    runtime_args: &RuntimeArgs,
    mut file_config: FileConfig,
    cwd: &Path,
) -> Result<AppConfig<DesignJob>> {
    let defaults = DefaultsConfig::default();
    let runtime = merge_runtime(runtime_args, &mut file_config, cwd, &defaults)?;
    let file = file_config.proteinmpnn.take().unwrap_or_default();

    let base = DesignParams::default();
    let model_name = args
        .model_name
        .clone()
        .or(file.model_name)
        .unwrap_or(base.model_name);
    if !MODEL_NAMES.contains(&model_name.as_str()) {
        return Err(CliError::Config(format!(
            "Unknown model name '{}'. Expected one of: {}",
            model_name,
            MODEL_NAMES.join(", ")
        )));
    }

    let params = DesignParams {
        chains: args.chains.clone().or(file.chains).unwrap_or(base.chains),
        num_designs: args
            .num_designs
            .or(file.num_designs)
            .unwrap_or(base.num_designs),
        temperature: args
            .temperature
            .clone()
            .or(file.temperature)
            .unwrap_or(base.temperature),
        omit_aa: args.omit_aa.clone().or(file.omit_aa).unwrap_or(base.omit_aa),
        model_name,
        batch_size: args
            .batch_size
            .or(file.batch_size)
            .unwrap_or(base.batch_size),
        ca_only: args.ca_only || file.ca_only.unwrap_or(base.ca_only),
        max_length: args.max_length.or(file.max_length),
        seed: args.seed.or(file.seed),
        save_score: args.save_score.map(|v| v == 1).or(file.save_score),
        save_probs: args.save_probs.map(|v| v == 1).or(file.save_probs),
    };

    Ok(AppConfig {
        runtime,
        job: DesignJob {
            input: absolutize(cwd, &args.input_file),
            output_dir: args
                .output_dir
                .clone()
                .or(file.output_dir)
                .unwrap_or(defaults.proteinmpnn_output_dir),
            params,
        },
    })
}

fn merge_benchmark(
    args: &BenchArgs,
    runtime_args: &RuntimeArgs,
    mut file_config: FileConfig,
    cwd: &Path,
) -> Result<AppConfig<BenchmarkJob>> {
    let defaults = DefaultsConfig::default();
    let runtime = merge_runtime(runtime_args, &mut file_config, cwd, &defaults)?;
    let file = file_config.benchmark.take().unwrap_or_default();

    let mount = &runtime.mount_root;
    let input_dir = args
        .input_dir
        .clone()
        .or(file.input_dir)
        .unwrap_or(defaults.benchmark_input_dir);
    let output_dir = args
        .output_dir
        .clone()
        .or(file.output_dir)
        .unwrap_or(defaults.benchmark_output_dir);
    let csv = args
        .csv
        .clone()
        .or(file.csv)
        .unwrap_or(defaults.benchmark_csv);
    let mut job = BenchmarkJob::new(
        mount.resolve(input_dir),
        mount.resolve(output_dir),
        mount.resolve(csv),
    );

    if !args.settings.is_empty() {
        job.settings = args.settings.clone();
    } else if let Some(settings) = &file.settings {
        job.settings = settings
            .iter()
            .map(|s| parser::parse_setting(s).map_err(|e| CliError::Config(e.to_string())))
            .collect::<Result<Vec<_>>>()?;
    }
    if job.settings.is_empty() {
        return Err(CliError::Config(
            "At least one benchmark setting is required.".to_string(),
        ));
    }

    if let Some(seed) = args.seed.or(file.seed) {
        job.seed = seed;
    }
    if let Some(secs) = args.timeout.or(file.timeout_secs) {
        job.run_timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = file.gpu_probe_timeout_secs {
        job.gpu_probe_timeout = Duration::from_secs(secs);
    }
    if args.no_pause {
        job.pause_between_runs = Duration::ZERO;
        job.pause_between_settings = Duration::ZERO;
    } else {
        if let Some(secs) = file.pause_between_runs_secs {
            job.pause_between_runs = Duration::from_secs(secs);
        }
        if let Some(secs) = file.pause_between_settings_secs {
            job.pause_between_settings = Duration::from_secs(secs);
        }
    }

    Ok(AppConfig { runtime, job })
}

fn section<T: Default>(slot: &mut Option<T>) -> &mut T {
    slot.get_or_insert_with(Default::default)
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<Option<T>> {
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|_| CliError::Config(format!("Invalid value for {}: {}", key, value)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let (key, value) =
            parser::parse_key_value(kv_pair).map_err(|e| CliError::Config(e.to_string()))?;
        let text = Some(value.to_string());
        let path = Some(PathBuf::from(value));

        match key {
            "runtime.docker" => section(&mut config.runtime).docker = text,
            "runtime.mount-root" => section(&mut config.runtime).mount_root = path,
            "runtime.gpu" => section(&mut config.runtime).gpu = parse_value(key, value)?,

            "images.colabfold" => section(&mut config.images).colabfold = text,
            "images.foldseek" => section(&mut config.images).foldseek = text,
            "images.proteinmpnn" => section(&mut config.images).proteinmpnn = text,

            "colabfold.output-dir" => section(&mut config.colabfold).output_dir = path,
            "colabfold.model-type" => section(&mut config.colabfold).model_type = text,
            "colabfold.num-models" => {
                section(&mut config.colabfold).num_models = parse_value(key, value)?
            }
            "colabfold.num-recycles" => {
                section(&mut config.colabfold).num_recycles = parse_value(key, value)?
            }
            "colabfold.max-seq" => section(&mut config.colabfold).max_seq = parse_value(key, value)?,
            "colabfold.max-extra-seq" => {
                section(&mut config.colabfold).max_extra_seq = parse_value(key, value)?
            }
            "colabfold.max-msa" => section(&mut config.colabfold).max_msa = text,

            "foldseek.input-dir" => section(&mut config.foldseek).input_dir = path,
            "foldseek.output-dir" => section(&mut config.foldseek).output_dir = path,
            "foldseek.database" => section(&mut config.foldseek).database = path,
            "foldseek.tmp-dir" => section(&mut config.foldseek).tmp_dir = path,
            "foldseek.format" => section(&mut config.foldseek).format = text,
            "foldseek.sensitivity" => {
                section(&mut config.foldseek).sensitivity = parse_value(key, value)?
            }
            "foldseek.evalue" => section(&mut config.foldseek).evalue = parse_value(key, value)?,
            "foldseek.max-seqs" => section(&mut config.foldseek).max_seqs = parse_value(key, value)?,
            "foldseek.threads" => section(&mut config.foldseek).threads = parse_value(key, value)?,
            "foldseek.tmscore-threshold" => {
                section(&mut config.foldseek).tmscore_threshold = parse_value(key, value)?
            }
            "foldseek.coverage" => section(&mut config.foldseek).coverage = parse_value(key, value)?,
            "foldseek.min-seq-id" => {
                section(&mut config.foldseek).min_seq_id = parse_value(key, value)?
            }
            "foldseek.alignment-mode" => {
                section(&mut config.foldseek).alignment_mode = parse_value(key, value)?
            }

            "proteinmpnn.output-dir" => section(&mut config.proteinmpnn).output_dir = path,
            "proteinmpnn.chains" => section(&mut config.proteinmpnn).chains = text,
            "proteinmpnn.num-designs" => {
                section(&mut config.proteinmpnn).num_designs = parse_value(key, value)?
            }
            "proteinmpnn.temperature" => section(&mut config.proteinmpnn).temperature = text,
            "proteinmpnn.omit-aa" => section(&mut config.proteinmpnn).omit_aa = text,
            "proteinmpnn.model-name" => section(&mut config.proteinmpnn).model_name = text,
            "proteinmpnn.batch-size" => {
                section(&mut config.proteinmpnn).batch_size = parse_value(key, value)?
            }
            "proteinmpnn.ca-only" => {
                section(&mut config.proteinmpnn).ca_only = parse_value(key, value)?
            }
            "proteinmpnn.max-length" => {
                section(&mut config.proteinmpnn).max_length = parse_value(key, value)?
            }
            "proteinmpnn.seed" => section(&mut config.proteinmpnn).seed = parse_value(key, value)?,
            "proteinmpnn.save-score" => {
                section(&mut config.proteinmpnn).save_score = parse_value(key, value)?
            }
            "proteinmpnn.save-probs" => {
                section(&mut config.proteinmpnn).save_probs = parse_value(key, value)?
            }

            "benchmark.input-dir" => section(&mut config.benchmark).input_dir = path,
            "benchmark.output-dir" => section(&mut config.benchmark).output_dir = path,
            "benchmark.csv" => section(&mut config.benchmark).csv = path,
            "benchmark.settings" => {
                section(&mut config.benchmark).settings = Some(
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect(),
                )
            }
            "benchmark.seed" => section(&mut config.benchmark).seed = parse_value(key, value)?,
            "benchmark.timeout-secs" => {
                section(&mut config.benchmark).timeout_secs = parse_value(key, value)?
            }
            "benchmark.gpu-probe-timeout-secs" => {
                section(&mut config.benchmark).gpu_probe_timeout_secs = parse_value(key, value)?
            }
            "benchmark.pause-between-runs-secs" => {
                section(&mut config.benchmark).pause_between_runs_secs = parse_value(key, value)?
            }
            "benchmark.pause-between-settings-secs" => {
                section(&mut config.benchmark).pause_between_settings_secs =
                    parse_value(key, value)?
            }

            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
