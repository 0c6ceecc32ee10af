use crate::core::mount::MountRoot;
use crate::core::tools::colabfold::PredictionParams;
use crate::core::tools::foldseek::SearchParams;
use crate::core::tools::proteinmpnn::DesignParams;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

/// Container image names, one per wrapped tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageNames {
    pub colabfold: String,
    pub foldseek: String,
    pub proteinmpnn: String,
}

impl Default for ImageNames {
    fn default() -> Self {
        Self {
            colabfold: "colabfold".to_string(),
            foldseek: "foldseek".to_string(),
            proteinmpnn: "proteinmpnn".to_string(),
        }
    }
}

/// Settings shared by every workflow, constructed once per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub docker_binary: String,
    pub mount_root: MountRoot,
    pub images: ImageNames,
}

#[derive(Default)]
pub struct RuntimeConfigBuilder {
    docker_binary: Option<String>,
    mount_root: Option<PathBuf>,
    images: Option<ImageNames>,
}

impl RuntimeConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn docker_binary(mut self, binary: impl Into<String>) -> Self {
        self.docker_binary = Some(binary.into());
        self
    }
    pub fn mount_root(mut self, root: PathBuf) -> Self {
        self.mount_root = Some(root);
        self
    }
    pub fn images(mut self, images: ImageNames) -> Self {
        self.images = Some(images);
        self
    }

    pub fn build(self) -> Result<RuntimeConfig, ConfigError> {
        let docker_binary = self
            .docker_binary
            .ok_or(ConfigError::MissingParameter("docker_binary"))?;
        if docker_binary.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "docker_binary",
                reason: "must not be empty".to_string(),
            });
        }
        let mount_root = self
            .mount_root
            .ok_or(ConfigError::MissingParameter("mount_root"))?;
        if !mount_root.is_absolute() {
            return Err(ConfigError::InvalidValue {
                name: "mount_root",
                reason: format!("{:?} is not an absolute path", mount_root),
            });
        }
        Ok(RuntimeConfig {
            docker_binary,
            mount_root: MountRoot::new(mount_root),
            images: self.images.unwrap_or_default(),
        })
    }
}

/// A single ColabFold prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionJob {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub params: PredictionParams,
}

/// A single ProteinMPNN design run.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignJob {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub params: DesignParams,
}

/// A Foldseek batch over an input directory (or one named file in it).
#[derive(Debug, Clone, PartialEq)]
pub struct SearchJob {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub database: PathBuf,
    pub tmp_dir: PathBuf,
    pub query_file: Option<String>,
    pub job_id: Option<String>,
    pub params: SearchParams,
}

#[derive(Default)]
pub struct SearchJobBuilder {
    input_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    database: Option<PathBuf>,
    tmp_dir: Option<PathBuf>,
    query_file: Option<String>,
    job_id: Option<String>,
    params: Option<SearchParams>,
}

impl SearchJobBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input_dir(mut self, dir: PathBuf) -> Self {
        self.input_dir = Some(dir);
        self
    }
    pub fn output_dir(mut self, dir: PathBuf) -> Self {
        self.output_dir = Some(dir);
        self
    }
    pub fn database(mut self, path: PathBuf) -> Self {
        self.database = Some(path);
        self
    }
    pub fn tmp_dir(mut self, dir: PathBuf) -> Self {
        self.tmp_dir = Some(dir);
        self
    }
    pub fn query_file(mut self, file: Option<String>) -> Self {
        self.query_file = file;
        self
    }
    pub fn job_id(mut self, id: Option<String>) -> Self {
        self.job_id = id;
        self
    }
    pub fn params(mut self, params: SearchParams) -> Self {
        self.params = Some(params);
        self
    }

    pub fn build(self) -> Result<SearchJob, ConfigError> {
        let job_id = match self.job_id {
            Some(id) if id.trim().is_empty() => None,
            Some(id) if id.contains(['/', '\\']) => {
                return Err(ConfigError::InvalidValue {
                    name: "job_id",
                    reason: format!("'{}' must not contain path separators", id),
                });
            }
            other => other,
        };
        let params = self.params.unwrap_or_default();
        if params.threads == 0 {
            return Err(ConfigError::InvalidValue {
                name: "threads",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(SearchJob {
            input_dir: self
                .input_dir
                .ok_or(ConfigError::MissingParameter("input_dir"))?,
            output_dir: self
                .output_dir
                .ok_or(ConfigError::MissingParameter("output_dir"))?,
            database: self
                .database
                .ok_or(ConfigError::MissingParameter("database"))?,
            tmp_dir: self.tmp_dir.ok_or(ConfigError::MissingParameter("tmp_dir"))?,
            query_file: self.query_file,
            job_id,
            params,
        })
    }
}

/// One `(sequences, temperature)` combination exercised by the benchmark.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchmarkSetting {
    pub num_sequences: u32,
    pub temperature: f64,
}

pub const DEFAULT_BENCHMARK_SETTINGS: [BenchmarkSetting; 3] = [
    BenchmarkSetting {
        num_sequences: 5,
        temperature: 0.1,
    },
    BenchmarkSetting {
        num_sequences: 10,
        temperature: 0.2,
    },
    BenchmarkSetting {
        num_sequences: 3,
        temperature: 0.05,
    },
];

/// The ProteinMPNN benchmark over every structure in an input directory.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkJob {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub csv_path: PathBuf,
    pub settings: Vec<BenchmarkSetting>,
    pub seed: u64,
    pub run_timeout: Duration,
    pub gpu_probe_timeout: Duration,
    pub pause_between_runs: Duration,
    pub pause_between_settings: Duration,
}

impl BenchmarkJob {
    pub fn new(input_dir: PathBuf, output_dir: PathBuf, csv_path: PathBuf) -> Self {
        Self {
            input_dir,
            output_dir,
            csv_path,
            settings: DEFAULT_BENCHMARK_SETTINGS.to_vec(),
            seed: 37,
            run_timeout: Duration::from_secs(300),
            gpu_probe_timeout: Duration::from_secs(30),
            pause_between_runs: Duration::from_secs(2),
            pause_between_settings: Duration::from_secs(5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_builder_requires_absolute_mount_root() {
        let err = RuntimeConfigBuilder::new()
            .docker_binary("docker")
            .mount_root(PathBuf::from("relative/root"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: "mount_root", .. }));

        let err = RuntimeConfigBuilder::new()
            .mount_root(PathBuf::from("/srv"))
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingParameter("docker_binary"));
    }

    #[test]
    fn runtime_builder_defaults_image_names() {
        let cfg = RuntimeConfigBuilder::new()
            .docker_binary("docker")
            .mount_root(PathBuf::from("/srv/work"))
            .build()
            .unwrap();
        assert_eq!(cfg.images, ImageNames::default());
        assert_eq!(cfg.mount_root.volume_spec(), "/srv/work:/data");
    }

    #[test]
    fn search_job_builder_validates_job_id_and_threads() {
        let base = || {
            SearchJobBuilder::new()
                .input_dir(PathBuf::from("input"))
                .output_dir(PathBuf::from("output"))
                .database(PathBuf::from("db/fsDB"))
                .tmp_dir(PathBuf::from("tmp"))
        };

        assert!(base().job_id(Some("../evil".to_string())).build().is_err());
        assert_eq!(base().job_id(Some("  ".to_string())).build().unwrap().job_id, None);

        let params = SearchParams {
            threads: 0,
            ..SearchParams::default()
        };
        assert!(base().params(params).build().is_err());

        let job = base().job_id(Some("job-1".to_string())).build().unwrap();
        assert_eq!(job.job_id.as_deref(), Some("job-1"));
        assert_eq!(job.params, SearchParams::default());
    }

    #[test]
    fn search_job_builder_reports_missing_paths() {
        let err = SearchJobBuilder::new().build().unwrap_err();
        assert_eq!(err, ConfigError::MissingParameter("input_dir"));
    }

    #[test]
    fn benchmark_job_uses_reference_settings() {
        let job = BenchmarkJob::new("input".into(), "output".into(), "bench.csv".into());
        assert_eq!(job.settings.len(), 3);
        assert_eq!(job.settings[2].num_sequences, 3);
        assert_eq!(job.run_timeout, Duration::from_secs(300));
        assert_eq!(job.seed, 37);
    }
}
