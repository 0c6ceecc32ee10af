use crate::error::{CliError, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileRuntimeConfig {
    pub docker: Option<String>,
    pub mount_root: Option<PathBuf>,
    pub gpu: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileImagesConfig {
    pub colabfold: Option<String>,
    pub foldseek: Option<String>,
    pub proteinmpnn: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileColabfoldConfig {
    pub output_dir: Option<PathBuf>,
    pub model_type: Option<String>,
    pub num_models: Option<u32>,
    pub num_recycles: Option<u32>,
    pub max_seq: Option<u32>,
    pub max_extra_seq: Option<u32>,
    pub max_msa: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileFoldseekConfig {
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub database: Option<PathBuf>,
    pub tmp_dir: Option<PathBuf>,
    pub format: Option<String>,
    pub sensitivity: Option<f64>,
    pub evalue: Option<f64>,
    pub max_seqs: Option<u32>,
    pub threads: Option<u32>,
    pub tmscore_threshold: Option<f64>,
    pub coverage: Option<f64>,
    pub min_seq_id: Option<f64>,
    pub alignment_mode: Option<u32>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileProteinmpnnConfig {
    pub output_dir: Option<PathBuf>,
    pub chains: Option<String>,
    pub num_designs: Option<u32>,
    pub temperature: Option<String>,
    pub omit_aa: Option<String>,
    pub model_name: Option<String>,
    pub batch_size: Option<u32>,
    pub ca_only: Option<bool>,
    pub max_length: Option<u32>,
    pub seed: Option<u64>,
    pub save_score: Option<bool>,
    pub save_probs: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileBenchmarkConfig {
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub csv: Option<PathBuf>,
    /// `sequences@temperature` entries, e.g. `["5@0.1", "10@0.2"]`.
    pub settings: Option<Vec<String>>,
    pub seed: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub gpu_probe_timeout_secs: Option<u64>,
    pub pause_between_runs_secs: Option<u64>,
    pub pause_between_settings_secs: Option<u64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub runtime: Option<FileRuntimeConfig>,
    pub images: Option<FileImagesConfig>,
    pub colabfold: Option<FileColabfoldConfig>,
    pub foldseek: Option<FileFoldseekConfig>,
    pub proteinmpnn: Option<FileProteinmpnnConfig>,
    pub benchmark: Option<FileBenchmarkConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Reads `explicit` if given (it must exist), otherwise the user-level config file when
    /// present, otherwise an empty configuration.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match default_config_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => {
                debug!("No configuration file found; using built-in defaults.");
                Ok(Self::default())
            }
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("edu", "caltech", "biorun")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}
