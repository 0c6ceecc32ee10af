use std::path::PathBuf;

/// Built-in values for everything the core parameter structs do not already default.
pub struct DefaultsConfig {
    pub docker_binary: String,
    pub use_gpu: bool,
    pub colabfold_output_dir: PathBuf,
    pub foldseek_input_dir: PathBuf,
    pub foldseek_output_dir: PathBuf,
    pub foldseek_database: PathBuf,
    pub foldseek_tmp_dir: PathBuf,
    pub proteinmpnn_output_dir: PathBuf,
    pub benchmark_input_dir: PathBuf,
    pub benchmark_output_dir: PathBuf,
    pub benchmark_csv: PathBuf,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            docker_binary: "docker".to_string(),
            use_gpu: true,
            colabfold_output_dir: PathBuf::from("output"),
            foldseek_input_dir: PathBuf::from("input"),
            foldseek_output_dir: PathBuf::from("output"),
            foldseek_database: PathBuf::from("database/influenza/fsInfluenzaDB"),
            foldseek_tmp_dir: PathBuf::from("tmp"),
            proteinmpnn_output_dir: PathBuf::from("output"),
            benchmark_input_dir: PathBuf::from("input"),
            benchmark_output_dir: PathBuf::from("output"),
            benchmark_csv: PathBuf::from("proteinmpnn_benchmark.csv"),
        }
    }
}
