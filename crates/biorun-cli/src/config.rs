//! Layered configuration: built-in defaults, then the TOML file, then command-line flags.
//! `--set KEY=VALUE` overrides are folded into the file layer before merging.

mod builder;
mod defaults;
mod file;
mod models;

pub use builder::{
    build_benchmark_config, build_design_config, build_prediction_config, build_search_config,
};
