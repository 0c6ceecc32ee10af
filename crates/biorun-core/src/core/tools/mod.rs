//! Per-tool parameter sets and the in-container command each tool is started with.
//!
//! Builders here take paths already rewritten into their container form (see
//! [`crate::core::mount`]); wrapping the command into a `docker` invocation is the job of
//! [`crate::engine::docker`].

pub mod colabfold;
pub mod foldseek;
pub mod proteinmpnn;
