//! # Core Module
//!
//! Stateless building blocks shared by every workflow.
//!
//! ## Architecture
//!
//! - **Command model** ([`command`]) - Immutable token lists and the structured flag builder
//! - **Parameter derivation** ([`msa`]) - Resolution of the paired max-MSA setting
//! - **Output adaptation** ([`format`]) - TM-score capability detection and format filtering
//! - **Path mapping** ([`mount`]) - Rewriting host paths into the container mount
//! - **Tool invocations** ([`tools`]) - Per-tool parameter sets and command builders
//! - **File I/O** ([`io`]) - Artifact listing, completion markers, benchmark CSV, file moves

pub mod command;
pub mod format;
pub mod io;
pub mod mount;
pub mod msa;
pub mod tools;
