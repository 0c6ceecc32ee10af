//! # Workflows Module
//!
//! End-to-end flows that tie the pure [`crate::core`] logic to the [`crate::engine`] runtime.
//! These are the entry points used by the command-line binary.
//!
//! ## Overview
//!
//! Every workflow follows the same shape: resolve and validate paths against the mount root,
//! run the Docker preflight checks, build the tool command, execute it, and collect a report
//! describing what happened. Nothing in a workflow prints to the console; progress and
//! per-unit outcomes are published through [`crate::engine::progress::ProgressReporter`] and
//! the returned report, so the caller decides how to present them.
//!
//! ## Architecture
//!
//! - **Prediction** ([`predict`]) - A single ColabFold run, listing the predicted structures
//! - **Search** ([`search`]) - A Foldseek batch over an input directory, with completion
//!   markers and a job info file when a job id is supplied
//! - **Design** ([`design`]) - A single ProteinMPNN run, including flattening of the `seqs/`
//!   output directory
//! - **Benchmark** ([`benchmark`]) - Repeated ProteinMPNN runs in temporary containers,
//!   logged to a CSV file
//!
//! [`single`] holds the execution path shared by the two one-shot workflows.

pub mod benchmark;
pub mod design;
pub mod predict;
pub mod search;
pub mod single;
