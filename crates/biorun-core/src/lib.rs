//! # biorun Core Library
//!
//! Parameter derivation, command construction and container orchestration for running
//! containerized protein structure tools (ColabFold, Foldseek, ProteinMPNN) through Docker.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture so that the decision logic can be
//! tested without a container runtime.
//!
//! - **[`core`]: The Foundation.** Pure, stateless logic: the command token model and flag
//!   builder, max-MSA derivation, output-format adaptation, mount-root path rewriting, the
//!   per-tool parameter sets, and small file I/O helpers (artifact listing, completion
//!   markers, benchmark CSV, file moves).
//!
//! - **[`engine`]: The Runtime.** Configuration, error taxonomy, progress reporting, child
//!   process execution with timeouts, and the Docker client built on top of it.
//!
//! - **[`workflows`]: The Public API.** End-to-end flows that tie `core` and `engine` together:
//!   structure prediction, structure search (batch), sequence design, and the sequence design
//!   benchmark.

pub mod core;
pub mod engine;
pub mod workflows;
