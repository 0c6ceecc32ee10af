//! # Engine Module
//!
//! Runtime plumbing between the pure [`crate::core`] logic and the outside world.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Runtime settings and per-workflow job descriptions
//! - **Error Handling** ([`error`]) - The error taxonomy shared by every workflow
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress and outcome reporting
//! - **Process Execution** ([`process`]) - Child processes with captured output and timeouts
//! - **Container Runtime** ([`docker`]) - Docker preflight checks, run/exec/cp, temporary containers

pub mod config;
pub mod docker;
pub mod error;
pub mod process;
pub mod progress;
