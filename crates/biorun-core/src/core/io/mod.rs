//! File-level helpers shared by the workflows: listing produced artifacts, writing job
//! completion records, the benchmark CSV log, and moving files the container produced.

pub mod artifacts;
pub mod benchmark;
pub mod fsops;
pub mod markers;
