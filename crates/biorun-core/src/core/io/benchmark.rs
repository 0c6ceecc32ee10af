use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

pub const HEADER: [&str; 10] = [
    "timestamp",
    "input_file",
    "file_size_kb",
    "num_sequences",
    "temperature",
    "runtime_seconds",
    "success",
    "gpu_used",
    "sequences_generated",
    "output_files",
];

/// One benchmark run. Field order matches [`HEADER`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRow {
    pub timestamp: String,
    pub input_file: String,
    pub file_size_kb: f64,
    pub num_sequences: u32,
    pub temperature: f64,
    pub runtime_seconds: f64,
    pub success: bool,
    pub gpu_used: bool,
    pub sequences_generated: usize,
    pub output_files: usize,
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Aggregates over every row of a benchmark log.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkSummary {
    pub total_runs: usize,
    pub successful_runs: usize,
    pub average_runtime: Option<f64>,
}

impl BenchmarkSummary {
    pub fn from_rows(rows: &[BenchmarkRow]) -> Self {
        let successful: Vec<&BenchmarkRow> = rows.iter().filter(|r| r.success).collect();
        let average_runtime = if successful.is_empty() {
            None
        } else {
            let sum: f64 = successful.iter().map(|r| r.runtime_seconds).sum();
            Some(sum / successful.len() as f64)
        };
        Self {
            total_runs: rows.len(),
            successful_runs: successful.len(),
            average_runtime,
        }
    }

    /// Percentage of successful runs; `None` for an empty log.
    pub fn success_rate(&self) -> Option<f64> {
        (self.total_runs > 0)
            .then(|| self.successful_runs as f64 / self.total_runs as f64 * 100.0)
    }
}

/// Append-only CSV log with a fixed header.
#[derive(Debug, Clone)]
pub struct BenchmarkLog {
    path: PathBuf,
}

impl BenchmarkLog {
    /// Creates (or truncates) the log and writes the header row.
    pub fn create(path: impl AsRef<Path>) -> csv::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(HEADER)?;
        writer.flush()?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, row: &BenchmarkRow) -> csv::Result<()> {
        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.serialize(row)?;
        writer.flush()?;
        Ok(())
    }

    pub fn read_rows(&self) -> csv::Result<Vec<BenchmarkRow>> {
        let mut reader = csv::Reader::from_path(&self.path)?;
        reader.deserialize().collect()
    }

    pub fn summary(&self) -> csv::Result<BenchmarkSummary> {
        Ok(BenchmarkSummary::from_rows(&self.read_rows()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn row(input: &str, success: bool, runtime: f64) -> BenchmarkRow {
        BenchmarkRow {
            timestamp: "2024-03-09 14:05:07".to_string(),
            input_file: input.to_string(),
            file_size_kb: 12.34,
            num_sequences: 5,
            temperature: 0.1,
            runtime_seconds: runtime,
            success,
            gpu_used: false,
            sequences_generated: if success { 1 } else { 0 },
            output_files: if success { 1 } else { 0 },
        }
    }

    #[test]
    fn create_writes_only_the_header() {
        let dir = tempdir().unwrap();
        let log = BenchmarkLog::create(dir.path().join("bench.csv")).unwrap();
        let content = fs::read_to_string(log.path()).unwrap();
        assert_eq!(content, format!("{}\n", HEADER.join(",")));
    }

    #[test]
    fn create_truncates_an_existing_log() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bench.csv");
        let log = BenchmarkLog::create(&path).unwrap();
        log.append(&row("a.pdb", true, 1.0)).unwrap();

        let log = BenchmarkLog::create(&path).unwrap();
        assert!(log.read_rows().unwrap().is_empty());
    }

    #[test]
    fn appended_rows_are_read_back_in_order() {
        let dir = tempdir().unwrap();
        let log = BenchmarkLog::create(dir.path().join("bench.csv")).unwrap();
        log.append(&row("a.pdb", true, 10.0)).unwrap();
        log.append(&row("b.pdb", false, 0.0)).unwrap();

        let rows = log.read_rows().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].input_file, "a.pdb");
        assert!(!rows[1].success);
    }

    #[test]
    fn summary_averages_successful_runs_only() {
        let rows = vec![
            row("a.pdb", true, 10.0),
            row("b.pdb", true, 20.0),
            row("c.pdb", false, 99.0),
            row("d.pdb", false, 0.0),
        ];
        let summary = BenchmarkSummary::from_rows(&rows);
        assert_eq!(summary.total_runs, 4);
        assert_eq!(summary.successful_runs, 2);
        assert_eq!(summary.average_runtime, Some(15.0));
        assert_eq!(summary.success_rate(), Some(50.0));
    }

    #[test]
    fn summary_of_empty_log_has_no_rate() {
        let summary = BenchmarkSummary::from_rows(&[]);
        assert_eq!(summary.success_rate(), None);
        assert_eq!(summary.average_runtime, None);
    }

    #[test]
    fn round2_keeps_two_decimals() {
        assert_eq!(round2(1.23456), 1.23);
        assert_eq!(round2(2.345678), 2.35);
    }
}
