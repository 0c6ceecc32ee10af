use chrono::{DateTime, Local};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Success,
    Failed,
}

impl JobStatus {
    pub fn from_failures(failed: usize) -> Self {
        if failed == 0 {
            JobStatus::Success
        } else {
            JobStatus::Failed
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Success => f.write_str("SUCCESS"),
            JobStatus::Failed => f.write_str("FAILED"),
        }
    }
}

pub fn marker_path(dir: &Path, job_id: &str) -> PathBuf {
    dir.join(format!("{}.done.txt", job_id))
}

pub fn info_path(dir: &Path, job_id: &str) -> PathBuf {
    dir.join(format!("{}_info.txt", job_id))
}

/// ISO-8601 local timestamp with microseconds and no offset.
pub fn iso_timestamp(at: &DateTime<Local>) -> String {
    at.naive_local().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

/// Writes `<job-id>.done.txt`. Write-once; nothing in this crate reads it back.
pub fn write_completion_marker(
    dir: &Path,
    job_id: &str,
    status: JobStatus,
    at: &DateTime<Local>,
) -> io::Result<PathBuf> {
    let path = marker_path(dir, job_id);
    let content = format!(
        "Job {} completed with status: {}\nTimestamp: {}\n",
        job_id,
        status,
        iso_timestamp(at)
    );
    fs::write(&path, content)?;
    Ok(path)
}

/// Aggregate outcome of a batch, recorded next to the completion marker.
#[derive(Debug, Clone, PartialEq)]
pub struct JobSummary {
    pub job_id: String,
    pub processed: usize,
    pub successful: usize,
    pub failed: usize,
    pub parameters: String,
    pub database: PathBuf,
    pub output_format: String,
}

impl JobSummary {
    pub fn status(&self) -> JobStatus {
        JobStatus::from_failures(self.failed)
    }

    fn render(&self) -> String {
        format!(
            "Job ID: {}\nProcessed files: {}\nSuccessful: {}\nFailed: {}\nParameters: {}\nDatabase: {}\nOutput format: {}\n",
            self.job_id,
            self.processed,
            self.successful,
            self.failed,
            self.parameters,
            self.database.display(),
            self.output_format,
        )
    }
}

/// Writes `<job-id>_info.txt` with one `key: value` line per field.
pub fn write_job_info(dir: &Path, summary: &JobSummary) -> io::Result<PathBuf> {
    let path = info_path(dir, &summary.job_id);
    fs::write(&path, summary.render())?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    #[test]
    fn status_reflects_failures() {
        assert_eq!(JobStatus::from_failures(0), JobStatus::Success);
        assert_eq!(JobStatus::from_failures(2), JobStatus::Failed);
        assert_eq!(JobStatus::Failed.to_string(), "FAILED");
    }

    #[test]
    fn completion_marker_has_status_and_timestamp_lines() {
        let dir = tempdir().unwrap();
        let path =
            write_completion_marker(dir.path(), "job42", JobStatus::Success, &fixed_time()).unwrap();
        assert_eq!(path, dir.path().join("job42.done.txt"));

        let content = fs::read_to_string(path).unwrap();
        assert_eq!(
            content,
            "Job job42 completed with status: SUCCESS\nTimestamp: 2024-03-09T14:05:07.000000\n"
        );
    }

    #[test]
    fn job_info_lists_counts_and_parameters() {
        let dir = tempdir().unwrap();
        let summary = JobSummary {
            job_id: "job42".to_string(),
            processed: 3,
            successful: 2,
            failed: 1,
            parameters: "sensitivity=9.5".to_string(),
            database: PathBuf::from("/srv/db/fsDB"),
            output_format: "query,target".to_string(),
        };
        assert_eq!(summary.status(), JobStatus::Failed);

        let path = write_job_info(dir.path(), &summary).unwrap();
        assert_eq!(path, dir.path().join("job42_info.txt"));
        let content = fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Job ID: job42",
                "Processed files: 3",
                "Successful: 2",
                "Failed: 1",
                "Parameters: sensitivity=9.5",
                "Database: /srv/db/fsDB",
                "Output format: query,target",
            ]
        );
    }
}
