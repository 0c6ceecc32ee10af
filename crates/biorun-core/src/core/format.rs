//! Foldseek output-format adaptation.
//!
//! Databases built from sequences alone (e.g. with ProstT5) ship without the `<db>_ca`
//! coordinate side-car and cannot report TM-score fields or honour a TM-score threshold.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Suffix appended to the database path to locate the coordinate side-car.
pub const CA_SIDECAR_SUFFIX: &str = "_ca";

/// Used when filtering TM-score fields leaves nothing to report.
pub const FALLBACK_FORMAT: &str = "query,target,evalue,bits";

pub const DEFAULT_FORMAT: &str = "query,target,alntmscore,evalue,pident,bits";

/// What a target database can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseKind {
    /// Built from structures; the coordinate side-car is present.
    Structural,
    /// Sequence-only database; no TM-score support.
    SequenceOnly,
}

impl DatabaseKind {
    /// Probes the filesystem for the coordinate side-car of `db_path`.
    pub fn detect(db_path: &Path) -> Self {
        if sidecar_path(db_path).exists() {
            DatabaseKind::Structural
        } else {
            DatabaseKind::SequenceOnly
        }
    }

    pub fn supports_tmscore(self) -> bool {
        matches!(self, DatabaseKind::Structural)
    }
}

/// `<db>_ca`, derived by appending to the final path component.
pub fn sidecar_path(db_path: &Path) -> PathBuf {
    let mut raw: OsString = db_path.as_os_str().to_owned();
    raw.push(CA_SIDECAR_SUFFIX);
    PathBuf::from(raw)
}

fn is_tmscore_field(field: &str) -> bool {
    field.to_ascii_lowercase().contains("tmscore")
}

/// Returns the format Foldseek should be asked for against a database of `kind`.
///
/// For sequence-only databases every TM-score field is dropped (case-insensitive); if that
/// empties the list, [`FALLBACK_FORMAT`] is returned verbatim. Structural databases and empty
/// requests pass through unchanged.
pub fn effective_format(requested: &str, kind: DatabaseKind) -> String {
    if kind.supports_tmscore() || requested.trim().is_empty() {
        return requested.to_string();
    }

    let fields: Vec<&str> = requested
        .split(',')
        .map(str::trim)
        .filter(|f| !is_tmscore_field(f))
        .collect();

    if fields.iter().all(|f| f.is_empty()) {
        FALLBACK_FORMAT.to_string()
    } else {
        fields.join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn sidecar_is_derived_by_suffixing_the_last_component() {
        assert_eq!(
            sidecar_path(Path::new("database/influenza/fsInfluenzaDB")),
            PathBuf::from("database/influenza/fsInfluenzaDB_ca")
        );
    }

    #[test]
    fn detect_reports_structural_only_when_sidecar_exists() {
        let dir = tempdir().unwrap();
        let db = dir.path().join("targetDB");
        fs::write(&db, b"").unwrap();
        assert_eq!(DatabaseKind::detect(&db), DatabaseKind::SequenceOnly);

        fs::write(dir.path().join("targetDB_ca"), b"").unwrap();
        assert_eq!(DatabaseKind::detect(&db), DatabaseKind::Structural);
    }

    #[test]
    fn sequence_only_database_drops_tmscore_fields() {
        assert_eq!(
            effective_format("query,target,alntmscore,evalue", DatabaseKind::SequenceOnly),
            "query,target,evalue"
        );
        assert_eq!(
            effective_format("query, ALNTMSCORE ,target", DatabaseKind::SequenceOnly),
            "query,target"
        );
        assert_eq!(
            effective_format("query,qtmscore,ttmscore,bits", DatabaseKind::SequenceOnly),
            "query,bits"
        );
    }

    #[test]
    fn fallback_is_used_when_nothing_remains() {
        assert_eq!(
            effective_format("alntmscore", DatabaseKind::SequenceOnly),
            FALLBACK_FORMAT
        );
    }

    #[test]
    fn structural_database_keeps_the_requested_format() {
        assert_eq!(
            effective_format(DEFAULT_FORMAT, DatabaseKind::Structural),
            DEFAULT_FORMAT
        );
    }

    #[test]
    fn empty_request_is_left_alone() {
        assert_eq!(effective_format("", DatabaseKind::SequenceOnly), "");
    }
}
