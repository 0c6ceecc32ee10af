use crate::core::command::{CommandBuilder, CommandLine, format_float};
use crate::core::format::{self, DatabaseKind};
use std::fmt;

pub const SUBCOMMAND: &str = "easy-search";

/// Foldseek `easy-search` settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    pub format: String,
    pub sensitivity: f64,
    pub evalue: f64,
    pub max_seqs: u32,
    pub threads: u32,
    pub tmscore_threshold: f64,
    pub coverage: f64,
    pub min_seq_id: f64,
    pub alignment_mode: u32,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            format: format::DEFAULT_FORMAT.to_string(),
            sensitivity: 9.5,
            evalue: 10.0,
            max_seqs: 1000,
            threads: 8,
            tmscore_threshold: 0.0,
            coverage: 0.0,
            min_seq_id: 0.0,
            alignment_mode: 3,
        }
    }
}

impl fmt::Display for SearchParams {
    /// Numeric settings as `key=value` pairs; the format is reported separately.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sensitivity={}, evalue={}, max_seqs={}, threads={}, tmscore_threshold={}, coverage={}, min_seq_id={}, alignment_mode={}",
            format_float(self.sensitivity),
            format_float(self.evalue),
            self.max_seqs,
            self.threads,
            format_float(self.tmscore_threshold),
            format_float(self.coverage),
            format_float(self.min_seq_id),
            self.alignment_mode,
        )
    }
}

/// Container-side locations for one search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTargets {
    pub query: String,
    pub database: String,
    pub output: String,
    pub tmp: String,
}

/// Builds the `easy-search` command for a database of the given kind.
///
/// Sequence-only databases get a TM-score-free format and no `--tmscore-threshold`.
pub fn command(params: &SearchParams, targets: &SearchTargets, kind: DatabaseKind) -> CommandLine {
    let effective_format = format::effective_format(&params.format, kind);
    let tmscore_threshold = kind
        .supports_tmscore()
        .then_some(params.tmscore_threshold);

    CommandBuilder::new(SUBCOMMAND)
        .arg(targets.query.as_str())
        .arg(targets.database.as_str())
        .arg(targets.output.as_str())
        .arg(targets.tmp.as_str())
        .flag("--format-output", effective_format)
        .flag("-s", params.sensitivity)
        .flag("-e", params.evalue)
        .flag("--max-seqs", params.max_seqs)
        .flag("--threads", params.threads)
        .flag("-c", params.coverage)
        .flag("--min-seq-id", params.min_seq_id)
        .flag("--alignment-mode", params.alignment_mode)
        .opt_flag("--tmscore-threshold", tmscore_threshold)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets() -> SearchTargets {
        SearchTargets {
            query: "/data/input/7cwm.pdb".to_string(),
            database: "/data/database/influenza/fsInfluenzaDB".to_string(),
            output: "/data/output/7cwm_fs.tsv".to_string(),
            tmp: "/data/tmp".to_string(),
        }
    }

    #[test]
    fn structural_database_keeps_tmscore_field_and_threshold() {
        let cmd = command(&SearchParams::default(), &targets(), DatabaseKind::Structural);
        assert_eq!(cmd.program(), "easy-search");
        assert_eq!(
            cmd.value_of("--format-output"),
            Some("query,target,alntmscore,evalue,pident,bits")
        );
        assert_eq!(cmd.value_of("--tmscore-threshold"), Some("0.0"));
    }

    #[test]
    fn sequence_only_database_drops_tmscore_field_and_threshold() {
        let params = SearchParams {
            format: "query,target,alntmscore,evalue".to_string(),
            tmscore_threshold: 0.5,
            ..SearchParams::default()
        };
        let cmd = command(&params, &targets(), DatabaseKind::SequenceOnly);
        assert_eq!(cmd.value_of("--format-output"), Some("query,target,evalue"));
        assert!(!cmd.contains("--tmscore-threshold"));
        assert!(!cmd.args().iter().any(|a| a.contains("tmscore")));
    }

    #[test]
    fn positional_targets_precede_flags() {
        let cmd = command(&SearchParams::default(), &targets(), DatabaseKind::Structural);
        assert_eq!(
            &cmd.args()[..4],
            &[
                "/data/input/7cwm.pdb",
                "/data/database/influenza/fsInfluenzaDB",
                "/data/output/7cwm_fs.tsv",
                "/data/tmp"
            ]
        );
        assert_eq!(cmd.value_of("-s"), Some("9.5"));
        assert_eq!(cmd.value_of("-e"), Some("10.0"));
        assert_eq!(cmd.value_of("--max-seqs"), Some("1000"));
        assert_eq!(cmd.value_of("--alignment-mode"), Some("3"));
    }

    #[test]
    fn display_lists_numeric_settings() {
        let rendered = SearchParams::default().to_string();
        assert!(rendered.starts_with("sensitivity=9.5, evalue=10.0, max_seqs=1000"));
        assert!(rendered.ends_with("alignment_mode=3"));
    }
}
