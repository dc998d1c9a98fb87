//! Report rendering for the command line

use crate::config::OutputFormat;
use crate::models::{Mode, RetentionReport};
use std::io::{self, Write};

/// Write the report to `out`, and per-entry failures to `err` in plain mode.
pub fn write_report<W: Write, E: Write>(
    report: &RetentionReport,
    format: OutputFormat,
    out: &mut W,
    err: &mut E,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            writeln!(out)
        }
        OutputFormat::Plain => write_plain(report, out, err),
    }
}

fn write_plain<W: Write, E: Write>(
    report: &RetentionReport,
    out: &mut W,
    err: &mut E,
) -> io::Result<()> {
    writeln!(
        out,
        "Reference point: {} (from {})",
        report.reference, report.anchor
    )?;
    match report.mode {
        Mode::List => {
            writeln!(out, "\nUnnecessary Files:\n")?;
            for entry in &report.succeeded {
                writeln!(out, "{}", entry)?;
            }
        }
        Mode::Remove => {
            writeln!(
                out,
                "\nRemoving the following files in {}:\n",
                report.directory.display()
            )?;
            for entry in &report.succeeded {
                writeln!(out, "{}", entry)?;
            }
            for failure in &report.failures {
                writeln!(err, "{}: {}", failure.entry, failure.reason)?;
            }
            writeln!(
                out,
                "\n{} candidate(s): {} removed, {} failed",
                report.considered,
                report.succeeded_count(),
                report.failed_count()
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DeletionFailure, FailureKind, ReferenceAnchor, WalSegmentName};
    use chrono::Utc;
    use std::path::PathBuf;
    use uuid::Uuid;

    fn report(mode: Mode) -> RetentionReport {
        RetentionReport {
            run_id: Uuid::new_v4(),
            mode,
            directory: PathBuf::from("/archive"),
            reference: WalSegmentName::from_entry_name("000000010000000000000003"),
            anchor: ReferenceAnchor::BackupLabel(
                "000000010000000000000003.00000028.backup".to_string(),
            ),
            considered: 2,
            succeeded: vec!["000000010000000000000001".to_string()],
            failures: vec![DeletionFailure {
                entry: "000000010000000000000002".to_string(),
                kind: FailureKind::PermissionDenied,
                reason: "Permission denied".to_string(),
            }],
            started_at: Utc::now(),
            completed_at: Utc::now(),
        }
    }

    fn render(report: &RetentionReport, format: OutputFormat) -> (String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        write_report(report, format, &mut out, &mut err).unwrap();
        (String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    #[test]
    fn test_plain_list() {
        let mut report = report(Mode::List);
        report.failures.clear();
        let (out, err) = render(&report, OutputFormat::Plain);

        assert!(out.starts_with(
            "Reference point: 000000010000000000000003 \
             (from backup label 000000010000000000000003.00000028.backup)\n"
        ));
        assert!(out.contains("\nUnnecessary Files:\n"));
        assert!(out.contains("000000010000000000000001\n"));
        assert!(err.is_empty());
    }

    #[test]
    fn test_plain_remove_lists_failures_separately() {
        let (out, err) = render(&report(Mode::Remove), OutputFormat::Plain);

        assert!(out.contains("Removing the following files in /archive:"));
        assert!(out.contains("2 candidate(s): 1 removed, 1 failed"));
        assert_eq!(err, "000000010000000000000002: Permission denied\n");
    }

    #[test]
    fn test_json() {
        let (out, _) = render(&report(Mode::Remove), OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["mode"], "remove");
        assert_eq!(value["reference"], "000000010000000000000003");
        assert_eq!(value["anchor"]["kind"], "backup_label");
        assert_eq!(
            value["anchor"]["name"],
            "000000010000000000000003.00000028.backup"
        );
        assert_eq!(value["failures"][0]["kind"], "permission_denied");
        assert_eq!(value["succeeded"][0], "000000010000000000000001");
    }
}
