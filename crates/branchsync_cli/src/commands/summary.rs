//! End-of-run summary: one row per repository pair.

use branchsync::forge::short_error_message;
use branchsync::sync::{PairReport, RepositoryPair, SyncError, SyncReport};
use clap::ValueEnum;

/// Output format for the run summary.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Display as a formatted table (default)
    #[default]
    Table,
    /// Display as JSON
    Json,
}

/// Outcome of one pair for display.
#[derive(Debug, Clone, serde::Serialize, tabled::Tabled)]
pub(crate) struct PairSummary {
    #[tabled(rename = "GitHub")]
    pub github: String,
    #[tabled(rename = "Codeberg")]
    pub codeberg: String,
    #[tabled(rename = "Status")]
    pub status: &'static str,
    #[tabled(rename = "Deleted")]
    pub deleted: usize,
    #[tabled(rename = "Would delete")]
    pub would_delete: usize,
    #[tabled(rename = "Failed")]
    pub failed: usize,
    #[tabled(rename = "Error")]
    pub error: String,
}

impl PairSummary {
    fn from_report(report: &PairReport) -> Self {
        let mut row = Self::empty(&report.pair, "skipped");

        match &report.outcome {
            Ok(deletions) => {
                row.deleted = deletions.deleted();
                row.would_delete = deletions.would_delete();
                row.failed = deletions.failed();
                row.status = if deletions.is_partial_failure() {
                    "partial failure"
                } else if deletions.is_noop() {
                    "nothing to delete"
                } else {
                    "synced"
                };
                row.error = deletions
                    .failures()
                    .map(|(branch, e)| format!("{branch}: {}", short_error_message(e.forge_error())))
                    .collect::<Vec<_>>()
                    .join("; ");
            }
            Err(e) => row.error = describe(e),
        }

        row
    }

    fn empty(pair: &RepositoryPair, status: &'static str) -> Self {
        Self {
            github: pair.source.clone(),
            codeberg: pair.mirror.clone(),
            status,
            deleted: 0,
            would_delete: 0,
            failed: 0,
            error: String::new(),
        }
    }

    /// Rows for every configured pair; pairs the run never reached are
    /// reported as not processed.
    pub(crate) fn rows(report: &SyncReport, configured: &[RepositoryPair]) -> Vec<Self> {
        let mut rows: Vec<Self> = report.pairs.iter().map(Self::from_report).collect();
        rows.extend(
            configured
                .iter()
                .skip(report.pairs.len())
                .map(|pair| Self::empty(pair, "not processed")),
        );
        rows
    }

    pub(crate) fn print_many(items: Vec<Self>, format: OutputFormat) -> serde_json::Result<()> {
        match format {
            OutputFormat::Table => {
                let mut table = tabled::Table::new(items);
                table.with(tabled::settings::Style::rounded());
                println!("{}", table);
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&items)?);
            }
        }
        Ok(())
    }
}

fn describe(error: &SyncError) -> String {
    match error {
        SyncError::Listing {
            remote,
            repository,
            source,
        } => format!("{remote} {repository}: {}", short_error_message(source)),
        other => other.to_string(),
    }
}
