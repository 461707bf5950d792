//! Pipeline orchestration
//!
//! One sequential skeleton drives every entity load: open the source,
//! validate the column set, then for each raw record run the entity's pure
//! transform and, when a domain record comes out, its upsert loader. Row
//! outcomes are data ([`RowOutcome`]), not exceptions; any error raised while
//! persisting a single row is counted and contained, and the run continues
//! with the next row.
//!
//! Each row is persisted in its own committed transaction, so a later row's
//! failure can never roll back earlier rows' writes.

pub mod empresas;
pub mod estabelecimentos;
pub mod reference;
pub mod simples;
pub mod transform;

use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::extract::{CsvSource, Layout, RawRow};
use crate::progress;

pub use empresas::EmpresasPipeline;
pub use estabelecimentos::EstabelecimentosPipeline;
pub use reference::ReferencePipeline;
pub use simples::SimplesPipeline;

/// Outcome of upserting one domain record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    /// No record existed for the natural key; a new one was inserted
    Inserted,
    /// A record existed and differed; its mutable fields were overwritten
    Updated,
    /// A record existed with identical business fields; nothing was written
    Skipped,
}

impl RowOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            RowOutcome::Inserted => "inserted",
            RowOutcome::Updated => "updated",
            RowOutcome::Skipped => "skipped",
        }
    }
}

/// Aggregate statistics for one pipeline run, accumulated in file order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Rows that produced a record and were persisted without error
    pub processed: u64,
    pub inserted: u64,
    pub updated: u64,
    pub skipped: u64,
    /// Rows dropped by the transform (missing key or mandatory field)
    pub discarded: u64,
    /// Rows that failed unexpectedly during persistence
    pub errors: u64,
}

impl std::fmt::Display for RunStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "processed={} inserted={} updated={} skipped={} discarded={} errors={}",
            self.processed, self.inserted, self.updated, self.skipped, self.discarded, self.errors
        )
    }
}

/// One entity's specialization of the shared orchestration skeleton
///
/// Implementations supply the fixed file layout, the pure row transform and
/// the natural-key upsert. They hold no mutable state and can be instantiated
/// independently per run.
#[async_trait]
pub trait CsvPipeline: Send + Sync {
    type Record: Send + Sync;

    /// Fixed file layout (field names, encoding, required columns)
    fn layout(&self) -> &Layout;

    /// Pure transform: raw fields to a domain record, or `None` to discard
    /// the row
    fn transform_row(&self, row: &RawRow) -> Option<Self::Record>;

    /// Upsert one record inside its own unit of work
    async fn persist_one(&self, record: &Self::Record) -> anyhow::Result<RowOutcome>;

    /// Key fields of a record, for per-row debug traces
    fn describe(&self, record: &Self::Record) -> String;
}

/// Sequential pipeline runner
///
/// Owns the orchestration for one invocation: header validation up front,
/// then one row fully transformed and loaded before the next is read.
#[derive(Debug, Clone, Copy)]
pub struct Runner {
    show_progress: bool,
    debug: bool,
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

impl Runner {
    pub fn new() -> Self {
        Self {
            show_progress: true,
            debug: false,
        }
    }

    /// Enable or disable the progress bar
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Enable verbose per-row tracing
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Run the full extract-transform-load loop for one file.
    ///
    /// Only pre-run/pre-row conditions (missing file, missing required
    /// columns, undecodable bytes) propagate; per-row persistence failures
    /// are counted in [`RunStats::errors`] and never abort the run.
    pub async fn run<P: CsvPipeline>(&self, pipeline: &P, path: &Path) -> Result<RunStats> {
        let layout = pipeline.layout();
        let mut source = CsvSource::open(path, layout)?;

        // Best-effort line count for the progress total; never fails the run
        let bar = if self.show_progress {
            Some(match progress::count_lines(path) {
                Some(total) => progress::create_etl_progress(total, layout.entity),
                None => progress::create_etl_spinner(layout.entity),
            })
        } else {
            None
        };

        info!(entity = layout.entity, path = %path.display(), "starting ETL run");

        let mut stats = RunStats::default();
        while let Some(row) = source.next_row()? {
            if let Some(bar) = &bar {
                bar.inc(1);
            }

            let Some(record) = pipeline.transform_row(&row) else {
                stats.discarded += 1;
                if self.debug {
                    debug!(line = row.line, "row discarded by transform");
                }
                continue;
            };

            match pipeline.persist_one(&record).await {
                Ok(outcome) => {
                    stats.processed += 1;
                    match outcome {
                        RowOutcome::Inserted => stats.inserted += 1,
                        RowOutcome::Updated => stats.updated += 1,
                        RowOutcome::Skipped => stats.skipped += 1,
                    }
                    if self.debug {
                        debug!(
                            line = row.line,
                            outcome = outcome.as_str(),
                            record = %pipeline.describe(&record),
                            "row persisted"
                        );
                    }
                }
                Err(error) => {
                    // The row's transaction is dropped (rolled back); the next
                    // row starts on a clean unit of work.
                    stats.errors += 1;
                    if self.debug {
                        warn!(line = row.line, error = %format!("{error:#}"), row = %row.raw(), "row failed");
                    } else {
                        warn!(line = row.line, error = %error, "row failed");
                    }
                }
            }
        }

        if let Some(bar) = &bar {
            bar.finish_and_clear();
        }
        info!(entity = layout.entity, %stats, "ETL run completed");

        Ok(stats)
    }

    /// Validate the header and transform only the first data row.
    ///
    /// Performs no writes. Fails with the same pre-run/pre-row errors as
    /// [`Runner::run`].
    pub async fn dry_run<P: CsvPipeline>(&self, pipeline: &P, path: &Path) -> Result<()> {
        let mut source = CsvSource::open(path, pipeline.layout())?;
        if let Some(row) = source.next_row()? {
            if let Some(record) = pipeline.transform_row(&row) {
                debug!(record = %pipeline.describe(&record), "dry-run transformed first row");
            } else {
                debug!(line = row.line, "dry-run: first row discarded by transform");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_outcome_as_str() {
        assert_eq!(RowOutcome::Inserted.as_str(), "inserted");
        assert_eq!(RowOutcome::Updated.as_str(), "updated");
        assert_eq!(RowOutcome::Skipped.as_str(), "skipped");
    }

    #[test]
    fn test_stats_display() {
        let stats = RunStats {
            processed: 3,
            inserted: 3,
            ..Default::default()
        };
        assert_eq!(
            stats.to_string(),
            "processed=3 inserted=3 updated=0 skipped=0 discarded=0 errors=0"
        );
    }
}
