use std::collections::HashSet;

use rusqlite::Connection;

use crate::db;
use crate::error::Result;
use crate::models::ExpenseRow;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub candidates: usize,
    pub written: usize,
    /// Dropped because the identity was already stored.
    pub already_stored: usize,
    /// Dropped because an earlier row in the same batch had the identity.
    pub repeated_in_batch: usize,
    /// Rejected by the store on a key conflict.
    pub conflicts: usize,
}

impl IngestReport {
    pub fn skipped(&self) -> usize {
        self.already_stored + self.repeated_in_batch + self.conflicts
    }
}

/// Split off candidates whose identity is in `existing` or was already seen
/// earlier in the batch. Returns the kept rows, the count dropped as stored
/// and the count dropped as repeats.
pub fn filter_unique(
    candidates: Vec<ExpenseRow>,
    existing: &HashSet<String>,
) -> (Vec<ExpenseRow>, usize, usize) {
    let mut seen: HashSet<String> = HashSet::new();
    let mut kept = Vec::with_capacity(candidates.len());
    let (mut stored, mut repeated) = (0usize, 0usize);
    for row in candidates {
        if existing.contains(&row.gid) {
            stored += 1;
        } else if !seen.insert(row.gid.clone()) {
            repeated += 1;
        } else {
            kept.push(row);
        }
    }
    (kept, stored, repeated)
}

/// Persist `candidates` with at most one read of stored identities and one
/// batch write.
pub fn ingest(
    conn: &Connection,
    candidates: Vec<ExpenseRow>,
    ensure_unique: bool,
) -> Result<IngestReport> {
    let mut report = IngestReport {
        candidates: candidates.len(),
        ..IngestReport::default()
    };
    if candidates.is_empty() {
        return Ok(report);
    }

    let rows = if ensure_unique {
        let existing = db::read_keys::<ExpenseRow>(conn)?;
        let (kept, stored, repeated) = filter_unique(candidates, &existing);
        report.already_stored = stored;
        report.repeated_in_batch = repeated;
        log::debug!("{stored} already stored, {repeated} repeated in batch");
        kept
    } else {
        candidates
    };

    let outcome = db::write(conn, &rows)?;
    report.written = outcome.written;
    report.conflicts = outcome.duplicates;
    Ok(report)
}
