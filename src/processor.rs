use serde::Serialize;

use crate::models::RowOutcome;
use crate::normalizer::normalize_name;
use crate::resolver::LicenseResolver;
use crate::table::Row;

/// Row counts after a run.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Walks the table in order and fills in licenses for eligible rows.
///
/// A failed lookup never stops the walk: the row gets the error marker and
/// processing moves on. Rows are only changed in memory.
pub struct RowProcessor<'a> {
    resolver: &'a dyn LicenseResolver,
    eligible_value: String,
    architectures: &'a [String],
}

impl<'a> RowProcessor<'a> {
    pub fn new(resolver: &'a dyn LicenseResolver, eligible_value: &str, architectures: &'a [String]) -> Self {
        Self {
            resolver,
            eligible_value: eligible_value.to_lowercase(),
            architectures,
        }
    }

    pub fn is_eligible(&self, row: &Row) -> bool {
        row.exempt_flag.to_lowercase() == self.eligible_value
    }

    pub fn process_row(&self, row: &mut Row) -> RowOutcome {
        if !self.is_eligible(row) {
            return RowOutcome::Skipped;
        }

        let name = normalize_name(&row.package, self.architectures);
        match self.resolver.resolve_license(&name) {
            Ok(license) => {
                row.license = license.clone();
                RowOutcome::Updated(license)
            }
            Err(e) => {
                row.license = e.marker().to_string();
                RowOutcome::Failed {
                    marker: e.marker().to_string(),
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Process every row, reporting each outcome to `on_row` as it happens.
    pub fn process_all(&self, rows: &mut [Row], mut on_row: impl FnMut(&Row, &RowOutcome)) -> Summary {
        let mut summary = Summary::default();

        for row in rows.iter_mut() {
            let outcome = self.process_row(row);
            summary.total += 1;
            match outcome {
                RowOutcome::Skipped => summary.skipped += 1,
                RowOutcome::Updated(_) => summary.updated += 1,
                RowOutcome::Failed { .. } => summary.failed += 1,
            }
            on_row(row, &outcome);
        }

        summary
    }
}
