//! Before/after flag summary table.
//!
//! Collects [`FlagSummary`] records keyed by measurement set, dimension and
//! stage, and turns them into display rows. Missing stages never fail: the
//! affected cells show [`NOT_AVAILABLE`].

use crate::summary::{
    FlagError, FlagSummary, NOT_AVAILABLE, percent_flagged, percent_flagged_delta,
};

/// When a summary was taken relative to the flagging step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Stage {
    Before,
    After,
}

/// One flat input record, as supplied by the flagging statistics step.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlagRecord {
    /// Measurement set name.
    pub vis: String,
    /// Selection dimension, e.g. an antenna, spw or scan label.
    pub dimension: String,
    pub stage: Stage,
    pub total: u64,
    pub flagged: u64,
}

/// One rendered table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagRow {
    pub vis: String,
    pub dimension: String,
    /// Percent flagged before the step.
    pub before: String,
    /// Percent flagged after the step.
    pub after: String,
    /// Additional percent flagged by the step.
    pub delta: String,
}

#[derive(Debug, Clone)]
struct Entry {
    vis: String,
    dimension: String,
    before: Option<FlagSummary>,
    after: Option<FlagSummary>,
}

/// Flag summaries per (measurement set, dimension), in first-insertion order.
///
/// # Example
///
/// ```
/// use recipe_flags::{FlagSummary, FlagTable, Stage};
///
/// let mut table = FlagTable::new();
/// table.insert("a.ms", "spw 0", Stage::Before, FlagSummary { total: 200, flagged: 50 });
/// table.insert("a.ms", "spw 0", Stage::After, FlagSummary { total: 200, flagged: 70 });
/// table.insert("a.ms", "spw 1", Stage::After, FlagSummary { total: 100, flagged: 5 });
///
/// let rows = table.rows();
/// assert_eq!(rows[0].delta, "10.000%");
/// assert_eq!(rows[1].before, "N/A");
/// assert_eq!(rows[1].after, "5.000%");
/// ```
#[derive(Debug, Clone, Default)]
pub struct FlagTable {
    entries: Vec<Entry>,
}

impl FlagTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from flat records, validating each one.
    pub fn from_records(
        records: impl IntoIterator<Item = FlagRecord>,
    ) -> Result<Self, FlagError> {
        let mut table = Self::new();
        for record in records {
            let summary = FlagSummary::new(record.total, record.flagged)?;
            table.insert(record.vis, record.dimension, record.stage, summary);
        }
        Ok(table)
    }

    /// Record a summary. A later summary for the same key replaces the earlier one.
    pub fn insert(
        &mut self,
        vis: impl Into<String>,
        dimension: impl Into<String>,
        stage: Stage,
        summary: FlagSummary,
    ) {
        let vis = vis.into();
        let dimension = dimension.into();

        let index = match self
            .entries
            .iter()
            .position(|e| e.vis == vis && e.dimension == dimension)
        {
            Some(index) => index,
            None => {
                self.entries.push(Entry {
                    vis,
                    dimension,
                    before: None,
                    after: None,
                });
                self.entries.len() - 1
            }
        };

        let entry = &mut self.entries[index];
        match stage {
            Stage::Before => entry.before = Some(summary),
            Stage::After => entry.after = Some(summary),
        }
    }

    /// Look up a recorded summary.
    #[must_use]
    pub fn get(&self, vis: &str, dimension: &str, stage: Stage) -> Option<FlagSummary> {
        let entry = self
            .entries
            .iter()
            .find(|e| e.vis == vis && e.dimension == dimension)?;
        match stage {
            Stage::Before => entry.before,
            Stage::After => entry.after,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Display rows, one per (measurement set, dimension).
    #[must_use]
    pub fn rows(&self) -> Vec<FlagRow> {
        self.entries.iter().map(Entry::row).collect()
    }
}

impl Entry {
    fn row(&self) -> FlagRow {
        let na = || NOT_AVAILABLE.to_owned();
        if self.before.is_none() || self.after.is_none() {
            tracing::debug!(
                vis = %self.vis,
                dimension = %self.dimension,
                "Flag summary missing a stage"
            );
        }

        FlagRow {
            vis: self.vis.clone(),
            dimension: self.dimension.clone(),
            before: self.before.as_ref().map_or_else(na, percent_flagged),
            after: self.after.as_ref().map_or_else(na, percent_flagged),
            delta: match (&self.before, &self.after) {
                (Some(before), Some(after)) => percent_flagged_delta(before, after),
                _ => na(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn summary(total: u64, flagged: u64) -> FlagSummary {
        FlagSummary { total, flagged }
    }

    #[test]
    fn test_complete_row() {
        let mut table = FlagTable::new();
        table.insert("a.ms", "ea01", Stage::Before, summary(200, 50));
        table.insert("a.ms", "ea01", Stage::After, summary(200, 70));

        assert_eq!(
            table.rows(),
            vec![FlagRow {
                vis: "a.ms".to_owned(),
                dimension: "ea01".to_owned(),
                before: "25.000%".to_owned(),
                after: "35.000%".to_owned(),
                delta: "10.000%".to_owned(),
            }]
        );
    }

    #[test]
    fn test_missing_before() {
        let mut table = FlagTable::new();
        table.insert("a.ms", "spw 2", Stage::After, summary(10, 1));

        let row = &table.rows()[0];
        assert_eq!(row.before, NOT_AVAILABLE);
        assert_eq!(row.after, "10.000%");
        assert_eq!(row.delta, NOT_AVAILABLE);
    }

    #[test]
    fn test_missing_after() {
        let mut table = FlagTable::new();
        table.insert("a.ms", "spw 2", Stage::Before, summary(10, 1));

        let row = &table.rows()[0];
        assert_eq!(row.before, "10.000%");
        assert_eq!(row.after, NOT_AVAILABLE);
        assert_eq!(row.delta, NOT_AVAILABLE);
    }

    #[test]
    fn test_zero_total_rows() {
        let mut table = FlagTable::new();
        table.insert("a.ms", "scan 1", Stage::Before, summary(0, 0));
        table.insert("a.ms", "scan 1", Stage::After, summary(0, 0));

        let row = &table.rows()[0];
        assert_eq!(row.before, NOT_AVAILABLE);
        assert_eq!(row.after, NOT_AVAILABLE);
        assert_eq!(row.delta, NOT_AVAILABLE);
    }

    #[test]
    fn test_insertion_order_and_replacement() {
        let mut table = FlagTable::new();
        table.insert("b.ms", "x", Stage::Before, summary(10, 1));
        table.insert("a.ms", "x", Stage::Before, summary(10, 2));
        table.insert("b.ms", "x", Stage::Before, summary(10, 3));

        let rows = table.rows();
        assert_eq!(table.len(), 2);
        assert_eq!(rows[0].vis, "b.ms");
        assert_eq!(rows[0].before, "30.000%");
        assert_eq!(rows[1].vis, "a.ms");
        assert_eq!(
            table.get("b.ms", "x", Stage::Before),
            Some(summary(10, 3))
        );
        assert_eq!(table.get("b.ms", "x", Stage::After), None);
        assert_eq!(table.get("c.ms", "x", Stage::Before), None);
    }

    #[test]
    fn test_from_records_validates() {
        let records = vec![FlagRecord {
            vis: "a.ms".to_owned(),
            dimension: "spw 0".to_owned(),
            stage: Stage::After,
            total: 5,
            flagged: 6,
        }];
        assert!(matches!(
            FlagTable::from_records(records),
            Err(FlagError::FlaggedExceedsTotal { .. })
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_records_from_json() {
        let json = r#"[
            {"vis": "a.ms", "dimension": "spw 0", "stage": "before", "total": 200, "flagged": 50},
            {"vis": "a.ms", "dimension": "spw 0", "stage": "after", "total": 200, "flagged": 70}
        ]"#;
        let records: Vec<FlagRecord> = serde_json::from_str(json).unwrap();
        let table = FlagTable::from_records(records).unwrap();

        assert!(!table.is_empty());
        assert_eq!(table.rows()[0].delta, "10.000%");
    }
}
