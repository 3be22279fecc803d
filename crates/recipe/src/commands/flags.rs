//! `recipe flags` command implementation.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use recipe_flags::{FlagRecord, FlagRow, FlagTable};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the flags command.
#[derive(Args)]
pub(crate) struct FlagsArgs {
    /// JSON file with an array of flag records
    /// (`vis`, `dimension`, `stage`, `total`, `flagged`).
    records: PathBuf,
}

impl FlagsArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let content = std::fs::read_to_string(&self.records)?;
        let records: Vec<FlagRecord> =
            serde_json::from_str(&content).map_err(|source| CliError::Json {
                path: self.records.display().to_string(),
                source,
            })?;
        let table = FlagTable::from_records(records)?;

        if table.is_empty() {
            output.info("No flag records");
            return Ok(());
        }
        std::io::stdout()
            .lock()
            .write_all(format_table(&table.rows()).as_bytes())?;

        Ok(())
    }
}

const HEADERS: [&str; 5] = ["Measurement Set", "Dimension", "Before", "After", "Delta"];

/// Render rows as a space-aligned text table with a header line.
fn format_table(rows: &[FlagRow]) -> String {
    let cells: Vec<[&str; 5]> = rows
        .iter()
        .map(|r| {
            [
                r.vis.as_str(),
                r.dimension.as_str(),
                r.before.as_str(),
                r.after.as_str(),
                r.delta.as_str(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for row in std::iter::once(&HEADERS).chain(&cells) {
        let line = row
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use recipe_flags::{FlagSummary, Stage};

    use super::*;

    #[test]
    fn test_format_table() {
        let mut table = FlagTable::new();
        table.insert("a.ms", "spw 0", Stage::Before, FlagSummary { total: 200, flagged: 50 });
        table.insert("a.ms", "spw 0", Stage::After, FlagSummary { total: 200, flagged: 70 });
        table.insert("a.ms", "spw 1", Stage::After, FlagSummary { total: 100, flagged: 5 });

        assert_eq!(
            format_table(&table.rows()),
            "\
Measurement Set  Dimension  Before   After    Delta
a.ms             spw 0      25.000%  35.000%  10.000%
a.ms             spw 1      N/A      5.000%   N/A
"
        );
    }
}
