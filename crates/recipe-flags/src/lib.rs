//! Flag fraction summaries for quality reports.
//!
//! [`percent_flagged`] and [`percent_flagged_delta`] turn before/after flag
//! counts into the percentage strings shown in report tables. Both are total:
//! an empty selection yields [`NOT_AVAILABLE`] instead of failing.
//!
//! [`FlagTable`] gathers summaries per measurement set and dimension and
//! produces display rows with the same missing-value policy.

mod summary;
mod table;

pub use summary::{
    FlagError, FlagSummary, NOT_AVAILABLE, percent_flagged, percent_flagged_delta,
};
pub use table::{FlagRecord, FlagRow, FlagTable, Stage};
