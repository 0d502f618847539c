//! Processing report models and mutable report builder.

use std::collections::BTreeMap;
use std::fmt;

use crate::spec::EnumRatioType;

/// Outcome of one processed row group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecGroupOutcome {
    /// 1-based group ordinal.
    pub n_group: usize,
    /// Parent row.
    pub row_first: u32,
    /// Last variant row.
    pub row_last: u32,
    /// Detected ratio family.
    pub ratio: EnumRatioType,
}

/// Aggregate counters and diagnostics for one `process_sheet` run.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReportProcess {
    /// Number of complete groups processed.
    pub cnt_groups: u64,
    /// Rows covered by processed groups.
    pub cnt_rows: u64,
    /// Trailing rows left out of any group.
    pub cnt_rows_dropped: u64,
    /// Per-group outcomes in row order.
    pub groups: Vec<SpecGroupOutcome>,
    /// Non-fatal warnings collected during the run.
    pub warnings: Vec<String>,
}

impl ReportProcess {
    /// Number of collected warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Number of groups classified as `ratio`.
    pub fn count_ratio(&self, ratio: EnumRatioType) -> u64 {
        self.groups.iter().filter(|g| g.ratio == ratio).count() as u64
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_groups".to_string(), self.cnt_groups);
        dict_counts.insert("cnt_rows".to_string(), self.cnt_rows);
        dict_counts.insert("cnt_rows_dropped".to_string(), self.cnt_rows_dropped);
        dict_counts.insert(
            "cnt_square".to_string(),
            self.count_ratio(EnumRatioType::Square),
        );
        dict_counts.insert(
            "cnt_three_to_two".to_string(),
            self.count_ratio(EnumRatioType::ThreeToTwo),
        );
        dict_counts.insert("cnt_warnings".to_string(), self.warning_count() as u64);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        let dict_counts = self.to_dict();
        format!(
            "{prefix} groups={} rows={} dropped={} square={} three_to_two={} warnings={}",
            dict_counts["cnt_groups"],
            dict_counts["cnt_rows"],
            dict_counts["cnt_rows_dropped"],
            dict_counts["cnt_square"],
            dict_counts["cnt_three_to_two"],
            dict_counts["cnt_warnings"]
        )
    }
}

impl fmt::Display for ReportProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[PROCESS]"))
    }
}

/// Mutable accumulator for processing statistics.
#[derive(Debug, Default, Clone)]
pub struct ReportProcessBuilder {
    /// See [`ReportProcess::cnt_rows_dropped`].
    pub cnt_rows_dropped: u64,
    /// See [`ReportProcess::groups`].
    pub groups: Vec<SpecGroupOutcome>,
    /// See [`ReportProcess::warnings`].
    pub warnings: Vec<String>,
}

impl ReportProcessBuilder {
    /// Record one processed group.
    pub fn add_group(&mut self, row_first: u32, row_last: u32, ratio: EnumRatioType) {
        let n_group = self.groups.len() + 1;
        self.groups.push(SpecGroupOutcome {
            n_group,
            row_first,
            row_last,
            ratio,
        });
    }

    /// Add dropped trailing rows.
    pub fn add_rows_dropped(&mut self, value: u64) {
        self.cnt_rows_dropped += value;
    }

    /// Add warning messages.
    pub fn add_warnings<I: IntoIterator<Item = String>>(&mut self, warnings: I) {
        self.warnings.extend(warnings);
    }

    /// Finalize builder into immutable report.
    pub fn build(self) -> ReportProcess {
        let cnt_rows = self
            .groups
            .iter()
            .map(|g| u64::from(g.row_last - g.row_first + 1))
            .sum();
        ReportProcess {
            cnt_groups: self.groups.len() as u64,
            cnt_rows,
            cnt_rows_dropped: self.cnt_rows_dropped,
            groups: self.groups,
            warnings: self.warnings,
        }
    }
}
