//! Group processor: runs the per-document pipeline over one worksheet.

use tracing::info;

use crate::fill::fill_group;
use crate::layout::{group_rows, locate_columns};
use crate::normalize::{detect_ratio_type, normalize_group};
use crate::report::{ReportProcess, ReportProcessBuilder};
use crate::sheet::WorksheetCells;
use crate::spec::{ProcessError, SpecColumnMap, SpecRowGroup};

/// Classify, normalize and fill every group in order.
///
/// Groups are independent: the ratio type is recomputed for each one.
pub fn process_groups<W: WorksheetCells + ?Sized>(
    sheet: &mut W,
    map_cols: &SpecColumnMap,
    groups: &[SpecRowGroup],
    builder_report: &mut ReportProcessBuilder,
) {
    let n_col_title = map_cols.product_name();
    let n_groups = groups.len();

    for (n_idx, group) in groups.iter().enumerate() {
        let ratio = detect_ratio_type(&*sheet, group, n_col_title);
        info!(
            "  [{}/{n_groups}] rows {}-{} ratio: {ratio}",
            n_idx + 1,
            group.row_first(),
            group.row_last()
        );
        normalize_group(sheet, group, n_col_title, ratio);
        fill_group(sheet, group, map_cols, ratio);
        builder_report.add_group(group.row_first(), group.row_last(), ratio);
    }
}

/// Locate columns, group rows and process all groups of `sheet`.
///
/// Returns [`ProcessError`] only for structural template problems; the sheet
/// is not touched in that case.
pub fn process_sheet<W: WorksheetCells + ?Sized>(
    sheet: &mut W,
) -> Result<ReportProcess, ProcessError> {
    let map_cols = locate_columns(&*sheet)?;
    let spec_grouping = group_rows(&*sheet);

    let mut builder_report = ReportProcessBuilder::default();
    builder_report.add_rows_dropped(spec_grouping.n_rows_dropped as u64);
    builder_report.add_warnings(spec_grouping.warnings);

    if spec_grouping.groups.is_empty() {
        info!("No data to process");
        return Ok(builder_report.build());
    }
    info!(
        "{} product group(s), {} row(s)",
        spec_grouping.groups.len(),
        spec_grouping.groups.len() * crate::conf::N_ROWS_PER_GROUP
    );

    process_groups(sheet, &map_cols, &spec_grouping.groups, &mut builder_report);
    Ok(builder_report.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conf::{N_ROW_DATA_START, TUP_SIZE_SQUARE};
    use crate::sheet::SheetGrid;
    use crate::spec::{EnumCellValue, EnumRatioType};

    fn create_template(titles: &[String], headers: &[&str]) -> SheetGrid {
        let mut grid = SheetGrid::from_rows([vec!["meta"], headers.to_vec(), vec!["codes"]]);
        for (n_offset, c_title) in titles.iter().enumerate() {
            grid.insert_loaded(
                N_ROW_DATA_START + n_offset as u32,
                1,
                EnumCellValue::from(c_title.as_str()),
            );
        }
        grid
    }

    fn create_group_titles(c_parent: &str, c_variant_size: &str) -> Vec<String> {
        let mut l_titles = vec![c_parent.to_string()];
        for _ in 0..10 {
            l_titles.push(format!("{c_parent} Frame-x {c_variant_size}"));
        }
        l_titles
    }

    #[test]
    fn test_process_sheet_end_to_end() {
        let mut l_titles = create_group_titles(
            "Royal Pegasus Under Moon Canvas Print, Mythical Winged Horse Art-1",
            "08x12inch(20x30cm)",
        );
        l_titles.extend(create_group_titles("Moon_Lake Poster", "20x20inch(50x50cm)"));
        l_titles.push("orphan".to_string());
        let mut grid = create_template(&l_titles, &["Product Name", "Size", "Weight"]);

        let report = process_sheet(&mut grid).expect("process");

        assert_eq!(report.cnt_groups, 2);
        assert_eq!(report.cnt_rows, 22);
        assert_eq!(report.cnt_rows_dropped, 1);
        assert_eq!(report.warning_count(), 1);
        assert_eq!(report.groups[0].ratio, EnumRatioType::ThreeToTwo);
        assert_eq!(report.groups[1].ratio, EnumRatioType::Square);

        assert_eq!(
            grid.read(5, 1).to_text(),
            "Royal Pegasus Under Moon Canvas Print, Mythical Winged Horse Art \
             Frame-style 08x12inch(20x30cm)"
        );
        assert_eq!(grid.read(15, 1).to_text(), "Moon Lake Poster");
        assert_eq!(grid.read(16, 2).to_text(), TUP_SIZE_SQUARE[1]);

        // trailing partial group is never written
        assert_eq!(grid.read(26, 1).to_text(), "orphan");
        assert_eq!(grid.read(26, 2), EnumCellValue::None);
        assert_eq!(grid.read(26, 3), EnumCellValue::None);
        assert!(grid.edits().keys().all(|(n_row, _)| *n_row < 26));
    }

    #[test]
    fn test_process_sheet_without_data_reports_nothing() {
        let mut grid = create_template(&[], &["Product Name"]);
        let report = process_sheet(&mut grid).expect("process");
        assert_eq!(report.cnt_groups, 0);
        assert!(!grid.is_modified());
    }

    #[test]
    fn test_process_sheet_missing_title_column_leaves_sheet_untouched() {
        let l_titles = create_group_titles("Poster", "08x12inch(20x30cm)");
        let mut grid = create_template(&l_titles, &["Title", "Size"]);
        assert!(process_sheet(&mut grid).is_err());
        assert!(!grid.is_modified());
    }
}
