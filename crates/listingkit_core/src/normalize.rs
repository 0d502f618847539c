//! Ratio classification and positional title reconstruction for one group.

use tracing::debug;

use crate::conf::{N_SIZE_TIERS, TUP_SQUARE_KEYWORDS, select_title_sizes, select_variant_label};
use crate::sheet::WorksheetCells;
use crate::spec::{EnumCellValue, EnumRatioType, SpecRowGroup};
use crate::util::{clean_title, extract_base_title};

////////////////////////////////////////////////////////////////////////////////
// #region RatioClassifier

/// Whether `title` carries a square dimension keyword.
pub fn is_square_title(title: &str) -> bool {
    TUP_SQUARE_KEYWORDS.iter().any(|kw| title.contains(kw))
}

/// Classify a set of titles: square if any title has a square keyword.
pub fn detect_ratio_type_from_titles<I, S>(titles: I) -> EnumRatioType
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if titles.into_iter().any(|title| is_square_title(title.as_ref())) {
        EnumRatioType::Square
    } else {
        EnumRatioType::ThreeToTwo
    }
}

/// Classify the ratio family of `group` from its `Product Name` cells.
pub fn detect_ratio_type<W: WorksheetCells + ?Sized>(
    sheet: &W,
    group: &SpecRowGroup,
    col_product_name: u32,
) -> EnumRatioType {
    detect_ratio_type_from_titles(
        group
            .rows()
            .iter()
            .map(|n_row| sheet.read(*n_row, col_product_name))
            .filter(|value| !value.is_empty())
            .map(|value| value.to_text()),
    )
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region TitleNormalizer

/// Build and clean the title for group-local index `idx_in_group`.
///
/// Index 0 is the parent and gets the base title alone; indices 1..=10 get
/// `"{base} {label} {size}"` with the size cycling through the ratio's tiers.
pub fn normalize_title(base_title: &str, idx_in_group: usize, ratio: EnumRatioType) -> String {
    let c_name = match select_variant_label(idx_in_group) {
        None => base_title.to_string(),
        Some(c_label) => {
            let c_size = select_title_sizes(ratio)[(idx_in_group - 1) % N_SIZE_TIERS];
            format!("{base_title} {c_label} {c_size}")
        }
    };
    clean_title(&c_name)
}

/// Rewrite every non-empty `Product Name` cell of `group`.
///
/// The base title comes from the parent row once; a group whose parent
/// title is empty is left as is.
pub fn normalize_group<W: WorksheetCells + ?Sized>(
    sheet: &mut W,
    group: &SpecRowGroup,
    col_product_name: u32,
    ratio: EnumRatioType,
) {
    let value_parent = sheet.read(group.row_first(), col_product_name);
    if value_parent.is_empty() {
        debug!(
            "Row {}: empty parent title, titles of this group left untouched",
            group.row_first()
        );
        return;
    }
    let c_base_title = extract_base_title(&value_parent.to_text());

    for (n_idx, n_row) in group.iter_indexed() {
        if sheet.read(n_row, col_product_name).is_empty() {
            continue;
        }
        let c_name = normalize_title(&c_base_title, n_idx, ratio);
        sheet.write(n_row, col_product_name, EnumCellValue::String(c_name));
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::SheetGrid;

    const C_PARENT: &str = "Royal Pegasus Under Moon Canvas Print, Mythical Winged Horse Art-1";

    fn create_group_sheet(titles: &[&str]) -> (SheetGrid, SpecRowGroup) {
        let mut l_rows: Vec<Vec<&str>> = vec![vec![], vec!["Product Name"], vec![]];
        l_rows.extend(titles.iter().map(|t| vec![*t]));
        (SheetGrid::from_rows(l_rows), SpecRowGroup::from_start(4))
    }

    fn create_variant_titles(sizes: &[&str; 5]) -> Vec<String> {
        let mut l_titles = vec!["Parent Title".to_string()];
        for c_label in ["Frame-style", "Unframe-style"] {
            l_titles.extend(sizes.iter().map(|s| format!("Title {c_label} {s}")));
        }
        l_titles
    }

    #[test]
    fn test_detect_ratio_from_titles() {
        let l_32 = create_variant_titles(&crate::conf::TUP_TITLE_SIZES_32);
        let l_square = create_variant_titles(&crate::conf::TUP_TITLE_SIZES_SQUARE);
        assert_eq!(detect_ratio_type_from_titles(&l_32), EnumRatioType::ThreeToTwo);
        assert_eq!(detect_ratio_type_from_titles(&l_square), EnumRatioType::Square);
    }

    #[test]
    fn test_detect_ratio_is_order_independent() {
        let mut l_titles = vec!["plain".to_string(), "x 28x28 y".to_string(), "other".to_string()];
        assert_eq!(detect_ratio_type_from_titles(&l_titles), EnumRatioType::Square);
        l_titles.reverse();
        assert_eq!(detect_ratio_type_from_titles(&l_titles), EnumRatioType::Square);
    }

    #[test]
    fn test_detect_ratio_reads_group_cells() {
        let mut l_titles = vec!["Parent"; 11];
        l_titles[7] = "";
        l_titles[9] = "Print 16x16inch(40x40cm)";
        let (grid, group) = create_group_sheet(&l_titles);
        assert_eq!(detect_ratio_type(&grid, &group, 1), EnumRatioType::Square);

        let (grid, group) = create_group_sheet(&["Parent"; 11]);
        assert_eq!(detect_ratio_type(&grid, &group, 1), EnumRatioType::ThreeToTwo);
    }

    #[test]
    fn test_normalize_title_positions() {
        assert_eq!(
            normalize_title(C_PARENT, 0, EnumRatioType::ThreeToTwo),
            "Royal Pegasus Under Moon Canvas Print, Mythical Winged Horse Art"
        );
        assert_eq!(
            normalize_title(C_PARENT, 1, EnumRatioType::ThreeToTwo),
            "Royal Pegasus Under Moon Canvas Print, Mythical Winged Horse Art \
             Frame-style 08x12inch(20x30cm)"
        );
        assert_eq!(
            normalize_title(C_PARENT, 10, EnumRatioType::Square),
            "Royal Pegasus Under Moon Canvas Print, Mythical Winged Horse Art \
             Unframe-style 28x28inch(70x70cm)"
        );
    }

    #[test]
    fn test_normalize_group_rebuilds_titles_from_parent() {
        let c_variant = format!("{C_PARENT} Frame-royal Pegasus Mythi08x12inch(20x30cm)");
        let mut l_titles = vec![C_PARENT];
        l_titles.extend(std::iter::repeat_n(c_variant.as_str(), 10));
        let (mut grid, group) = create_group_sheet(&l_titles);

        normalize_group(&mut grid, &group, 1, EnumRatioType::ThreeToTwo);

        assert_eq!(
            grid.read(5, 1).to_text(),
            "Royal Pegasus Under Moon Canvas Print, Mythical Winged Horse Art \
             Frame-style 08x12inch(20x30cm)"
        );
        assert_eq!(
            grid.read(11, 1).to_text(),
            "Royal Pegasus Under Moon Canvas Print, Mythical Winged Horse Art \
             Unframe-style 12x18inch(30x45cm)"
        );
        assert_eq!(
            grid.read(14, 1).to_text(),
            "Royal Pegasus Under Moon Canvas Print, Mythical Winged Horse Art \
             Unframe-style 24x36inch(60x90cm)"
        );
    }

    #[test]
    fn test_normalize_group_skips_empty_cells() {
        let mut l_titles = vec!["Poster"; 11];
        l_titles[3] = "";
        let (mut grid, group) = create_group_sheet(&l_titles);

        normalize_group(&mut grid, &group, 1, EnumRatioType::ThreeToTwo);

        assert_eq!(grid.read(7, 1), EnumCellValue::None);
        assert_eq!(grid.read(6, 1).to_text(), "Poster Frame-style 12x18inch(30x45cm)");
    }

    #[test]
    fn test_normalize_group_without_parent_title_is_noop() {
        let mut l_titles = vec!["Poster Frame-style"; 11];
        l_titles[0] = "";
        let (mut grid, group) = create_group_sheet(&l_titles);

        normalize_group(&mut grid, &group, 1, EnumRatioType::Square);

        assert!(!grid.is_modified());
    }
}
