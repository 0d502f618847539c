//! Template-format constants and positional sequence tables.

use crate::spec::{EnumListingColumn, EnumRatioType};

////////////////////////////////////////////////////////////////////////////////
// #region TemplateLayout

/// Row holding human-readable column names (row 1 is marketplace metadata).
pub const N_ROW_HEADER: u32 = 2;
/// First data row (row 3 holds internal field codes).
pub const N_ROW_DATA_START: u32 = 4;
/// Rows per variant group: one parent plus ten variants.
pub const N_ROWS_PER_GROUP: usize = 11;
/// Variants per style half (Frame / Unframe).
pub const N_SIZE_TIERS: usize = 5;
/// Leading columns scanned when deciding whether a row holds data.
pub const N_COLS_DATA_SCAN: u32 = 50;
/// Extra rows scanned past the reported sheet extent.
pub const N_ROWS_EXTENT_MARGIN: u32 = 100;

/// Sheet name matched case-insensitively when loading a workbook.
pub const C_SHEET_NAME_TEMPLATE: &str = "template";

/// Columns that must be present in the header row.
pub const TUP_COLUMNS_REQUIRED: [EnumListingColumn; 1] = [EnumListingColumn::ProductName];
/// Columns filled only when present.
pub const TUP_COLUMNS_OPTIONAL: [EnumListingColumn; 9] = [
    EnumListingColumn::VariationTheme,
    EnumListingColumn::PaintType,
    EnumListingColumn::ColorMap,
    EnumListingColumn::Color,
    EnumListingColumn::Size,
    EnumListingColumn::SizeMap,
    EnumListingColumn::Length,
    EnumListingColumn::Weight,
    EnumListingColumn::SearchTerms,
];

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region TitleTables

/// Dimension keywords that mark a group as square.
pub const TUP_SQUARE_KEYWORDS: [&str; 5] = ["12x12", "16x16", "20x20", "24x24", "28x28"];

/// Variant label of the frame half.
pub const C_LABEL_FRAME: &str = "Frame-style";
/// Variant label of the unframe half.
pub const C_LABEL_UNFRAME: &str = "Unframe-style";

/// Title size literals for 3:2 groups, one per size tier.
pub const TUP_TITLE_SIZES_32: [&str; N_SIZE_TIERS] = [
    "08x12inch(20x30cm)",
    "12x18inch(30x45cm)",
    "16x24inch(40x60cm)",
    "20x30inch(50x75cm)",
    "24x36inch(60x90cm)",
];
/// Title size literals for square groups, one per size tier.
pub const TUP_TITLE_SIZES_SQUARE: [&str; N_SIZE_TIERS] = [
    "12x12inch(30x30cm)",
    "16x16inch(40x40cm)",
    "20x20inch(50x50cm)",
    "24x24inch(60x60cm)",
    "28x28inch(70x70cm)",
];

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FieldTables

/// Constant fields written to every row of a group.
pub const TUP_SIMPLE_FIELDS: [(EnumListingColumn, &str); 3] = [
    (EnumListingColumn::VariationTheme, "color-size"),
    (EnumListingColumn::PaintType, "Oil"),
    (EnumListingColumn::ColorMap, "Multi"),
];

pub const TUP_COLOR_SEQUENCE: [&str; N_ROWS_PER_GROUP] = [
    "",
    C_LABEL_FRAME,
    C_LABEL_FRAME,
    C_LABEL_FRAME,
    C_LABEL_FRAME,
    C_LABEL_FRAME,
    C_LABEL_UNFRAME,
    C_LABEL_UNFRAME,
    C_LABEL_UNFRAME,
    C_LABEL_UNFRAME,
    C_LABEL_UNFRAME,
];

pub const TUP_SIZE_MAP_SEQUENCE: [&str; N_ROWS_PER_GROUP] = [
    "", "X-Small", "Small", "Medium", "Large", "X-Large", "X-Small", "Small", "Medium", "Large",
    "X-Large",
];

pub const TUP_SIZE_32: [&str; N_ROWS_PER_GROUP] = [
    "",
    "12L''x08W''",
    "18L''x12W''",
    "24L''x16W''",
    "30L''x20W''",
    "36L''x24W''",
    "12L''x08W''",
    "18L''x12W''",
    "24L''x16W''",
    "30L''x20W''",
    "36L''x24W''",
];

pub const TUP_SIZE_SQUARE: [&str; N_ROWS_PER_GROUP] = [
    "",
    "12L''x12W''",
    "16L''x16W''",
    "20L''x20W''",
    "24L''x24W''",
    "28L''x28W''",
    "12L''x12W''",
    "16L''x16W''",
    "20L''x20W''",
    "24L''x24W''",
    "28L''x28W''",
];

pub const TUP_LENGTH_32: [Option<u32>; N_ROWS_PER_GROUP] = [
    None,
    Some(20),
    Some(30),
    Some(40),
    Some(50),
    Some(60),
    Some(20),
    Some(30),
    Some(40),
    Some(50),
    Some(60),
];

pub const TUP_LENGTH_SQUARE: [Option<u32>; N_ROWS_PER_GROUP] = [
    None,
    Some(30),
    Some(40),
    Some(50),
    Some(60),
    Some(70),
    Some(30),
    Some(40),
    Some(50),
    Some(60),
    Some(70),
];

pub const TUP_WEIGHT_SEQUENCE: [Option<f64>; N_ROWS_PER_GROUP] = [
    None,
    Some(0.18),
    Some(0.28),
    Some(0.48),
    Some(0.68),
    Some(0.88),
    Some(0.02),
    Some(0.04),
    Some(0.07),
    Some(0.15),
    Some(0.25),
];

/// Title size literals for `ratio`.
pub fn select_title_sizes(ratio: EnumRatioType) -> &'static [&'static str; N_SIZE_TIERS] {
    match ratio {
        EnumRatioType::Square => &TUP_TITLE_SIZES_SQUARE,
        EnumRatioType::ThreeToTwo => &TUP_TITLE_SIZES_32,
    }
}

/// `Size` column sequence for `ratio`.
pub fn select_size_sequence(ratio: EnumRatioType) -> &'static [&'static str; N_ROWS_PER_GROUP] {
    match ratio {
        EnumRatioType::Square => &TUP_SIZE_SQUARE,
        EnumRatioType::ThreeToTwo => &TUP_SIZE_32,
    }
}

/// `Length` column sequence for `ratio`.
pub fn select_length_sequence(ratio: EnumRatioType) -> &'static [Option<u32>; N_ROWS_PER_GROUP] {
    match ratio {
        EnumRatioType::Square => &TUP_LENGTH_SQUARE,
        EnumRatioType::ThreeToTwo => &TUP_LENGTH_32,
    }
}

/// Variant label for a group-local index; `None` for the parent row.
pub fn select_variant_label(idx_in_group: usize) -> Option<&'static str> {
    match idx_in_group {
        0 => None,
        1..=N_SIZE_TIERS => Some(C_LABEL_FRAME),
        _ => Some(C_LABEL_UNFRAME),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
