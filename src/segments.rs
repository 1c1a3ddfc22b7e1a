// SPDX-License-Identifier: MIT
//!
//! Extract aligned source/target segments from a worksheet
//!

use std::collections::BTreeSet;

use crate::error::ConvertError;
use crate::workbook::Sheet;

/// Raw source and target cell text, not yet trimmed
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SegmentPair {
    pub source: String,
    pub target: String,
}

/// Distinct (source, target) pairs of rows with a target.
///
/// The set orders pairs by source text, then target text. Rows without
/// target text are dropped whatever their source; a missing source becomes
/// an empty string.
pub fn extract_pairs(
    sheet: &Sheet,
    source_column: &str,
    target_column: &str,
) -> Result<BTreeSet<SegmentPair>, ConvertError> {
    let column = |name: &str| {
        sheet
            .column_index(name)
            .ok_or_else(|| ConvertError::ColumnNotFound {
                column: name.to_string(),
                sheet: sheet.name().to_string(),
            })
    };
    let source_col = column(source_column)?;
    let target_col = column(target_column)?;

    let pairs = (0..sheet.rows().len())
        .filter_map(|row| {
            let target = sheet.cell(row, target_col)?;
            let source = sheet.cell(row, source_col).unwrap_or_default();
            Some(SegmentPair {
                source: source.to_string(),
                target: target.to_string(),
            })
        })
        .collect::<BTreeSet<SegmentPair>>();

    log::debug!(
        "{} distinct pairs for {:?} -> {:?}",
        pairs.len(),
        source_column,
        target_column
    );
    Ok(pairs)
}
