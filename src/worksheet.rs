// SPDX-License-Identifier: MIT
//!
//! Choose the worksheet holding translations
//!

use crate::config::{Config, CONFIG_SHEET};
use crate::error::ConvertError;
use crate::workbook::{Sheet, Workbook};

/// The configured worksheet, or the only data sheet of the workbook.
///
/// Without a configured name the workbook must hold either a single sheet,
/// or two sheets one of which is `config`.
pub fn select_worksheet<'a>(
    workbook: &'a Workbook,
    config: &Config,
) -> Result<&'a Sheet, ConvertError> {
    if let Some(name) = &config.worksheet {
        return workbook
            .sheet(name)
            .ok_or_else(|| ConvertError::WorksheetNotFound(name.clone()));
    }

    let names = workbook.sheet_names();
    let chosen = match names.as_slice() {
        [only] => Some(*only),
        [first, second] if *first == CONFIG_SHEET => Some(*second),
        [first, second] if *second == CONFIG_SHEET => Some(*first),
        _ => None,
    };

    match chosen.and_then(|name| workbook.sheet(name)) {
        Some(sheet) => Ok(sheet),
        None => Err(ConvertError::AmbiguousWorksheet {
            sheets: names.iter().map(|n| n.to_string()).collect(),
        }),
    }
}
