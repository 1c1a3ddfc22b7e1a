// SPDX-License-Identifier: MIT
//!
//! Find source and language columns among worksheet headers
//!

use langtags_api::{LangtagScheme, LangtagTable};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::Config;
use crate::error::ConvertError;
use crate::workbook::Sheet;

/// cApStAn labels look like `eng-USA`
static CAPSTAN_LANGTAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z]{3}-[A-Z]{3}$").expect("Invalid cApStAn langtag regex"));

/// Source column and target language columns, in header order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnLayout {
    pub source: String,
    pub targets: Vec<String>,
}

/// Whether `header` names a language under `scheme`
pub fn is_language_column(header: &str, scheme: LangtagScheme, langtags: &LangtagTable) -> bool {
    match scheme {
        LangtagScheme::Capstan => CAPSTAN_LANGTAG_REGEX.is_match(header),
        LangtagScheme::Bcp47 => langtags.contains(LangtagScheme::Bcp47, header),
    }
}

/// Classify the headers of `sheet`.
///
/// Headers that are not language labels (notes, IDs, ...) are left out, as is
/// the source language itself.
pub fn classify_columns(
    sheet: &Sheet,
    config: &Config,
    langtags: &LangtagTable,
) -> Result<ColumnLayout, ConvertError> {
    let headers = sheet.headers();
    if !headers.iter().any(|h| *h == config.source_column) {
        return Err(ConvertError::ColumnNotFound {
            column: config.source_column.clone(),
            sheet: sheet.name().to_string(),
        });
    }

    let targets = headers
        .iter()
        .filter(|h| **h != config.source_column && **h != config.source_lang)
        .filter(|h| is_language_column(h, config.langtag_scheme, langtags))
        .cloned()
        .collect();

    Ok(ColumnLayout {
        source: config.source_column.clone(),
        targets,
    })
}
