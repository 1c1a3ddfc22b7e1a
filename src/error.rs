// SPDX-License-Identifier: MIT
//!
//! Errors that abort the conversion of one workbook
//!

use std::path::PathBuf;

use langtags_api::LangtagScheme;

use crate::config::ConfigError;
use crate::workbook::WorkbookError;

#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Workbook(#[from] WorkbookError),

    #[error("can not choose the worksheet to extract among {sheets:?}, set \"worksheet\" in config")]
    AmbiguousWorksheet { sheets: Vec<String> },

    #[error("worksheet {0:?} not found in workbook")]
    WorksheetNotFound(String),

    #[error("column {column:?} not found in the headers of worksheet {sheet:?}")]
    ColumnNotFound { column: String, sheet: String },

    #[error("source language {label:?} is not recognized under the {scheme} scheme")]
    UnresolvedSourceLanguage { label: String, scheme: LangtagScheme },

    #[error(transparent)]
    Tmx(#[from] tmx_xml::Error),

    #[error("can not write {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
