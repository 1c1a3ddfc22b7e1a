// SPDX-License-Identifier: MIT
//!
//! Read workbooks from .xlsx
//!
//! The first row of every sheet is taken as its header row.
//!

use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum WorkbookError {
    #[error("can not read workbook {path:?}: {message}")]
    Read { path: PathBuf, message: String },
}

/// One worksheet, cells as text
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sheet {
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn new<S: Into<String>>(name: S, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows, header row excluded
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Position of the first column named `header`
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    /// Cell text, `None` when empty or outside the row
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    #[cfg(test)]
    pub(crate) fn from_strs(name: &str, headers: &[&str], rows: &[&[&str]]) -> Self {
        Self::new(
            name,
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }
}

/// Ordered set of named sheets
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    /// Read every sheet of an .xlsx workbook
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, WorkbookError> {
        let path = path.as_ref();
        let book = umya_spreadsheet::reader::xlsx::read(path).map_err(|e| WorkbookError::Read {
            path: path.to_path_buf(),
            message: format!("{:?}", e),
        })?;

        let sheets = book
            .get_sheet_collection()
            .iter()
            .map(sheet_from_worksheet)
            .collect::<Vec<Sheet>>();
        log::debug!(
            "Read workbook {:?} with sheets {:?}",
            path,
            sheets.iter().map(Sheet::name).collect::<Vec<&str>>()
        );

        Ok(Self { sheets })
    }

    pub fn from_sheets(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(Sheet::name).collect()
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

fn sheet_from_worksheet(worksheet: &umya_spreadsheet::Worksheet) -> Sheet {
    let (max_col, max_row) = worksheet.get_highest_column_and_row();

    let headers = (1..=max_col)
        .map(|col| worksheet.get_value((col, 1)))
        .collect();
    let rows = (2..=max_row)
        .map(|row| {
            (1..=max_col)
                .map(|col| worksheet.get_value((col, row)))
                .collect()
        })
        .collect();

    Sheet::new(worksheet.get_name(), headers, rows)
}
