// SPDX-License-Identifier: MIT
//!
//! Convert multilingual workbooks into TMX files, one per language pair
//!

mod columns;
mod config;
mod convert;
mod error;
mod output;
mod segments;
mod settings;
mod workbook;
mod worksheet;

// re-export
pub use columns::{classify_columns, is_language_column, ColumnLayout};
pub use config::{load_config, Config, ConfigError, ConfigValue, RawConfig, CONFIG_SHEET};
pub use convert::{ConversionReport, Converter, UnresolvedLanguage};
pub use error::ConvertError;
pub use output::{tmx_file_name, write_tmx_file, DEFAULT_OUTPUT_DIR};
pub use segments::{extract_pairs, SegmentPair};
pub use settings::{Settings, SettingsError};
pub use workbook::{Sheet, Workbook, WorkbookError};
pub use worksheet::select_worksheet;

pub use langtags_api::{LangtagScheme, LangtagTable};
