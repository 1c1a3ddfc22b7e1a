// SPDX-License-Identifier: MIT
//!
//! Per-workbook conversion config
//!
//! The config comes either from a JSON file or from the workbook's own
//! `config` sheet (`KEY` / `VALUE` columns). Raw values are checked once into
//! a typed [`Config`] before anything else reads them.
//!

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use langtags_api::LangtagScheme;

use crate::workbook::{Sheet, Workbook};

/// Name of the embedded config sheet
pub const CONFIG_SHEET: &str = "config";

const KEY_COLUMN: &str = "KEY";
const VALUE_COLUMN: &str = "VALUE";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("can not read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config must be a JSON object")]
    NotAnObject,
    #[error("unsupported value for {key:?}: {value}")]
    UnsupportedValue { key: String, value: String },
    #[error("config sheet has no {0:?} column")]
    MissingColumn(&'static str),
    #[error("no config file given and the workbook has no \"config\" sheet")]
    NoConfigSource,
    #[error("{0:?} is not specified in config")]
    MissingKey(&'static str),
    #[error("{key:?} must be {expected}, got {value}")]
    InvalidValue {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Scalar config value
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigValue {
    Null,
    Bool(bool),
    Text(String),
}

impl ConfigValue {
    fn from_json(key: &str, value: serde_json::Value) -> Result<Self, ConfigError> {
        use serde_json::Value;
        match value {
            Value::Null => Ok(Self::Null),
            Value::Bool(b) => Ok(Self::Bool(b)),
            Value::String(s) => Ok(Self::Text(s)),
            Value::Number(n) => Ok(Self::Text(n.to_string())),
            other => Err(ConfigError::UnsupportedValue {
                key: key.to_string(),
                value: other.to_string(),
            }),
        }
    }

    /// Case-insensitive "yes" / "no" become booleans
    fn normalized(self) -> Self {
        match self {
            Self::Text(s) if s.eq_ignore_ascii_case("yes") => Self::Bool(true),
            Self::Text(s) if s.eq_ignore_ascii_case("no") => Self::Bool(false),
            other => other,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Text(s) => format!("{:?}", s),
        }
    }
}

/// Config as read, before validation
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawConfig {
    values: BTreeMap<String, ConfigValue>,
}

impl RawConfig {
    /// Read a JSON config file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Read config file {:?}", path);
        Self::from_json_str(&json)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        match serde_json::from_str::<serde_json::Value>(json)? {
            serde_json::Value::Object(map) => map
                .into_iter()
                .map(|(key, value)| {
                    let value = ConfigValue::from_json(&key, value)?;
                    Ok::<_, ConfigError>((key, value))
                })
                .collect(),
            _ => Err(ConfigError::NotAnObject),
        }
    }

    /// Read a two-column `KEY` / `VALUE` sheet, empty values become null
    pub fn from_sheet(sheet: &Sheet) -> Result<Self, ConfigError> {
        let key_col = sheet
            .column_index(KEY_COLUMN)
            .ok_or(ConfigError::MissingColumn(KEY_COLUMN))?;
        let value_col = sheet
            .column_index(VALUE_COLUMN)
            .ok_or(ConfigError::MissingColumn(VALUE_COLUMN))?;

        let mut raw = Self::default();
        for row in 0..sheet.rows().len() {
            let Some(key) = sheet.cell(row, key_col).map(str::trim).filter(|k| !k.is_empty())
            else {
                continue;
            };
            let value = sheet
                .cell(row, value_col)
                .map(|v| ConfigValue::Text(v.to_string()))
                .unwrap_or(ConfigValue::Null);
            raw.insert(key, value);
        }
        Ok(raw)
    }

    pub fn insert<K: Into<String>>(&mut self, key: K, value: ConfigValue) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    /// Apply yes/no coercion to every value
    pub fn normalized(self) -> Self {
        Self {
            values: self
                .values
                .into_iter()
                .map(|(k, v)| (k, v.normalized()))
                .collect(),
        }
    }

    fn optional_text(&self, key: &'static str) -> Result<Option<String>, ConfigError> {
        match self.get(key) {
            None | Some(ConfigValue::Null) => Ok(None),
            Some(ConfigValue::Text(s)) if s.trim().is_empty() => Ok(None),
            Some(ConfigValue::Text(s)) => Ok(Some(s.trim().to_string())),
            Some(other) => Err(ConfigError::InvalidValue {
                key,
                expected: "text",
                value: other.describe(),
            }),
        }
    }

    fn required_text(&self, key: &'static str) -> Result<String, ConfigError> {
        self.optional_text(key)?.ok_or(ConfigError::MissingKey(key))
    }

    fn optional_bool(&self, key: &'static str) -> Result<Option<bool>, ConfigError> {
        match self.get(key) {
            None | Some(ConfigValue::Null) => Ok(None),
            Some(ConfigValue::Bool(b)) => Ok(Some(*b)),
            // spreadsheet boolean cells read as TRUE / FALSE
            Some(ConfigValue::Text(s)) if s.eq_ignore_ascii_case("true") => Ok(Some(true)),
            Some(ConfigValue::Text(s)) if s.eq_ignore_ascii_case("false") => Ok(Some(false)),
            Some(other) => Err(ConfigError::InvalidValue {
                key,
                expected: "yes or no",
                value: other.describe(),
            }),
        }
    }
}

impl FromIterator<(String, ConfigValue)> for RawConfig {
    fn from_iter<I: IntoIterator<Item = (String, ConfigValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Validated conversion config
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Label of the source language, under `langtag_scheme`
    pub source_lang: String,
    /// Header of the column holding source text
    pub source_column: String,
    pub langtag_scheme: LangtagScheme,
    /// Sheet to extract, auto-detected when `None`
    pub worksheet: Option<String>,
    pub remove_html_tags: bool,
    /// Comma separated output file name template
    pub tmx_file_names: String,
    values: BTreeMap<String, String>,
}

impl Config {
    pub fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let source_lang = raw.required_text("source_lang")?;
        let source_column = raw.required_text("source_column")?;

        let scheme_name = match raw.optional_text("langtag_scheme")? {
            Some(name) => Some(name),
            None => raw.optional_text("langtag_convention")?,
        };
        let langtag_scheme = scheme_name
            .as_deref()
            .map(LangtagScheme::from)
            .unwrap_or(LangtagScheme::Bcp47);

        let worksheet = raw.optional_text("worksheet")?;
        let remove_html_tags = raw.optional_bool("remove_html_tags")?.unwrap_or(false);
        let tmx_file_names = raw.required_text("tmx_file_names")?.replace(['<', '>'], "");

        let values = raw
            .values
            .into_iter()
            .filter_map(|(key, value)| match value {
                ConfigValue::Null => None,
                ConfigValue::Bool(b) => Some((key, b.to_string())),
                ConfigValue::Text(s) => Some((key, s)),
            })
            .collect();

        Ok(Self {
            source_lang,
            source_column,
            langtag_scheme,
            worksheet,
            remove_html_tags,
            tmx_file_names,
            values,
        })
    }

    /// Values for output file name placeholders, with `target_lang` set to `target_lang`
    pub fn name_values(&self, target_lang: &str) -> BTreeMap<String, String> {
        let mut values = self.values.clone();
        values.insert("target_lang".to_string(), target_lang.to_string());
        values
    }
}

/// Effective config for `workbook`.
///
/// An explicit config file wins over the embedded `config` sheet.
pub fn load_config(config_path: Option<&Path>, workbook: &Workbook) -> Result<Config, ConfigError> {
    let raw = match config_path {
        Some(path) => RawConfig::from_json_file(path)?,
        None => match workbook.sheet(CONFIG_SHEET) {
            Some(sheet) => {
                log::debug!("Read config from sheet {:?}", CONFIG_SHEET);
                RawConfig::from_sheet(sheet)?
            }
            None => return Err(ConfigError::NoConfigSource),
        },
    };

    let config = Config::from_raw(raw.normalized())?;
    log::debug!("config = {:?}", config);
    Ok(config)
}
