// SPDX-License-Identifier: MIT
//!
//! Tool settings from xls2tmx.toml
//!

use std::path::{Path, PathBuf};

use langtags_api::LangtagTable;

use crate::output::DEFAULT_OUTPUT_DIR;

const SETTINGS_FILE: &str = "xls2tmx.toml";

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("can not read settings file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("can not parse settings file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl SettingsError {
    fn is_not_found(&self) -> bool {
        matches!(self, Self::Read { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

#[derive(serde::Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default, rename_all = "snake_case")]
pub struct Settings {
    /// langtags service endpoint
    pub langtags_url: String,
    /// Local copy of the langtags table, used instead of the service
    pub langtags_file: Option<PathBuf>,
    pub output_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            langtags_url: langtags_api::DEFAULT_LANGTAGS_URL.to_string(),
            langtags_file: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl Settings {
    /// Search default settings files (xls2tmx.toml or ~/.xls2tmx.toml),
    /// falling back to built-in defaults
    pub fn new() -> Result<Self, SettingsError> {
        let settings_files = [
            PathBuf::new().join(SETTINGS_FILE),
            dirs::home_dir()
                .unwrap_or_default()
                .join(format!(".{}", SETTINGS_FILE)),
        ];

        for settings_file in settings_files {
            match Self::with_settings(&settings_file) {
                Ok(settings) => {
                    log::debug!("Read settings file {:?}", settings_file);
                    return Ok(settings);
                }
                Err(err) if err.is_not_found() => {
                    log::debug!("Settings file {:?} NOT found.", settings_file);
                }
                Err(err) => {
                    // Other err, stop searching
                    return Err(err);
                }
            }
        }

        Ok(Self::default())
    }

    /// Settings from specific file
    pub fn with_settings<P: AsRef<Path>>(settings_path: P) -> Result<Self, SettingsError> {
        let path = settings_path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the langtags table, from the local file when one is set
    pub async fn load_langtags(&self) -> langtags_api::Result<LangtagTable> {
        match &self.langtags_file {
            Some(file) => {
                log::info!("Reading langtags from {:?}", file);
                LangtagTable::from_file(file)
            }
            None => {
                log::info!("Fetching langtags from {}", self.langtags_url);
                LangtagTable::fetch(&self.langtags_url).await
            }
        }
    }
}
