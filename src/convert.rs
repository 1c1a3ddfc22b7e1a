// SPDX-License-Identifier: MIT
//!
//! Workbook to TMX conversion
//!

use std::path::{Path, PathBuf};

use langtags_api::{LangtagScheme, LangtagTable};
use tmx_xml::TmxBuilder;

use crate::columns::classify_columns;
use crate::config::{load_config, Config};
use crate::error::ConvertError;
use crate::output::{tmx_file_name, write_tmx_file};
use crate::segments::extract_pairs;
use crate::workbook::Workbook;
use crate::worksheet::select_worksheet;

/// Target column left out because its language is unknown
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnresolvedLanguage {
    pub column: String,
    pub scheme: LangtagScheme,
}

impl std::fmt::Display for UnresolvedLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "target language {:?} is not recognized under the {} scheme",
            self.column, self.scheme
        )
    }
}

/// Outcome of one workbook
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConversionReport {
    pub worksheet: String,
    /// Written .tmx files, in column order
    pub written: Vec<PathBuf>,
    pub skipped: Vec<UnresolvedLanguage>,
}

/// Converts workbooks with a shared langtags table and output directory
pub struct Converter<'a> {
    langtags: &'a LangtagTable,
    output_dir: &'a Path,
}

impl<'a> Converter<'a> {
    pub fn new(langtags: &'a LangtagTable, output_dir: &'a Path) -> Self {
        Self {
            langtags,
            output_dir,
        }
    }

    /// Open an .xlsx workbook and convert it.
    ///
    /// `config_path` overrides the workbook's `config` sheet.
    pub fn convert_file<P: AsRef<Path>>(
        &self,
        input: P,
        config_path: Option<&Path>,
    ) -> Result<ConversionReport, ConvertError> {
        let workbook = Workbook::open(input)?;
        let config = load_config(config_path, &workbook)?;
        self.convert_workbook(&workbook, &config)
    }

    /// Write one .tmx file per resolvable target language column
    pub fn convert_workbook(
        &self,
        workbook: &Workbook,
        config: &Config,
    ) -> Result<ConversionReport, ConvertError> {
        let sheet = select_worksheet(workbook, config)?;
        log::info!("Extracting worksheet {:?}", sheet.name());

        let layout = classify_columns(sheet, config, self.langtags)?;
        log::debug!("columns = {:?}", layout);

        let source_tag = self
            .langtags
            .resolve(&config.source_lang, config.langtag_scheme)
            .ok_or_else(|| ConvertError::UnresolvedSourceLanguage {
                label: config.source_lang.clone(),
                scheme: config.langtag_scheme,
            })?;
        log::debug!("source langtag {:?} -> {:?}", config.source_lang, source_tag);

        let mut report = ConversionReport {
            worksheet: sheet.name().to_string(),
            ..Default::default()
        };

        for column in &layout.targets {
            let Some(target_tag) = self.langtags.resolve(column, config.langtag_scheme) else {
                let skipped = UnresolvedLanguage {
                    column: column.clone(),
                    scheme: config.langtag_scheme,
                };
                log::warn!("Skipping column: {}", skipped);
                report.skipped.push(skipped);
                continue;
            };
            log::debug!("target langtag {:?} -> {:?}", column, target_tag);

            let pairs = extract_pairs(sheet, &layout.source, column)?;
            let tmx = TmxBuilder::new(&source_tag, &target_tag)
                .remove_markup(config.remove_html_tags)
                .creation_tool(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
                .build(pairs.iter().map(|p| (p.source.as_str(), p.target.as_str())))?;

            let file_name = tmx_file_name(&config.tmx_file_names, &config.name_values(column));
            let path = write_tmx_file(self.output_dir, &file_name, &tmx)?;
            report.written.push(path);
        }

        log::info!(
            "{} TMX file(s) written, {} column(s) skipped",
            report.written.len(),
            report.skipped.len()
        );
        Ok(report)
    }
}
