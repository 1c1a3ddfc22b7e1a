// SPDX-License-Identifier: MIT
//!
//! Name and write .tmx files
//!

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::ConvertError;

/// Output directory, relative to the working directory
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Build a file name from a comma separated template.
///
/// Each trimmed token is replaced by its value when it is a known key and
/// kept literally otherwise; parts are joined with `_`.
pub fn tmx_file_name(template: &str, values: &BTreeMap<String, String>) -> String {
    let parts = template
        .replace(['<', '>'], "")
        .split(',')
        .map(|token| {
            let token = token.trim();
            values
                .get(token)
                .cloned()
                .unwrap_or_else(|| token.to_string())
        })
        .collect::<Vec<String>>();
    format!("{}.tmx", parts.join("_"))
}

/// Write `tmx` into `output_dir`, replacing any file of the same name
pub fn write_tmx_file(
    output_dir: &Path,
    file_name: &str,
    tmx: &str,
) -> Result<PathBuf, ConvertError> {
    std::fs::create_dir_all(output_dir).map_err(|source| ConvertError::Write {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let path = output_dir.join(file_name);
    log::info!("Writing TMX output to file {:?}", path);
    std::fs::write(&path, tmx).map_err(|source| ConvertError::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

#[cfg(test)]
mod test {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn template_placeholders() {
        let values = values(&[("container", "surveyA"), ("target_lang", "fra-FRA")]);
        assert_eq!(
            tmx_file_name("container, target_lang", &values),
            "surveyA_fra-FRA.tmx"
        );
        assert_eq!(
            tmx_file_name("<container>,MS, <target_lang>", &values),
            "surveyA_MS_fra-FRA.tmx"
        );
        assert_eq!(tmx_file_name("plain", &values), "plain.tmx");
    }

    #[test]
    fn write_and_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let output_dir = dir.path().join("output");

        let path = write_tmx_file(&output_dir, "a_fra-FRA.tmx", "first").unwrap();
        assert_eq!(path, output_dir.join("a_fra-FRA.tmx"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first");

        write_tmx_file(&output_dir, "a_fra-FRA.tmx", "second").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn write_error() {
        let dir = tempfile::tempdir().unwrap();
        // a file where the output directory should be
        let blocker = dir.path().join("output");
        std::fs::write(&blocker, "").unwrap();

        assert!(matches!(
            write_tmx_file(&blocker, "x.tmx", "tmx"),
            Err(ConvertError::Write { .. })
        ));
    }
}
