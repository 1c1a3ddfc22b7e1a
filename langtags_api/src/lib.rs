// SPDX-License-Identifier: MIT
//!
//! cApps langtags service wrapper
//!
//! The service publishes one record per known language, giving its tag under
//! every naming scheme (`cApStAn`, `BCP47`, `OmegaT`, ...). The table is loaded
//! once and only read afterwards.
//!

use std::collections::BTreeMap;

/// Default langtags service endpoint
pub const DEFAULT_LANGTAGS_URL: &str = "https://capps.capstan.be/langtags_json.php";

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("langtags request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("can not decode langtags table: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("can not read langtags file: {0}")]
    Io(#[from] std::io::Error),
    #[error("langtags table is empty")]
    Empty,
}

pub type Result<T> = std::result::Result<T, Error>;

/// Naming convention used for language labels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LangtagScheme {
    /// Three lowercase letters, hyphen, three uppercase letters, e.g. `eng-USA`
    Capstan,
    Bcp47,
}

impl LangtagScheme {
    /// Column name of this scheme in the langtags table
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Capstan => "cApStAn",
            Self::Bcp47 => "BCP47",
        }
    }
}

impl From<&str> for LangtagScheme {
    /// Anything other than `cApStAn` is taken as BCP47.
    fn from(name: &str) -> Self {
        match name {
            "cApStAn" => Self::Capstan,
            "BCP47" => Self::Bcp47,
            other => {
                log::warn!("Unknown langtag scheme {:?}, assuming BCP47", other);
                Self::Bcp47
            }
        }
    }
}

impl std::fmt::Display for LangtagScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire formats served by the langtags endpoint
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum LangtagPayload {
    /// `[{"cApStAn": "eng-USA", "BCP47": "en-US"}, ...]`
    Records(Vec<BTreeMap<String, serde_json::Value>>),
    /// `{"cApStAn": {"0": "eng-USA"}, "BCP47": {"0": "en-US"}}`
    Columns(BTreeMap<String, BTreeMap<String, serde_json::Value>>),
}

/// Language tag correspondence table
#[derive(Clone, Debug, Default)]
pub struct LangtagTable {
    rows: Vec<BTreeMap<String, String>>,
}

impl LangtagTable {
    /// Fetch the table from the langtags service
    pub async fn fetch(url: &str) -> Result<Self> {
        Self::fetch_with_client(&reqwest::Client::new(), url).await
    }

    /// Fetch the table using a preconfigured HTTP client
    pub async fn fetch_with_client(client: &reqwest::Client, url: &str) -> Result<Self> {
        log::debug!("Fetching langtags from {}", url);
        let resp = client.get(url).send().await?;

        // Returns error
        resp.error_for_status_ref()?;

        let body = resp.text().await?;
        let table = Self::from_json_str(&body)?;
        log::debug!("Fetched {} langtags records", table.len());
        Ok(table)
    }

    /// Read a local copy of the langtags JSON
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Decode langtags JSON, either record or column oriented
    pub fn from_json_str(json: &str) -> Result<Self> {
        let rows = match serde_json::from_str::<LangtagPayload>(json)? {
            LangtagPayload::Records(records) => records
                .into_iter()
                .map(|record| {
                    record
                        .into_iter()
                        .filter_map(|(scheme, value)| string_cell(value).map(|v| (scheme, v)))
                        .collect()
                })
                .collect(),
            LangtagPayload::Columns(columns) => {
                let mut by_index = BTreeMap::<RowIndex, BTreeMap<String, String>>::new();
                for (scheme, cells) in columns {
                    for (index, value) in cells {
                        if let Some(tag) = string_cell(value) {
                            by_index
                                .entry(RowIndex::from(index))
                                .or_default()
                                .insert(scheme.clone(), tag);
                        }
                    }
                }
                by_index.into_values().collect()
            }
        };

        let table = Self::from_rows(rows);
        if table.is_empty() {
            Err(Error::Empty)
        } else {
            Ok(table)
        }
    }

    pub fn from_rows(rows: Vec<BTreeMap<String, String>>) -> Self {
        let rows = rows.into_iter().filter(|row| !row.is_empty()).collect();
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether `tag` is a known value under `scheme`
    pub fn contains(&self, scheme: LangtagScheme, tag: &str) -> bool {
        self.rows
            .iter()
            .any(|row| row.get(scheme.as_str()).map(String::as_str) == Some(tag))
    }

    /// Map `tag` from one scheme to another using the first matching record
    pub fn correspondent_tag(
        &self,
        tag: &str,
        from: LangtagScheme,
        to: LangtagScheme,
    ) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.get(from.as_str()).map(String::as_str) == Some(tag))
            .and_then(|row| row.get(to.as_str()))
            .map(String::as_str)
    }

    /// Canonical BCP47 tag for a workbook language label.
    ///
    /// Labels under the BCP47 scheme are already canonical and returned as is.
    /// `None` means the label is unknown to the table.
    pub fn resolve(&self, label: &str, scheme: LangtagScheme) -> Option<String> {
        match scheme {
            LangtagScheme::Capstan => self
                .correspondent_tag(label, LangtagScheme::Capstan, LangtagScheme::Bcp47)
                .map(str::to_string),
            LangtagScheme::Bcp47 => Some(label.to_string()),
        }
    }
}

/// Row key of the column oriented format: numeric indices in numeric order,
/// any other keys after them
#[derive(PartialEq, Eq, PartialOrd, Ord)]
enum RowIndex {
    Number(usize),
    Name(String),
}

impl From<String> for RowIndex {
    fn from(index: String) -> Self {
        match index.parse() {
            Ok(n) => Self::Number(n),
            Err(_) => Self::Name(index),
        }
    }
}

fn string_cell(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const RECORDS: &str = r#"[
        {"cApStAn": "eng-USA", "BCP47": "en-US", "OmegaT": "EN-US"},
        {"cApStAn": "fra-FRA", "BCP47": "fr-FR", "OmegaT": "FR-FR"},
        {"cApStAn": "spa-ESP", "BCP47": null, "OmegaT": "ES-ES"}
    ]"#;

    #[test]
    fn decode_records() {
        let table = LangtagTable::from_json_str(RECORDS).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.correspondent_tag("fra-FRA", LangtagScheme::Capstan, LangtagScheme::Bcp47),
            Some("fr-FR")
        );
        assert!(table.contains(LangtagScheme::Bcp47, "en-US"));
        assert!(!table.contains(LangtagScheme::Bcp47, "es-ES"));
    }

    #[test]
    fn decode_columns() {
        let json = r#"{
            "cApStAn": {"0": "eng-USA", "1": "deu-DEU"},
            "BCP47": {"0": "en-US", "1": "de-DE"}
        }"#;
        let table = LangtagTable::from_json_str(json).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.resolve("deu-DEU", LangtagScheme::Capstan).as_deref(),
            Some("de-DE")
        );
    }

    #[test]
    fn column_rows_in_index_order() {
        // "10" must not come before "2" when picking the first match
        let json = r#"{
            "cApStAn": {"10": "por-PRT", "2": "por-PRT", "x": "por-PRT"},
            "BCP47": {"10": "pt", "2": "pt-PT", "x": "pt-x"}
        }"#;
        let table = LangtagTable::from_json_str(json).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.correspondent_tag("por-PRT", LangtagScheme::Capstan, LangtagScheme::Bcp47),
            Some("pt-PT")
        );
    }

    #[test]
    fn empty_table_is_error() {
        assert!(matches!(
            LangtagTable::from_json_str("[]"),
            Err(Error::Empty)
        ));
        assert!(matches!(
            LangtagTable::from_json_str("\"nope\""),
            Err(Error::Decode(_))
        ));
    }

    #[test]
    fn resolve_capstan_labels() {
        let table = LangtagTable::from_json_str(RECORDS).unwrap();
        assert_eq!(
            table.resolve("eng-USA", LangtagScheme::Capstan).as_deref(),
            Some("en-US")
        );
        // known label without a BCP47 value
        assert_eq!(table.resolve("spa-ESP", LangtagScheme::Capstan), None);
        assert_eq!(table.resolve("xxx-XXX", LangtagScheme::Capstan), None);
    }

    #[test]
    fn bcp47_labels_pass_through() {
        let table = LangtagTable::from_json_str(RECORDS).unwrap();
        assert_eq!(
            table.resolve("pt-BR", LangtagScheme::Bcp47).as_deref(),
            Some("pt-BR")
        );
    }

    #[test]
    fn scheme_names() {
        assert_eq!(LangtagScheme::from("cApStAn"), LangtagScheme::Capstan);
        assert_eq!(LangtagScheme::from("BCP47"), LangtagScheme::Bcp47);
        assert_eq!(LangtagScheme::from("OmegaT"), LangtagScheme::Bcp47);
        assert_eq!(LangtagScheme::Capstan.to_string(), "cApStAn");
    }

    #[test]
    fn read_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("langtags.json");
        std::fs::write(&path, RECORDS).unwrap();

        let table = LangtagTable::from_file(&path).unwrap();
        assert_eq!(table.len(), 3);
        assert!(matches!(
            LangtagTable::from_file(dir.path().join("missing.json")),
            Err(Error::Io(_))
        ));
    }

    /// Serve a single HTTP response on a local port, returns the URL
    fn serve_once(status: &'static str, body: &'static str) -> String {
        use std::io::{Read, Write};
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf);
                let resp = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(resp.as_bytes());
            }
        });
        format!("http://{}/langtags_json.php", addr)
    }

    fn local_client() -> reqwest::Client {
        reqwest::Client::builder().no_proxy().build().unwrap()
    }

    #[tokio::test]
    async fn fetch_from_service() {
        let url = serve_once("200 OK", RECORDS);
        let table = LangtagTable::fetch_with_client(&local_client(), &url)
            .await
            .unwrap();
        assert_eq!(table.len(), 3);
    }

    #[tokio::test]
    async fn fetch_http_error() {
        let url = serve_once("500 Internal Server Error", "");
        let result = LangtagTable::fetch_with_client(&local_client(), &url).await;
        assert!(matches!(result, Err(Error::Request(_))));
    }
}
