// SPDX-License-Identifier: MIT
//!
//! Build TMX 1.4 translation memory documents
//!
//! Documents are indented with two spaces and use CRLF line breaks between
//! elements. Segment text itself is never re-wrapped.
//!

mod markup;

pub use markup::{normalize_segment, strip_markup};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

/// TMX version written in the root element
pub const TMX_VERSION: &str = "1.4";

/// Original translation memory format marker (`o-tmf` header attribute)
pub const ORIGINAL_TM_FORMAT: &str = "omt";

const NEWLINE: &str = "\r\n";
const INDENT: &str = "  ";

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("can not write TMX: {0}")]
    Xml(String),
    #[error("TMX output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// TMX document builder for one language pair
pub struct TmxBuilder<'a> {
    source_lang: &'a str,
    target_lang: &'a str,
    remove_markup: bool,
    creation_tool: &'a str,
    creation_tool_version: &'a str,
}

impl<'a> TmxBuilder<'a> {
    /// `source_lang` and `target_lang` are canonical (BCP47) tags
    pub fn new(source_lang: &'a str, target_lang: &'a str) -> Self {
        Self {
            source_lang,
            target_lang,
            remove_markup: false,
            creation_tool: env!("CARGO_PKG_NAME"),
            creation_tool_version: env!("CARGO_PKG_VERSION"),
        }
    }

    /// Strip inline markup from segments
    pub fn remove_markup(mut self, remove_markup: bool) -> Self {
        self.remove_markup = remove_markup;
        self
    }

    /// Tool identity written in the header
    pub fn creation_tool(mut self, name: &'a str, version: &'a str) -> Self {
        self.creation_tool = name;
        self.creation_tool_version = version;
        self
    }

    /// Serialize segment pairs, one `<tu>` per pair in iteration order
    pub fn build<I, S>(&self, pairs: I) -> Result<String>
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        let mut w = IndentWriter::new();

        w.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        w.newline(0)?;
        let mut root = BytesStart::new("tmx");
        root.push_attribute(("version", TMX_VERSION));
        w.event(Event::Start(root))?;

        w.newline(1)?;
        let mut header = BytesStart::new("header");
        header.push_attribute(("creationtool", self.creation_tool));
        header.push_attribute(("creationtoolversion", self.creation_tool_version));
        header.push_attribute(("segtype", "paragraph"));
        header.push_attribute(("adminlang", "en"));
        header.push_attribute(("datatype", "HTML"));
        header.push_attribute(("srclang", self.source_lang));
        header.push_attribute(("o-tmf", ORIGINAL_TM_FORMAT));
        w.event(Event::Empty(header))?;

        w.newline(1)?;
        w.event(Event::Start(BytesStart::new("body")))?;

        let mut units = 0usize;
        for (source, target) in pairs {
            w.newline(2)?;
            w.event(Event::Start(BytesStart::new("tu")))?;
            self.write_tuv(&mut w, self.source_lang, source.as_ref())?;
            self.write_tuv(&mut w, self.target_lang, target.as_ref())?;
            w.newline(2)?;
            w.event(Event::End(BytesEnd::new("tu")))?;
            units += 1;
        }

        w.newline(1)?;
        w.event(Event::End(BytesEnd::new("body")))?;
        w.newline(0)?;
        w.event(Event::End(BytesEnd::new("tmx")))?;

        log::trace!(
            "Built TMX {} -> {} with {} units",
            self.source_lang,
            self.target_lang,
            units
        );
        w.into_string()
    }

    // <tuv xml:lang="..."><seg>...</seg></tuv>
    fn write_tuv(&self, w: &mut IndentWriter, lang: &str, text: &str) -> Result<()> {
        w.newline(3)?;
        let mut tuv = BytesStart::new("tuv");
        tuv.push_attribute(("xml:lang", lang));
        w.event(Event::Start(tuv))?;

        w.newline(4)?;
        w.event(Event::Start(BytesStart::new("seg")))?;
        let seg = normalize_segment(text, self.remove_markup);
        w.event(Event::Text(BytesText::new(&seg)))?;
        w.event(Event::End(BytesEnd::new("seg")))?;

        w.newline(3)?;
        w.event(Event::End(BytesEnd::new("tuv")))
    }
}

/// quick-xml writer with explicit CRLF indentation between elements
struct IndentWriter {
    xml: quick_xml::Writer<Vec<u8>>,
}

impl IndentWriter {
    fn new() -> Self {
        Self {
            xml: quick_xml::Writer::new(Vec::new()),
        }
    }

    fn event(&mut self, event: Event<'_>) -> Result<()> {
        self.xml
            .write_event(event)
            .map_err(|e| Error::Xml(e.to_string()))
    }

    fn newline(&mut self, depth: usize) -> Result<()> {
        let whitespace = format!("{}{}", NEWLINE, INDENT.repeat(depth));
        self.event(Event::Text(BytesText::from_escaped(whitespace)))
    }

    fn into_string(self) -> Result<String> {
        Ok(String::from_utf8(self.xml.into_inner())?)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use quick_xml::events::Event;

    /// (tu count, languages of every tuv in document order)
    fn scan(xml: &str) -> (usize, Vec<String>) {
        let mut reader = quick_xml::Reader::from_str(xml);
        let mut units = 0;
        let mut langs = Vec::new();
        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) if e.name().as_ref() == b"tu" => units += 1,
                Event::Start(e) if e.name().as_ref() == b"tuv" => {
                    let attr = e.try_get_attribute("xml:lang").unwrap().unwrap();
                    langs.push(String::from_utf8_lossy(&attr.value).into_owned());
                }
                Event::Eof => break,
                _ => (),
            }
        }
        (units, langs)
    }

    #[test]
    fn document_layout() {
        let xml = TmxBuilder::new("en-US", "fr-FR")
            .creation_tool("xls2tmx", "0.2.0")
            .build([("Hello", "Bonjour")])
            .unwrap();

        let expected = [
            r#"<?xml version="1.0" encoding="UTF-8"?>"#,
            r#"<tmx version="1.4">"#,
            r#"  <header creationtool="xls2tmx" creationtoolversion="0.2.0" segtype="paragraph" adminlang="en" datatype="HTML" srclang="en-US" o-tmf="omt"/>"#,
            r#"  <body>"#,
            r#"    <tu>"#,
            r#"      <tuv xml:lang="en-US">"#,
            r#"        <seg>Hello</seg>"#,
            r#"      </tuv>"#,
            r#"      <tuv xml:lang="fr-FR">"#,
            r#"        <seg>Bonjour</seg>"#,
            r#"      </tuv>"#,
            r#"    </tu>"#,
            r#"  </body>"#,
            r#"</tmx>"#,
        ]
        .join("\r\n");
        assert_eq!(xml, expected);
    }

    #[test]
    fn round_trip_units_and_languages() {
        let pairs = vec![
            ("One".to_string(), "Un".to_string()),
            ("Two".to_string(), "Deux".to_string()),
            ("Three".to_string(), "Trois".to_string()),
        ];
        let xml = TmxBuilder::new("en-US", "fr-FR").build(pairs).unwrap();

        let (units, langs) = scan(&xml);
        assert_eq!(units, 3);
        assert_eq!(langs.len(), 6);
        for tuv in langs.chunks(2) {
            assert_eq!(tuv[0], "en-US");
            assert_eq!(tuv[1], "fr-FR");
        }
    }

    #[test]
    fn empty_body() {
        let xml = TmxBuilder::new("en-US", "de-DE")
            .build(Vec::<(&str, &str)>::new())
            .unwrap();
        assert!(xml.contains("<body>\r\n  </body>"));
        assert_eq!(scan(&xml).0, 0);
    }

    #[test]
    fn segments_are_escaped_and_trimmed() {
        let xml = TmxBuilder::new("en-US", "fr-FR")
            .build([("  Fish & <b>chips</b> \n", "Poisson & frites")])
            .unwrap();
        assert!(xml.contains("<seg>Fish &amp; &lt;b"));
        assert!(!xml.contains("<b>"));
        assert!(xml.contains("<seg>Poisson &amp; frites</seg>"));
        // escaped markup must still parse
        assert_eq!(scan(&xml).0, 1);
    }

    #[test]
    fn segments_without_markup() {
        let xml = TmxBuilder::new("en-US", "fr-FR")
            .remove_markup(true)
            .build([("<p>Two\r\nlines</p>", "<p>Deux  lignes</p>")])
            .unwrap();
        assert!(xml.contains("<seg>Two lines</seg>"));
        assert!(xml.contains("<seg>Deux lignes</seg>"));
    }

    #[test]
    fn stripped_entities_are_escaped_once() {
        let xml = TmxBuilder::new("en-US", "fr-FR")
            .remove_markup(true)
            .build([("<p>Fish &amp; chips&nbsp;today</p>", "x < 5")])
            .unwrap();
        assert!(xml.contains("<seg>Fish &amp; chips today</seg>"));
        assert!(!xml.contains("&amp;amp;"));
        assert!(xml.contains("<seg>x &lt; 5</seg>"));
    }

    #[test]
    fn line_breaks_inside_segments_are_kept() {
        let xml = TmxBuilder::new("en-US", "fr-FR")
            .build([("first\nsecond", "premier\nsecond")])
            .unwrap();
        assert!(xml.contains("<seg>first\nsecond</seg>"));
    }
}
