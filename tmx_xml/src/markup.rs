// SPDX-License-Identifier: MIT
//!
//! Segment text clean-up before it goes into `<seg>`
//!

use once_cell::sync::Lazy;
use quick_xml::events::{BytesRef, Event};
use regex::Regex;

static WHITESPACE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

/// `&` followed by this is a character or entity reference
static REFERENCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:#[0-9]+|#[xX][0-9a-fA-F]+|[A-Za-z][A-Za-z0-9]*);")
        .expect("Invalid reference regex")
});

/// Keep the visible text of inline HTML/XML markup.
///
/// Tags and comments are dropped, character and HTML entity references are
/// decoded, and whitespace runs collapse to one space. A `<` that does not
/// open a tag is ordinary text. Stripping repeats until the text stops
/// shrinking, so escaped markup such as `&lt;b&gt;` goes too and normalizing
/// the result again gives the same string.
pub fn strip_markup(text: &str) -> String {
    let mut current = collapse_whitespace(text);
    loop {
        let next = collapse_whitespace(&visible_text(&current));
        if next.len() >= current.len() {
            return current;
        }
        current = next;
    }
}

/// Segment text as emitted: always trimmed, markup stripped on request
pub fn normalize_segment(text: &str, remove_markup: bool) -> String {
    if remove_markup {
        strip_markup(text)
    } else {
        text.trim().to_string()
    }
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text, " ").trim().to_string()
}

/// Text and CDATA content of one markup pass, `text` itself when unparsable
fn visible_text(text: &str) -> String {
    let escaped = escape_bare_markup(text);
    let mut reader = quick_xml::Reader::from_str(&escaped);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    let mut visible = String::with_capacity(text.len());
    loop {
        match reader.read_event() {
            Ok(Event::Text(t)) => match t.decode() {
                Ok(s) => visible.push_str(&s),
                Err(_) => return text.to_string(),
            },
            Ok(Event::CData(c)) => match c.decode() {
                Ok(s) => visible.push_str(&s),
                Err(_) => return text.to_string(),
            },
            Ok(Event::GeneralRef(r)) => match resolve_reference(&r) {
                Some(s) => visible.push_str(&s),
                None => return text.to_string(),
            },
            Ok(Event::Eof) => return visible,
            Ok(_) => (),
            Err(err) => {
                log::trace!("Markup not parsed ({}), keeping {:?}", err, text);
                return text.to_string();
            }
        }
    }
}

/// Escape `<` and `&` that are plain text, so the reader sees them as such
fn escape_bare_markup(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for (i, ch) in text.char_indices() {
        let rest = &text[i + ch.len_utf8()..];
        match ch {
            '<' if !starts_tag(rest) => escaped.push_str("&lt;"),
            '&' if !REFERENCE_REGEX.is_match(rest) => escaped.push_str("&amp;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

// <p, </p, <!--, <?xml ... closed by a later '>'
fn starts_tag(rest: &str) -> bool {
    let opens = matches!(
        rest.chars().next(),
        Some(c) if c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?')
    );
    opens && rest.contains('>')
}

/// Decoded reference, unknown entity names are kept as written
fn resolve_reference(reference: &BytesRef<'_>) -> Option<String> {
    if let Ok(Some(ch)) = reference.resolve_char_ref() {
        return Some(ch.to_string());
    }
    let name = reference.decode().ok()?;
    Some(match quick_xml::escape::resolve_html5_entity(&name) {
        Some(value) => value.to_string(),
        None => format!("&{};", name),
    })
}
