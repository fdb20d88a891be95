//! Lexical ANSI syntax highlighting for JSON, YAML and XML.
//!
//! The highlighter never parses: it scans tokens, so it also colours documents
//! that would fail validation (e.g. an HTTP body cut short).

use crate::convert::Format;
use owo_colors::{OwoColorize, Style};

/// Which lexer to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Json,
    Yaml,
    Xml,
    Plain,
}

impl Language {
    /// Map a `Content-Type` header value (parameters ignored) to a lexer.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let mime = content_type.split(';').next().unwrap_or("").trim();
        match mime.to_ascii_lowercase().as_str() {
            "application/json" | "text/json" => Some(Language::Json),
            "application/xml" | "text/xml" => Some(Language::Xml),
            "application/yaml" | "application/x-yaml" | "text/yaml" => Some(Language::Yaml),
            "text/plain" => Some(Language::Plain),
            mime if mime.ends_with("+json") => Some(Language::Json),
            mime if mime.ends_with("+xml") => Some(Language::Xml),
            _ => None,
        }
    }

    /// Guess from content when no content type is known.
    pub fn detect(text: &str) -> Self {
        let trimmed = text.trim_start();
        if (trimmed.starts_with('{') || trimmed.starts_with('['))
            && serde_json::from_str::<serde_json::Value>(text).is_ok()
        {
            Language::Json
        } else if trimmed.starts_with('<') {
            Language::Xml
        } else {
            Language::Plain
        }
    }
}

impl From<Format> for Language {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => Language::Json,
            Format::Yaml => Language::Yaml,
            Format::Xml => Language::Xml,
        }
    }
}

/// Styles per token class.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub key: Style,
    pub string: Style,
    pub number: Style,
    pub literal: Style,
    pub punctuation: Style,
    pub tag: Style,
    pub attribute: Style,
    pub comment: Style,
}

impl Theme {
    /// Monokai-like palette on the 16 ANSI colours.
    pub fn monokai() -> Self {
        Self {
            key: Style::new().bright_blue(),
            string: Style::new().yellow(),
            number: Style::new().magenta(),
            literal: Style::new().bright_magenta(),
            punctuation: Style::new().white(),
            tag: Style::new().bright_red(),
            attribute: Style::new().green(),
            comment: Style::new().bright_black(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::monokai()
    }
}

pub fn highlight(text: &str, language: Language, theme: &Theme) -> String {
    match language {
        Language::Json => highlight_json(text, theme),
        Language::Yaml => highlight_yaml(text, theme),
        Language::Xml => highlight_xml(text, theme),
        Language::Plain => text.to_string(),
    }
}

fn paint(out: &mut String, token: &str, style: Style) {
    out.push_str(&token.style(style).to_string());
}

/// Push the character starting at byte `i` and return the index after it.
fn push_char(out: &mut String, text: &str, i: usize) -> usize {
    match text[i..].chars().next() {
        Some(ch) => {
            out.push(ch);
            i + ch.len_utf8()
        }
        None => text.len(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// JSON
// ─────────────────────────────────────────────────────────────────────────────

fn highlight_json(text: &str, theme: &Theme) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len() * 2);
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                let end = quoted_end(bytes, i, b'"');
                let is_key = next_significant(bytes, end) == Some(b':');
                paint(&mut out, &text[i..end], if is_key { theme.key } else { theme.string });
                i = end;
            }
            b'-' | b'0'..=b'9' => {
                let end = scan(bytes, i + 1, |b| {
                    b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-')
                });
                paint(&mut out, &text[i..end], theme.number);
                i = end;
            }
            b'{' | b'}' | b'[' | b']' | b',' | b':' => {
                paint(&mut out, &text[i..i + 1], theme.punctuation);
                i += 1;
            }
            _ => match ["true", "false", "null"]
                .iter()
                .find(|word| text[i..].starts_with(**word))
            {
                Some(word) => {
                    paint(&mut out, word, theme.literal);
                    i += word.len();
                }
                None => i = push_char(&mut out, text, i),
            },
        }
    }
    out
}

/// Index just past the closing quote of a string starting at `start`.
fn quoted_end(bytes: &[u8], start: usize, quote: u8) -> usize {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if quote == b'"' => i += 2,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

fn next_significant(bytes: &[u8], from: usize) -> Option<u8> {
    bytes[from.min(bytes.len())..]
        .iter()
        .copied()
        .find(|b| !b.is_ascii_whitespace())
}

fn scan(bytes: &[u8], from: usize, accept: impl Fn(u8) -> bool) -> usize {
    let mut i = from;
    while i < bytes.len() && accept(bytes[i]) {
        i += 1;
    }
    i
}

// ─────────────────────────────────────────────────────────────────────────────
// YAML
// ─────────────────────────────────────────────────────────────────────────────

fn highlight_yaml(text: &str, theme: &Theme) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    for (n, line) in text.split('\n').enumerate() {
        if n > 0 {
            out.push('\n');
        }
        highlight_yaml_line(line, theme, &mut out);
    }
    out
}

fn highlight_yaml_line(line: &str, theme: &Theme, out: &mut String) {
    let content = line.trim_start();
    out.push_str(&line[..line.len() - content.len()]);

    if content.starts_with('#') {
        paint(out, content, theme.comment);
        return;
    }
    if content == "---" || content == "..." {
        paint(out, content, theme.punctuation);
        return;
    }

    let mut rest = content;
    while let Some(after) = rest.strip_prefix("- ") {
        paint(out, "-", theme.punctuation);
        out.push(' ');
        rest = after;
    }
    if rest == "-" {
        paint(out, "-", theme.punctuation);
        return;
    }

    match split_key(rest) {
        Some((key, value)) => {
            paint(out, key, theme.key);
            paint(out, ":", theme.punctuation);
            highlight_yaml_scalar(value, theme, out);
        }
        None => highlight_yaml_scalar(rest, theme, out),
    }
}

/// Split `key: value` at the first unquoted `:` followed by space or end of line.
fn split_key(text: &str) -> Option<(&str, &str)> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            q @ (b'"' | b'\'') if i == 0 => i = quoted_end(bytes, i, q),
            b'#' if i == 0 || bytes[i - 1] == b' ' => return None,
            b':' if i > 0 && (i + 1 == bytes.len() || bytes[i + 1] == b' ') => {
                return Some((&text[..i], &text[i + 1..]));
            }
            _ => i += 1,
        }
    }
    None
}

fn highlight_yaml_scalar(text: &str, theme: &Theme, out: &mut String) {
    let (value, comment) = match text.find(" #") {
        Some(pos) if !text[..pos].contains(['"', '\'']) => (&text[..pos], Some(&text[pos..])),
        _ => (text, None),
    };

    let trimmed = value.trim();
    let lead = &value[..value.len() - value.trim_start().len()];
    let trail = &value[lead.len() + trimmed.len()..];
    out.push_str(lead);

    if !trimmed.is_empty() {
        let style = if trimmed.starts_with(['"', '\'']) {
            theme.string
        } else if matches!(trimmed, "true" | "false" | "null" | "~") {
            theme.literal
        } else if trimmed.parse::<f64>().is_ok() {
            theme.number
        } else if matches!(trimmed, "|" | ">" | "|-" | ">-" | "{}" | "[]") {
            theme.punctuation
        } else {
            theme.string
        };
        paint(out, trimmed, style);
    }
    out.push_str(trail);

    if let Some(comment) = comment {
        out.push(' ');
        paint(out, comment.trim_start(), theme.comment);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// XML
// ─────────────────────────────────────────────────────────────────────────────

fn highlight_xml(text: &str, theme: &Theme) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len() * 2);
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'<' {
            i = push_char(&mut out, text, i);
            continue;
        }
        let rest = &text[i..];
        if rest.starts_with("<!--") {
            let end = find_from(text, i, "-->").map_or(text.len(), |p| p + 3);
            paint(&mut out, &text[i..end], theme.comment);
            i = end;
        } else if rest.starts_with("<![CDATA[") {
            let end = find_from(text, i, "]]>").map_or(text.len(), |p| p + 3);
            paint(&mut out, &text[i..end], theme.string);
            i = end;
        } else if rest.starts_with("<?") || rest.starts_with("<!") {
            let end = find_from(text, i, ">").map_or(text.len(), |p| p + 1);
            paint(&mut out, &text[i..end], theme.comment);
            i = end;
        } else {
            i = highlight_tag(text, i, theme, &mut out);
        }
    }
    out
}

fn find_from(text: &str, from: usize, needle: &str) -> Option<usize> {
    text[from..].find(needle).map(|p| from + p)
}

/// Colour one `<name attr="v">` / `</name>` / `<name/>` tag starting at `start`.
fn highlight_tag(text: &str, start: usize, theme: &Theme, out: &mut String) -> usize {
    let bytes = text.as_bytes();
    let open = if text[start..].starts_with("</") { 2 } else { 1 };
    paint(out, &text[start..start + open], theme.punctuation);

    let mut i = start + open;
    let name_end = scan(bytes, i, is_name_byte);
    paint(out, &text[i..name_end], theme.tag);
    i = name_end;

    while i < bytes.len() {
        match bytes[i] {
            b'>' => {
                paint(out, ">", theme.punctuation);
                return i + 1;
            }
            b'/' if bytes.get(i + 1) == Some(&b'>') => {
                paint(out, "/>", theme.punctuation);
                return i + 2;
            }
            b'=' => {
                paint(out, "=", theme.punctuation);
                i += 1;
            }
            q @ (b'"' | b'\'') => {
                let end = quoted_end(bytes, i, q);
                paint(out, &text[i..end], theme.string);
                i = end;
            }
            b if is_name_byte(b) => {
                let end = scan(bytes, i, is_name_byte);
                paint(out, &text[i..end], theme.attribute);
                i = end;
            }
            _ => i = push_char(out, text, i),
        }
    }
    i
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.' | b':') || b >= 0x80
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip_ansi(text: &str) -> String {
        let mut out = String::new();
        let mut chars = text.chars();
        while let Some(ch) = chars.next() {
            if ch == '\u{1b}' {
                for next in chars.by_ref() {
                    if next == 'm' {
                        break;
                    }
                }
            } else {
                out.push(ch);
            }
        }
        out
    }

    #[test]
    fn json_highlighting_preserves_text() {
        let src = "{\n  \"name\": \"Zoë\",\n  \"n\": -1.5e3,\n  \"ok\": true,\n  \"x\": null\n}";
        let out = highlight(src, Language::Json, &Theme::default());
        assert_ne!(out, src);
        assert_eq!(strip_ansi(&out), src);
    }

    #[test]
    fn yaml_highlighting_preserves_text() {
        let src = "# header\nname: John # trailing\nitems:\n  - a: 1\n  - 'quoted: x'\nempty:\n";
        let out = highlight(src, Language::Yaml, &Theme::default());
        assert_eq!(strip_ansi(&out), src);
    }

    #[test]
    fn xml_highlighting_preserves_text() {
        let src = "<?xml version=\"1.0\"?>\n<!-- c -->\n<a id='1'><b>t &amp; u</b><c/></a>";
        let out = highlight(src, Language::Xml, &Theme::default());
        assert_eq!(strip_ansi(&out), src);
    }

    #[test]
    fn json_keys_and_values_get_different_styles() {
        let theme = Theme::default();
        let out = highlight(r#"{"k":"v"}"#, Language::Json, &theme);
        assert!(out.contains(&"\"k\"".style(theme.key).to_string()));
        assert!(out.contains(&"\"v\"".style(theme.string).to_string()));
    }

    #[test]
    fn yaml_key_split_ignores_colons_in_values() {
        assert_eq!(split_key("url: http://x"), Some(("url", " http://x")));
        assert_eq!(split_key("\"a: b\": c"), Some(("\"a: b\"", " c")));
        assert_eq!(split_key("plain"), None);
        assert_eq!(split_key("time 12:30"), None);
    }

    #[test]
    fn content_types_map_to_languages() {
        assert_eq!(
            Language::from_content_type("application/json; charset=utf-8"),
            Some(Language::Json)
        );
        assert_eq!(Language::from_content_type("text/xml"), Some(Language::Xml));
        assert_eq!(
            Language::from_content_type("application/problem+json"),
            Some(Language::Json)
        );
        assert_eq!(Language::from_content_type("image/png"), None);
    }

    #[test]
    fn detection_sniffs_content() {
        assert_eq!(Language::detect(" {\"a\": 1}"), Language::Json);
        assert_eq!(Language::detect("<html></html>"), Language::Xml);
        assert_eq!(Language::detect("{broken"), Language::Plain);
        assert_eq!(Language::detect("hello"), Language::Plain);
    }
}
