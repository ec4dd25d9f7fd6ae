//! Source formatting that survives a re-serialization: indent width, line endings, trailing newline, BOM.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

const BOM: char = '\u{feff}';
const DEFAULT_INDENT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Indent {
    Spaces(usize),
    Tab,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct JsonStyle {
    pub(crate) indent: Indent,
    pub(crate) crlf: bool,
    pub(crate) trailing_newline: bool,
    pub(crate) bom: bool,
}

impl JsonStyle {
    pub(crate) fn detect(source: &str) -> Self {
        let bom = source.starts_with(BOM);
        let body = source.strip_prefix(BOM).unwrap_or(source);

        let indent = body
            .lines()
            .skip(1)
            .find_map(|line| {
                if line.starts_with('\t') {
                    return Some(Indent::Tab);
                }
                let spaces = line.len() - line.trim_start_matches(' ').len();
                (spaces > 0 && spaces < line.len()).then_some(Indent::Spaces(spaces))
            })
            .unwrap_or(Indent::Spaces(DEFAULT_INDENT));

        Self {
            indent,
            crlf: body.contains("\r\n"),
            trailing_newline: body.ends_with('\n'),
            bom,
        }
    }

    /// Strip the byte-order mark, if any, so the body can be parsed.
    pub(crate) fn body(source: &str) -> &str {
        source.strip_prefix(BOM).unwrap_or(source)
    }

    /// One level of indentation.
    pub(crate) fn unit(&self) -> String {
        match self.indent {
            Indent::Tab => "\t".to_string(),
            Indent::Spaces(n) => " ".repeat(n),
        }
    }

    pub(crate) fn newline(&self) -> &'static str {
        if self.crlf { "\r\n" } else { "\n" }
    }

    pub(crate) fn render(&self, doc: &Map<String, Value>) -> Result<String, serde_json::Error> {
        let mut out = self.pretty(doc)?;
        if self.trailing_newline {
            out.push('\n');
        }
        if self.crlf {
            out = out.replace('\n', "\r\n");
        }
        if self.bom {
            out.insert(0, BOM);
        }
        Ok(out)
    }

    /// Render `value` for placement after a member key whose line starts with `base`.
    pub(crate) fn render_nested<T: Serialize + ?Sized>(
        &self,
        value: &T,
        base: &str,
    ) -> Result<String, serde_json::Error> {
        let text = self.pretty(value)?;
        // Serialized strings escape their newlines, so every '\n' is a line break.
        Ok(text.replace('\n', &format!("{}{base}", self.newline())))
    }

    fn pretty<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, serde_json::Error> {
        let unit = self.unit();
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(unit.as_bytes());
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        value.serialize(&mut ser)?;

        // serde_json only ever emits valid UTF-8.
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
