//! In-place text edits: only the add-on targets are rendered, every other byte of the source is
//! kept as it was.

use crate::projects::{PROJECTS_KEY, TARGET_MAP_KEYS};
use crate::style::JsonStyle;
use serde_json::{Map, Value};
use std::ops::Range;

/// One `"key": value` member of an object, as byte offsets into the source.
#[derive(Debug, Clone)]
struct Member {
    key: String,
    key_start: usize,
    value: Range<usize>,
}

#[derive(Debug, Clone)]
struct ObjectSpan {
    open: usize,
    close: usize,
    members: Vec<Member>,
}

impl ObjectSpan {
    /// Last member named `key`; duplicate keys resolve the way the parser resolves them.
    fn get(&self, key: &str) -> Option<&Member> {
        self.members.iter().rev().find(|m| m.key == key)
    }
}

#[derive(Debug)]
struct Edit {
    at: Range<usize>,
    text: String,
}

/// Source with `targets` set on `project`, or `None` when the source cannot be edited in place.
///
/// Expects `source` to be valid JSON whose project is an object.
pub(crate) fn set_targets(
    source: &str,
    style: &JsonStyle,
    project: &str,
    targets: &[(&str, Value)],
) -> Option<String> {
    let body_start = source.len() - JsonStyle::body(source).len();
    let root = object_at(source, body_start)?;
    let projects = object_at(source, root.get(PROJECTS_KEY)?.value.start)?;
    let project = object_at(source, projects.get(project)?.value.start)?;

    let existing = TARGET_MAP_KEYS
        .iter()
        .find_map(|key| object_at(source, project.get(key)?.value.start));

    let edits = match existing {
        Some(map) => {
            let indent = member_indent(source, &map, style);
            let mut edits = Vec::new();
            let mut added = Vec::new();
            for (name, value) in targets {
                match map.get(name) {
                    Some(member) => {
                        let base = line_indent(source, member.key_start).unwrap_or(indent.as_str());
                        edits.push(Edit {
                            at: member.value.clone(),
                            text: style.render_nested(value, base).ok()?,
                        });
                    }
                    None => added.push(member_text(style, name, value, &indent)?),
                }
            }
            if !added.is_empty() {
                edits.push(append_members(source, &map, style, &indent, &added));
            }
            edits
        }
        None => {
            let key = TARGET_MAP_KEYS[0];
            let map: Map<String, Value> = targets
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect();
            let map = Value::Object(map);
            let indent = member_indent(source, &project, style);
            match project.get(key) {
                // A `null` target map is replaced in place.
                Some(member) => {
                    let base = line_indent(source, member.key_start).unwrap_or(indent.as_str());
                    vec![Edit {
                        at: member.value.clone(),
                        text: style.render_nested(&map, base).ok()?,
                    }]
                }
                None => {
                    let text = member_text(style, key, &map, &indent)?;
                    vec![append_members(source, &project, style, &indent, &[text])]
                }
            }
        }
    };

    Some(apply(source, edits))
}

fn member_text(style: &JsonStyle, name: &str, value: &Value, indent: &str) -> Option<String> {
    let key = serde_json::to_string(name).ok()?;
    let value = style.render_nested(value, indent).ok()?;
    Some(format!("{key}: {value}"))
}

/// Insert already-rendered members after the last member of `obj`.
fn append_members(
    source: &str,
    obj: &ObjectSpan,
    style: &JsonStyle,
    indent: &str,
    members: &[String],
) -> Edit {
    let nl = style.newline();
    match obj.members.last() {
        Some(last) => {
            let text = members
                .iter()
                .map(|m| format!(",{nl}{indent}{m}"))
                .collect::<String>();
            Edit {
                at: last.value.end..last.value.end,
                text,
            }
        }
        None => {
            let joined = members.join(&format!(",{nl}{indent}"));
            let close_indent = leading_ws(source, obj.open);
            Edit {
                at: obj.open + 1..obj.close,
                text: format!("{nl}{indent}{joined}{nl}{close_indent}"),
            }
        }
    }
}

/// Indent used by the members of `obj`, or one level below the line that opens it.
fn member_indent(source: &str, obj: &ObjectSpan, style: &JsonStyle) -> String {
    obj.members
        .first()
        .and_then(|m| line_indent(source, m.key_start))
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}{}", leading_ws(source, obj.open), style.unit()))
}

/// Whitespace before `at` on its line, when `at` is the first token on that line.
fn line_indent(source: &str, at: usize) -> Option<&str> {
    let lead = &source[line_start(source, at)..at];
    lead.bytes().all(|b| b == b' ' || b == b'\t').then_some(lead)
}

/// Leading whitespace of the line holding `at`.
fn leading_ws(source: &str, at: usize) -> &str {
    let line = &source[line_start(source, at)..at];
    let len = line.len() - line.trim_start_matches([' ', '\t']).len();
    &line[..len]
}

fn line_start(source: &str, at: usize) -> usize {
    source[..at].rfind('\n').map_or(0, |i| i + 1)
}

fn apply(source: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by_key(|e| std::cmp::Reverse(e.at.start));
    let mut out = source.to_string();
    for edit in edits {
        out.replace_range(edit.at, &edit.text);
    }
    out
}

fn object_at(source: &str, start: usize) -> Option<ObjectSpan> {
    let mut s = Scanner { source, pos: start };
    s.skip_ws();
    let open = s.pos;
    s.expect(b'{')?;

    let mut members = Vec::new();
    s.skip_ws();
    if s.peek()? == b'}' {
        return Some(ObjectSpan {
            open,
            close: s.pos,
            members,
        });
    }
    loop {
        let key = s.string()?;
        let key_start = key.start;
        let key: String = serde_json::from_str(&source[key]).ok()?;
        s.expect(b':')?;
        let value = s.value()?;
        members.push(Member {
            key,
            key_start,
            value,
        });

        s.skip_ws();
        match s.peek()? {
            b',' => s.pos += 1,
            b'}' => {
                return Some(ObjectSpan {
                    open,
                    close: s.pos,
                    members,
                });
            }
            _ => return None,
        }
    }
}

struct Scanner<'a> {
    source: &'a str,
    pos: usize,
}

impl Scanner<'_> {
    fn peek(&self) -> Option<u8> {
        self.source.as_bytes().get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, byte: u8) -> Option<()> {
        self.skip_ws();
        (self.peek()? == byte).then(|| self.pos += 1)
    }

    fn string(&mut self) -> Option<Range<usize>> {
        self.skip_ws();
        let start = self.pos;
        if self.peek()? != b'"' {
            return None;
        }
        self.pos += 1;
        loop {
            match self.peek()? {
                b'\\' => self.pos += 2,
                b'"' => {
                    self.pos += 1;
                    return Some(start..self.pos);
                }
                _ => self.pos += 1,
            }
        }
    }

    fn value(&mut self) -> Option<Range<usize>> {
        self.skip_ws();
        let start = self.pos;
        match self.peek()? {
            b'"' => {
                self.string()?;
            }
            b'{' | b'[' => {
                let mut depth = 0usize;
                loop {
                    match self.peek()? {
                        b'"' => {
                            self.string()?;
                            continue;
                        }
                        b'{' | b'[' => depth += 1,
                        b'}' | b']' => {
                            depth -= 1;
                            if depth == 0 {
                                self.pos += 1;
                                break;
                            }
                        }
                        _ => {}
                    }
                    self.pos += 1;
                }
            }
            _ => {
                while matches!(
                    self.peek(),
                    Some(b) if !matches!(b, b',' | b'}' | b']' | b' ' | b'\t' | b'\n' | b'\r')
                ) {
                    self.pos += 1;
                }
                if self.pos == start {
                    return None;
                }
            }
        }
        Some(start..self.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn targets() -> Vec<(&'static str, Value)> {
        vec![
            ("storybook", json!({ "builder": "s" })),
            ("build-storybook", json!({ "builder": "b" })),
        ]
    }

    fn splice(src: &str) -> String {
        set_targets(src, &JsonStyle::detect(src), "app", &targets()).expect("splice")
    }

    #[test]
    fn appends_after_the_last_target() {
        let src = "{\n  \"projects\": {\n    \"app\": {\n      \"architect\": {\n        \"build\": { \"x\": [1, 2] }\n      }\n    }\n  }\n}\n";
        assert_eq!(
            splice(src),
            "{\n  \"projects\": {\n    \"app\": {\n      \"architect\": {\n        \"build\": { \"x\": [1, 2] },\n        \"storybook\": {\n          \"builder\": \"s\"\n        },\n        \"build-storybook\": {\n          \"builder\": \"b\"\n        }\n      }\n    }\n  }\n}\n"
        );
    }

    #[test]
    fn fills_an_empty_target_map() {
        let src = "{\n  \"projects\": {\n    \"app\": {\n      \"architect\": {}\n    }\n  }\n}";
        assert_eq!(
            splice(src),
            "{\n  \"projects\": {\n    \"app\": {\n      \"architect\": {\n        \"storybook\": {\n          \"builder\": \"s\"\n        },\n        \"build-storybook\": {\n          \"builder\": \"b\"\n        }\n      }\n    }\n  }\n}"
        );
    }

    #[test]
    fn creates_architect_after_the_last_member() {
        let src = "{\n  \"projects\": {\n    \"app\": {\n      \"root\": \"\"\n    }\n  }\n}";
        let out = splice(src);
        assert!(out.contains("      \"root\": \"\",\n      \"architect\": {\n        \"storybook\": {"));
    }

    #[test]
    fn replaces_existing_target_value_only() {
        let src = "{\"projects\": {\"app\": {\"architect\": {\"storybook\": 1, \"build\": {}}}}}";
        let out = splice(src);
        assert!(out.starts_with("{\"projects\": {\"app\": {\"architect\": {\"storybook\": {"));
        assert!(out.contains("\"build\": {},"));
        let value: Value = serde_json::from_str(&out).expect("json");
        assert_eq!(value["projects"]["app"]["architect"]["storybook"]["builder"], "s");
    }

    #[test]
    fn escaped_quotes_and_brackets_in_strings_are_skipped() {
        let src = "{\"projects\": {\"lib\": {\"a\": \"}\\\"]\"}, \"app\": {\"architect\": null}}}";
        let out = splice(src);
        assert!(out.starts_with("{\"projects\": {\"lib\": {\"a\": \"}\\\"]\"}, \"app\": {\"architect\": {"));
    }

    #[test]
    fn missing_project_cannot_be_spliced() {
        let src = "{\"projects\": {}}";
        assert!(set_targets(src, &JsonStyle::detect(src), "app", &targets()).is_none());
    }
}
