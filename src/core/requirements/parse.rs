//! Requirements file tokenizer
//!
//! Physical lines are first grouped into logical lines (a trailing `\`
//! continues a line, a comment line always ends one). Each group then runs
//! through a two-state machine: the first physical line must be an entry
//! header (`name[extras]==version[; marker] [--hash=...] [# comment]`), every
//! following line a continuation holding `--hash=` tokens. Groups that are
//! not entries, or that look like entries but are malformed, pass through
//! as opaque text.

use super::{Entry, Line};
use crate::core::digest::Digest;
use crate::core::spec::is_valid_name;

/// Physical lines forming one logical line
struct Group<'a> {
    /// 1-based number of the first physical line
    line_number: usize,
    lines: Vec<&'a str>,
}

/// Pieces of an entry header line
struct Header {
    indent: String,
    name: String,
    extras: Option<String>,
    version: String,
    marker_separator: String,
    marker: Option<String>,
    digests: Vec<Digest>,
    comment: Option<String>,
}

/// Pieces of a continuation line
struct Continuation {
    indent: String,
    digests: Vec<Digest>,
    comment: Option<String>,
}

enum State {
    Header,
    Continuation(Entry),
}

/// Split requirements text into opaque lines and entries
pub(crate) fn tokenize(text: &str) -> Vec<Line> {
    let mut out: Vec<Line> = Vec::new();

    for group in logical_lines(text) {
        match parse_entry(&group.lines) {
            Ok(Some(entry)) => out.push(Line::Entry(entry)),
            Ok(None) => {
                if let Some(Line::Entry(previous)) = out.last_mut() {
                    if absorb_orphan_hashes(previous, &group.lines) {
                        continue;
                    }
                }
                out.push(Line::Opaque(group.lines.concat()));
            }
            Err(reason) => {
                tracing::warn!(
                    "Line {}: {reason}; leaving it untouched",
                    group.line_number
                );
                out.push(Line::Opaque(group.lines.concat()));
            }
        }
    }

    out
}

fn logical_lines(text: &str) -> Vec<Group<'_>> {
    let mut groups = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut line_number = 1;

    for (index, line) in text.split_inclusive('\n').enumerate() {
        if current.is_empty() {
            line_number = index + 1;
        }
        current.push(line);

        let content = strip_terminator(line);
        let is_comment = content.trim_start().starts_with('#');
        if is_comment || !content.ends_with('\\') {
            groups.push(Group {
                line_number,
                lines: std::mem::take(&mut current),
            });
        }
    }

    if !current.is_empty() {
        groups.push(Group {
            line_number,
            lines: current,
        });
    }

    groups
}

/// Run the header/continuation state machine over one logical line
///
/// `Ok(None)` means the group is not an entry at all; `Err` means it starts
/// like an entry but cannot be understood.
fn parse_entry(lines: &[&str]) -> Result<Option<Entry>, String> {
    let last = lines.len().saturating_sub(1);
    let mut state = State::Header;

    for (index, line) in lines.iter().enumerate() {
        let (body, _) = split_continuation(strip_terminator(line));

        state = match state {
            State::Header => {
                let Some(header) = parse_header(body)? else {
                    return Ok(None);
                };
                if header.comment.is_some() && index != last {
                    return Err("inline comment before a line continuation".to_string());
                }
                State::Continuation(header.into_entry(newline_of(line)))
            }
            State::Continuation(mut entry) if index == last && body.trim().is_empty() => {
                entry.trailer = (*line).to_string();
                State::Continuation(entry)
            }
            State::Continuation(mut entry) => {
                let continuation = parse_continuation(body)?;
                if continuation.comment.is_some() && index != last {
                    return Err("inline comment before a line continuation".to_string());
                }
                if !continuation.digests.is_empty() && entry.hash_indent.is_none() {
                    entry.hash_indent = Some(continuation.indent);
                }
                entry.digests.extend(continuation.digests);
                if continuation.comment.is_some() {
                    entry.comment = continuation.comment;
                }
                State::Continuation(entry)
            }
        };
    }

    match state {
        State::Header => Ok(None),
        State::Continuation(mut entry) => {
            entry.raw = lines.concat();
            Ok(Some(entry))
        }
    }
}

/// Attach indented `--hash` lines that follow an entry whose header lacks
/// the trailing `\`
fn absorb_orphan_hashes(entry: &mut Entry, lines: &[&str]) -> bool {
    if entry.comment.is_some() || !entry.trailer.is_empty() || !entry.is_terminated() {
        return false;
    }

    let mut digests = Vec::new();
    let mut indent = None;
    for line in lines {
        let (body, _) = split_continuation(strip_terminator(line));
        if !body.starts_with(char::is_whitespace) {
            return false;
        }
        match parse_continuation(body) {
            Ok(continuation) if continuation.comment.is_none() && !continuation.digests.is_empty() => {
                indent.get_or_insert(continuation.indent);
                digests.extend(continuation.digests);
            }
            _ => return false,
        }
    }

    entry.raw.push_str(&lines.concat());
    entry.digests.extend(digests);
    if entry.hash_indent.is_none() {
        entry.hash_indent = indent;
    }
    true
}

fn parse_header(body: &str) -> Result<Option<Header>, String> {
    let rest = body.trim_start();
    let indent = &body[..body.len() - rest.len()];

    let name_len = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        .unwrap_or(rest.len());
    let name = &rest[..name_len];
    if !is_valid_name(name) {
        return Ok(None);
    }

    let mut rest = rest[name_len..].trim_start();
    let mut extras = None;
    if rest.starts_with('[') {
        let Some(end) = rest.find(']') else {
            return Ok(None);
        };
        extras = Some(rest[..=end].to_string());
        rest = rest[end + 1..].trim_start();
    }

    let Some(after_operator) = rest.strip_prefix("==") else {
        return Ok(None);
    };
    if after_operator.starts_with('=') {
        return Ok(None);
    }

    let after_operator = after_operator.trim_start();
    let version_len = after_operator
        .find(|c: char| c.is_whitespace() || c == ';' || c == '#')
        .unwrap_or(after_operator.len());
    let version = &after_operator[..version_len];
    if version.is_empty() {
        return Err(format!("missing version after '{name}=='"));
    }

    let (tail, comment) = split_comment(&after_operator[version_len..]);
    let (marker_separator, marker, hash_part) = split_marker(tail)?;
    let digests = parse_hash_tokens(hash_part)?;

    Ok(Some(Header {
        indent: indent.to_string(),
        name: name.to_string(),
        extras,
        version: version.to_string(),
        marker_separator,
        marker,
        digests,
        comment: comment.map(str::to_string),
    }))
}

fn parse_continuation(body: &str) -> Result<Continuation, String> {
    let (tokens, comment) = split_comment(body);
    let trimmed = tokens.trim_start();
    let indent = &tokens[..tokens.len() - trimmed.len()];
    let digests = parse_hash_tokens(trimmed)?;

    if digests.is_empty() && comment.is_none() {
        return Err("continuation line without --hash".to_string());
    }

    Ok(Continuation {
        indent: indent.to_string(),
        digests,
        comment: comment.map(str::to_string),
    })
}

/// Split `; marker` off the text following the version
fn split_marker(tail: &str) -> Result<(String, Option<String>, &str), String> {
    let trimmed = tail.trim_start();
    let Some(after_semicolon) = trimmed.strip_prefix(';') else {
        return Ok(("; ".to_string(), None, tail));
    };

    let before = &tail[..tail.len() - trimmed.len()];
    let marker_start = after_semicolon.trim_start();
    let after = &after_semicolon[..after_semicolon.len() - marker_start.len()];

    let end = marker_start.find("--hash").unwrap_or(marker_start.len());
    let marker = marker_start[..end].trim_end();
    if marker.is_empty() {
        return Err("empty environment marker".to_string());
    }

    Ok((
        format!("{before};{after}"),
        Some(marker.to_string()),
        &marker_start[end..],
    ))
}

fn parse_hash_tokens(text: &str) -> Result<Vec<Digest>, String> {
    text.split_whitespace()
        .map(|token| {
            let value = token
                .strip_prefix("--hash=")
                .ok_or_else(|| format!("unexpected token '{token}'"))?;
            Digest::parse(value).ok_or_else(|| format!("malformed hash '{token}'"))
        })
        .collect()
}

/// Split a trailing `# comment` (with its leading whitespace) off `text`
fn split_comment(text: &str) -> (&str, Option<&str>) {
    let mut previous_is_space = true;
    for (index, c) in text.char_indices() {
        if c == '#' && previous_is_space {
            let start = text[..index].trim_end().len();
            return (&text[..start], Some(&text[start..]));
        }
        previous_is_space = c.is_whitespace();
    }
    (text, None)
}

fn strip_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

fn split_continuation(content: &str) -> (&str, bool) {
    match content.strip_suffix('\\') {
        Some(body) => (body, true),
        None => (content, false),
    }
}

fn newline_of(line: &str) -> &'static str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

impl Header {
    fn into_entry(self, newline: &'static str) -> Entry {
        Entry {
            raw: String::new(),
            indent: self.indent,
            name: self.name,
            extras: self.extras,
            version: self.version,
            marker: self.marker,
            marker_separator: self.marker_separator,
            comment: self.comment,
            digests: self.digests,
            hash_indent: None,
            newline,
            trailer: String::new(),
            dirty: false,
        }
    }
}
