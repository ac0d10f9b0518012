//! Lexical scan of LilyPond sources for clef directives.
//!
//! The scanner recognizes `\require`, `\include`, `\pinclude` and
//! `\pincludeOnce` followed by a quoted string or a bare token on the same
//! line, and reports each occurrence with its source line and byte span.
//! It is a plain text scan: comments are not interpreted, no file I/O
//! happens here, and multiple directives on one line are all reported.

use std::ops::Range;

/// Directive keywords recognized in source documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    /// `\require` — a package requirement.
    Require,
    /// `\include` — file inclusion relative to the current file.
    Include,
    /// `\pinclude` — file inclusion, package-relative at runtime.
    PInclude,
    /// `\pincludeOnce` — like `\pinclude`, inlined at most once.
    PIncludeOnce,
}

impl DirectiveKind {
    /// The keyword as written after the backslash.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Require => "require",
            Self::Include => "include",
            Self::PInclude => "pinclude",
            Self::PIncludeOnce => "pincludeOnce",
        }
    }

    /// Whether the directive names a file to pull in, as opposed to a
    /// package requirement.
    pub fn is_include(self) -> bool {
        !matches!(self, Self::Require)
    }
}

/// One directive occurrence in a scanned document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub kind: DirectiveKind,
    /// The argument text, without surrounding quotes.
    pub reference: String,
    /// 1-based source line the directive starts on.
    pub line: usize,
    /// Byte range of the whole directive, backslash through argument end.
    pub span: Range<usize>,
}

// Longest first, so `\pincludeOnce` is not read as `\pinclude` plus junk.
const KEYWORDS: &[(&str, DirectiveKind)] = &[
    ("pincludeOnce", DirectiveKind::PIncludeOnce),
    ("pinclude", DirectiveKind::PInclude),
    ("include", DirectiveKind::Include),
    ("require", DirectiveKind::Require),
];

/// Scan document text for directives, in source order.
pub fn scan(source: &str) -> Vec<Directive> {
    let mut directives = Vec::new();
    let mut line_start = 0;
    for (index, line) in source.split_inclusive('\n').enumerate() {
        scan_line(line, line_start, index + 1, &mut directives);
        line_start += line.len();
    }
    directives
}

fn scan_line(line: &str, line_start: usize, line_no: usize, out: &mut Vec<Directive>) {
    let mut cursor = 0;
    while let Some(found) = line[cursor..].find('\\') {
        let start = cursor + found;
        match match_directive(line, start) {
            Some((kind, reference, end)) => {
                out.push(Directive {
                    kind,
                    reference,
                    line: line_no,
                    span: line_start + start..line_start + end,
                });
                cursor = end;
            }
            None => cursor = start + 1,
        }
    }
}

/// Try to read a directive whose backslash sits at `start`. Returns the
/// kind, the argument, and the byte offset one past the argument.
fn match_directive(line: &str, start: usize) -> Option<(DirectiveKind, String, usize)> {
    let rest = &line[start + 1..];
    for (keyword, kind) in KEYWORDS {
        let Some(after) = rest.strip_prefix(keyword) else {
            continue;
        };
        if !after.starts_with([' ', '\t', '"']) {
            continue;
        }
        let arg_offset = start + 1 + keyword.len();
        return scan_argument(line, arg_offset).map(|(reference, end)| (*kind, reference, end));
    }
    None
}

/// Read the directive argument starting at `offset`: a non-empty quoted
/// string, or a bare token separated from the keyword by whitespace.
fn scan_argument(line: &str, offset: usize) -> Option<(String, usize)> {
    let rest = &line[offset..];
    let ws = rest.len() - rest.trim_start_matches([' ', '\t']).len();
    let after_ws = &rest[ws..];
    if let Some(quoted) = after_ws.strip_prefix('"') {
        let close = quoted.find('"')?;
        if close == 0 {
            return None;
        }
        return Some((quoted[..close].to_string(), offset + ws + close + 2));
    }
    if ws == 0 {
        return None;
    }
    let token_len = after_ws
        .find(|c: char| c.is_whitespace() || c == '"' || c == '\\')
        .unwrap_or(after_ws.len());
    if token_len == 0 {
        return None;
    }
    Some((after_ws[..token_len].to_string(), offset + ws + token_len))
}
