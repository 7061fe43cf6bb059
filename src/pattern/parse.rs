//! Pattern component compiler.
//!
//! Turns one component source (`/users/:id`, `:tenant.example.com`, `http`)
//! into an anchored [`Regex`] plus the ordered list of group names. Group
//! captures are numbered by position; custom regexes may not introduce
//! capturing groups of their own, so capture `i + 1` always belongs to
//! `names[i]`.

use std::collections::HashMap;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use regex::Regex;

use super::ComponentResult;
use crate::error::RouterError;

/// Bytes the `url` crate percent-encodes in a path
const PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Which URL component a source describes; decides the segment separator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ComponentKind {
    Protocol,
    Hostname,
    Pathname,
}

impl ComponentKind {
    fn separator(self) -> Option<char> {
        match self {
            ComponentKind::Protocol => None,
            ComponentKind::Hostname => Some('.'),
            ComponentKind::Pathname => Some('/'),
        }
    }

    /// Regex used by `:name` groups without an explicit `(regex)`
    fn segment_regex(self) -> &'static str {
        match self {
            ComponentKind::Protocol => ".+",
            ComponentKind::Hostname => r"[^.]+",
            ComponentKind::Pathname => r"[^/]+",
        }
    }

    /// Literal text in the form a parsed URL presents it
    ///
    /// Schemes and hosts come out of `url::Url` lower-cased, paths
    /// percent-encoded.
    fn normalize_literal(self, text: &str) -> String {
        match self {
            ComponentKind::Protocol | ComponentKind::Hostname => text.to_lowercase(),
            ComponentKind::Pathname => utf8_percent_encode(text, PATH).to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Modifier {
    None,
    Optional,
    ZeroOrMore,
    OneOrMore,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Literal(String),
    Group {
        /// `None` for `(regex)` and `*` groups, which are numbered instead
        name: Option<String>,
        regex: String,
        modifier: Modifier,
        /// Separator swallowed into an optional/repeated group
        prefix: String,
    },
}

/// A compiled component: source text, anchored regex, and group names
#[derive(Debug, Clone)]
pub(crate) struct Component {
    source: String,
    regex: Regex,
    names: Vec<String>,
}

impl Component {
    pub(crate) fn compile(source: &str, kind: ComponentKind) -> Result<Self, RouterError> {
        let parts = tokenize(source, kind)?;

        let mut pattern = String::with_capacity(source.len() + 8);
        pattern.push('^');
        let mut names = Vec::new();
        let mut unnamed = 0usize;

        for part in &parts {
            match part {
                Part::Literal(text) => {
                    pattern.push_str(&regex::escape(&kind.normalize_literal(text)));
                }
                Part::Group {
                    name,
                    regex,
                    modifier,
                    prefix,
                } => {
                    let name = match name {
                        Some(name) => name.clone(),
                        None => {
                            let index = unnamed.to_string();
                            unnamed += 1;
                            index
                        }
                    };
                    names.push(name);
                    pattern.push_str(&group_regex(regex, *modifier, prefix));
                }
            }
        }
        pattern.push('$');

        let regex = Regex::new(&pattern)
            .map_err(|e| RouterError::invalid_pattern(source, e.to_string()))?;

        Ok(Self {
            source: source.to_string(),
            regex,
            names,
        })
    }

    pub(crate) fn source(&self) -> &str {
        &self.source
    }

    /// Group names in capture order (duplicates allowed)
    pub(crate) fn names(&self) -> &[String] {
        &self.names
    }

    pub(crate) fn exec(&self, input: &str) -> Option<ComponentResult> {
        let captures = self.regex.captures(input)?;
        let mut groups = HashMap::with_capacity(self.names.len());
        // Last write wins for repeated names (e.g. `/org/:id/user/:id`)
        for (i, name) in self.names.iter().enumerate() {
            if let Some(value) = captures.get(i + 1) {
                groups.insert(name.clone(), value.as_str().to_string());
            }
        }
        Some(ComponentResult {
            input: input.to_string(),
            groups,
        })
    }
}

fn group_regex(regex: &str, modifier: Modifier, prefix: &str) -> String {
    let prefix = regex::escape(prefix);
    match modifier {
        Modifier::None => format!("{prefix}({regex})"),
        Modifier::Optional => format!("(?:{prefix}({regex}))?"),
        Modifier::OneOrMore => {
            format!("(?:{prefix}((?:{regex})(?:{prefix}(?:{regex}))*))")
        }
        Modifier::ZeroOrMore => {
            format!("(?:{prefix}((?:{regex})(?:{prefix}(?:{regex}))*))?")
        }
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

fn tokenize(source: &str, kind: ComponentKind) -> Result<Vec<Part>, RouterError> {
    let mut parts: Vec<Part> = Vec::new();
    let mut literal = String::new();
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => literal.push(escaped),
                None => return Err(RouterError::invalid_pattern(source, "dangling escape")),
            },
            ':' => {
                let mut name = String::new();
                while let Some(&n) = chars.peek() {
                    if !is_name_char(n) {
                        break;
                    }
                    name.push(n);
                    chars.next();
                }
                if name.is_empty() {
                    return Err(RouterError::invalid_pattern(source, "missing group name"));
                }
                let regex = if chars.peek() == Some(&'(') {
                    chars.next();
                    read_regex(source, &mut chars)?
                } else {
                    kind.segment_regex().to_string()
                };
                let modifier = read_modifier(&mut chars);
                push_group(&mut parts, &mut literal, Some(name), regex, modifier, kind);
            }
            '(' => {
                let regex = read_regex(source, &mut chars)?;
                let modifier = read_modifier(&mut chars);
                push_group(&mut parts, &mut literal, None, regex, modifier, kind);
            }
            '*' => {
                let modifier = read_modifier(&mut chars);
                push_group(&mut parts, &mut literal, None, ".*".to_string(), modifier, kind);
            }
            ')' => return Err(RouterError::invalid_pattern(source, "unbalanced ')'")),
            '?' | '+' => {
                return Err(RouterError::invalid_pattern(
                    source,
                    format!("modifier '{}' has nothing to modify", c),
                ))
            }
            '{' | '}' => {
                return Err(RouterError::invalid_pattern(
                    source,
                    "brace groups are not supported",
                ))
            }
            other => literal.push(other),
        }
    }

    if !literal.is_empty() {
        parts.push(Part::Literal(literal));
    }
    Ok(parts)
}

fn push_group(
    parts: &mut Vec<Part>,
    literal: &mut String,
    name: Option<String>,
    regex: String,
    modifier: Modifier,
    kind: ComponentKind,
) {
    let mut prefix = String::new();
    if modifier != Modifier::None {
        if let Some(sep) = kind.separator() {
            if literal.ends_with(sep) {
                literal.pop();
                prefix.push(sep);
            }
        }
    }
    if !literal.is_empty() {
        parts.push(Part::Literal(std::mem::take(literal)));
    }
    parts.push(Part::Group {
        name,
        regex,
        modifier,
        prefix,
    });
}

fn read_modifier(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Modifier {
    let modifier = match chars.peek() {
        Some('?') => Modifier::Optional,
        Some('*') => Modifier::ZeroOrMore,
        Some('+') => Modifier::OneOrMore,
        _ => return Modifier::None,
    };
    chars.next();
    modifier
}

/// Reads a `(regex)` body; the opening parenthesis is already consumed
fn read_regex(
    source: &str,
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
) -> Result<String, RouterError> {
    let mut regex = String::new();
    let mut depth = 1usize;
    // Nesting depth of `[...]` classes; parentheses inside one are literal
    let mut class = 0usize;

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let escaped = chars
                    .next()
                    .ok_or_else(|| RouterError::invalid_pattern(source, "dangling escape"))?;
                regex.push('\\');
                regex.push(escaped);
            }
            '[' => {
                class += 1;
                regex.push(c);
                if chars.peek() == Some(&'^') {
                    regex.push('^');
                    chars.next();
                }
                // A leading `]` is a member, not the end of the class
                if chars.peek() == Some(&']') {
                    regex.push(']');
                    chars.next();
                }
            }
            ']' if class > 0 => {
                class -= 1;
                regex.push(c);
            }
            '(' | ')' if class > 0 => regex.push(c),
            '(' => {
                if chars.peek() != Some(&'?') {
                    return Err(RouterError::invalid_pattern(
                        source,
                        "custom regex must not contain capturing groups",
                    ));
                }
                depth += 1;
                regex.push(c);
            }
            ')' => {
                depth -= 1;
                if depth == 0 {
                    if regex.is_empty() {
                        return Err(RouterError::invalid_pattern(source, "empty regex group"));
                    }
                    if regex.contains("(?P<") || regex.contains("(?<") {
                        return Err(RouterError::invalid_pattern(
                            source,
                            "custom regex must not contain capturing groups",
                        ));
                    }
                    return Ok(regex);
                }
                regex.push(c);
            }
            other => regex.push(other),
        }
    }

    Err(RouterError::invalid_pattern(source, "unbalanced '('"))
}
