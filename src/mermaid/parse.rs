//! Line parser for the supported Mermaid subset.

use super::{generated_name, CHAIN_SEPARATOR, LABEL_MARKER};

/// How a line will be interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind {
    /// `A --> B & C --> D`
    Chain,
    /// `A -- label --> B`
    Labeled,
    /// Anything else, including the diagram-type header.
    Ignored,
}

/// A transition declared by a line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    pub name: String,
    pub from: String,
    pub to: String,
}

/// States and edges declared by one line, in the order they appear.
///
/// Names are unique within each list; the first occurrence wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedLine {
    pub states: Vec<String>,
    pub edges: Vec<Edge>,
}

impl ParsedLine {
    pub fn is_empty(&self) -> bool {
        self.states.is_empty() && self.edges.is_empty()
    }

    fn push_state(&mut self, name: &str) {
        if name.is_empty() || self.states.iter().any(|s| s == name) {
            return;
        }
        self.states.push(name.to_string());
    }

    fn push_edge(&mut self, name: String, from: &str, to: &str) {
        if name.is_empty() || from.is_empty() || to.is_empty() {
            return;
        }
        if self.edges.iter().any(|e| e.name == name) {
            return;
        }
        self.edges.push(Edge {
            name,
            from: from.to_string(),
            to: to.to_string(),
        });
    }
}

pub fn classify(line: &str) -> LineKind {
    match (line.contains(CHAIN_SEPARATOR), line.contains(LABEL_MARKER)) {
        (true, false) => LineKind::Chain,
        (true, true) => LineKind::Labeled,
        _ => LineKind::Ignored,
    }
}

/// Parse a single line. Ignored lines yield an empty result.
///
/// # Example
///
/// ```rust
/// use switchyard::mermaid::parse_line;
///
/// let parsed = parse_line("a --> b & c --> d");
/// assert_eq!(parsed.states, ["a", "b", "c", "d"]);
///
/// let names: Vec<_> = parsed.edges.iter().map(|e| e.name.as_str()).collect();
/// assert_eq!(names, ["aTob", "bTod", "aToc", "cTod"]);
/// ```
pub fn parse_line(line: &str) -> ParsedLine {
    match classify(line) {
        LineKind::Chain => parse_chain(line),
        LineKind::Labeled => parse_labeled(line),
        LineKind::Ignored => ParsedLine::default(),
    }
}

/// A chain segment: a single state or an `&`-joined fan-out group.
struct Segment<'a> {
    members: Vec<&'a str>,
    fan_out: bool,
}

impl<'a> Segment<'a> {
    fn new(raw: &'a str) -> Self {
        let fan_out = raw.contains('&');
        let members = raw
            .split('&')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .collect();
        Self { members, fan_out }
    }
}

fn parse_chain(line: &str) -> ParsedLine {
    let segments: Vec<Segment<'_>> = line.split("-->").map(Segment::new).collect();
    let mut parsed = ParsedLine::default();

    for (i, segment) in segments.iter().enumerate() {
        let prev = i.checked_sub(1).and_then(|p| segments.get(p));
        let next = segments.get(i + 1);

        if segment.fan_out {
            // A group only links when it sits between two segments.
            let neighbours = prev.zip(next);
            for &member in &segment.members {
                parsed.push_state(member);
                let Some((prev, next)) = neighbours else {
                    continue;
                };
                for &from in &prev.members {
                    parsed.push_edge(generated_name(from, member), from, member);
                }
                for &to in &next.members {
                    parsed.push_edge(generated_name(member, to), member, to);
                }
            }
            continue;
        }

        for &state in &segment.members {
            parsed.push_state(state);
            // A fan-out predecessor already linked itself to this segment.
            let Some(prev) = prev.filter(|p| !p.fan_out) else {
                continue;
            };
            for &from in &prev.members {
                parsed.push_edge(generated_name(from, state), from, state);
            }
        }
    }

    parsed
}

/// Split on `-->` and `--`, preferring the longer token at each position.
fn split_labeled(line: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut i = 0;
    let bytes = line.as_bytes();

    while i < bytes.len() {
        let rest = &line[i..];
        let token_len = if rest.starts_with("-->") {
            3
        } else if rest.starts_with("--") {
            2
        } else {
            0
        };

        if token_len > 0 {
            parts.push(&line[start..i]);
            i += token_len;
            start = i;
        } else {
            i += rest.chars().next().map_or(1, char::len_utf8);
        }
    }
    parts.push(&line[start..]);
    parts
}

fn parse_labeled(line: &str) -> ParsedLine {
    let tokens: Vec<&str> = split_labeled(line).into_iter().map(str::trim).collect();
    let mut parsed = ParsedLine::default();

    // Even positions are states, odd positions name the edge between them.
    for (i, token) in tokens.iter().enumerate() {
        if i % 2 == 0 {
            parsed.push_state(token);
            continue;
        }
        let (Some(from), Some(to)) = (tokens.get(i - 1), tokens.get(i + 1)) else {
            continue;
        };
        parsed.push_edge(token.to_string(), from, to);
    }

    parsed
}
