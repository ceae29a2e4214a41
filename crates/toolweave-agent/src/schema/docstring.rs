//! Best-effort extraction of descriptions from a documentation block.
//!
//! Recognises Google-style argument sections:
//!
//! ```text
//! Add two integers.
//!
//! Args:
//!     a (int): first addend
//!     b (int): second addend,
//!         may be negative
//!
//! Returns:
//!     int: the sum
//! ```
//!
//! Header variants `Args`, `Arguments`, `Parameters`, `Params` and `参数`
//! are accepted, with an optional half- or full-width colon.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;

static SECTION_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(Args|Arguments|Parameters|Params|参数)\s*[:：]?$")
        .expect("section header pattern is valid")
});

/// A parsed documentation block.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DocBlock {
    /// Tool-level description.
    pub summary: String,
    /// Parameter name → description, in document order.
    pub params: IndexMap<String, String>,
}

impl DocBlock {
    pub fn parse(doc: &str) -> Self {
        let lines: Vec<&str> = doc.lines().collect();
        let header = lines
            .iter()
            .position(|line| SECTION_HEADER_RE.is_match(line.trim()));

        let Some(header) = header else {
            return DocBlock {
                summary: first_non_empty(&lines),
                params: IndexMap::new(),
            };
        };

        let summary = lines[..header]
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        DocBlock {
            summary,
            params: parse_section(&lines[header + 1..], indent_of(lines[header])),
        }
    }

    /// Description for `name`, or `""` when the block does not mention it.
    pub fn param(&self, name: &str) -> &str {
        self.params.get(name).map(String::as_str).unwrap_or("")
    }
}

/// Tool description for a documentation block.
pub fn tool_description(doc: &str) -> String {
    DocBlock::parse(doc).summary
}

/// Description of one parameter; empty when nothing matches.
pub fn param_description(doc: &str, name: &str) -> String {
    DocBlock::parse(doc).param(name).to_string()
}

fn parse_section(lines: &[&str], header_indent: usize) -> IndexMap<String, String> {
    let mut params: IndexMap<String, String> = IndexMap::new();
    // (name, indent of its line) of the entry continuations attach to
    let mut current: Option<(String, usize)> = None;

    for raw in lines {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        let indent = indent_of(raw);

        if indent <= header_indent && ends_with_colon(trimmed) {
            break;
        }

        if let Some((ref name, param_indent)) = current {
            if indent > param_indent {
                if let Some(desc) = params.get_mut(name) {
                    if !desc.is_empty() {
                        desc.push(' ');
                    }
                    desc.push_str(trimmed);
                }
                continue;
            }
        }

        current = None;
        if let Some((name, desc)) = split_param_line(trimmed) {
            if !params.contains_key(&name) {
                params.insert(name.clone(), desc);
                current = Some((name, indent));
            }
        }
    }

    params
}

/// `name (type): text` / `name: text` / `name：text` → (name, text).
fn split_param_line(line: &str) -> Option<(String, String)> {
    let name_end = line.find(|c: char| c.is_whitespace() || matches!(c, '(' | ':' | '：'))?;
    let name = &line[..name_end];
    if name.is_empty() {
        return None;
    }
    let colon = line.find([':', '：'])?;
    let colon_len = line[colon..].chars().next().map_or(1, char::len_utf8);
    let desc = line[colon + colon_len..].trim().to_string();
    Some((name.to_string(), desc))
}

fn ends_with_colon(line: &str) -> bool {
    line.ends_with(':') || line.ends_with('：')
}

fn indent_of(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

fn first_non_empty(lines: &[&str]) -> String {
    lines
        .iter()
        .map(|l| l.trim())
        .find(|l| !l.is_empty())
        .unwrap_or("")
        .to_string()
}
