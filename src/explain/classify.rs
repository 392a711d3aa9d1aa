//! Per-line classification of `EXPLAIN` text.
//!
//! PostgreSQL prints a plan as an indented outline. The root starts at the
//! left margin, every other node is introduced by the `->` connector and each
//! level is indented by six more columns:
//!
//! ```text
//! Hash Join  (cost=...)
//!   Hash Cond: (w.plant_id = p.id)
//!   ->  Seq Scan on watering w  (cost=...)
//!   ->  Hash  (cost=...)
//!         ->  Seq Scan on plant p  (cost=...)
//! ```
//!
//! Lines without a connector that sit deeper than the margin are node
//! details. When the text was copied out of `psql` it is framed by a title, a
//! dashed rule and a row-count footer, and every row is shifted by one column;
//! server logs written by `auto_explain` put a `LOG:` line first and indent
//! the plan with a tab. [`Frame`] finds the margin so the same rules apply.

use std::sync::LazyLock;

use regex::Regex;

/// Columns PostgreSQL adds per plan level.
pub const INDENT_STEP: usize = 6;

const CONNECTOR: &str = "->";

/// Column header `psql` prints above the plan.
const TITLE: &str = "QUERY PLAN";

static KEY_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][^:()]*:").expect("valid regex"));

/// What a single line carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Start of a plan node. `label_start` is the byte offset of the
    /// operation label inside the line, `text` the slice from there on.
    NodeHeader {
        depth:       usize,
        label_start: usize,
        text:        &'a str
    },
    Annotation(&'a str),
    Blank,
    Unrecognized(&'a str)
}

/// Left margin of the plan block and the first line belonging to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Frame {
    pub margin:     usize,
    pub body_start: usize
}

impl Frame {
    /// Looks for a psql rule (`-----` or `---+---`) ahead of the first
    /// connector. The margin is taken from the first line that looks like a
    /// plan node, so preface lines at another indentation do not shift it.
    pub fn detect(lines: &[&str]) -> Self {
        let mut body_start = 0;
        for (i, line) in lines.iter().enumerate() {
            let trimmed = line.trim();
            if trimmed.starts_with(CONNECTOR) {
                break;
            }
            if is_rule(trimmed) {
                body_start = i + 1;
                break;
            }
        }
        let body = &lines[body_start.min(lines.len())..];
        let margin = body
            .iter()
            .find_map(|l| plan_margin(l))
            .or_else(|| {
                body.iter()
                    .find(|l| !l.trim().is_empty())
                    .map(|l| indent_of(l))
            })
            .unwrap_or(0);
        Self {
            margin,
            body_start
        }
    }
}

fn is_rule(trimmed: &str) -> bool {
    trimmed.len() >= 3 && trimmed.chars().all(|c| c == '-' || c == '+')
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// Margin implied by a node line: a root sits on it, a first-level child
/// two columns to its right.
fn plan_margin(line: &str) -> Option<usize> {
    let rest = line.trim_start();
    if rest.starts_with(CONNECTOR) {
        return Some(indent_of(line).saturating_sub(2));
    }
    (rest.starts_with(|c: char| c.is_ascii_uppercase()) && has_numeric_group(rest))
        .then(|| indent_of(line))
}

/// Classifies lines relative to a fixed left margin.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineClassifier {
    margin: usize
}

impl LineClassifier {
    pub fn new(margin: usize) -> Self {
        Self {
            margin
        }
    }

    /// Every line maps to exactly one kind; `Unrecognized` is the fallback.
    pub fn classify<'a>(&self, line: &'a str) -> LineKind<'a> {
        let rest = line.trim_start();
        if rest.trim_end().is_empty() {
            return LineKind::Blank;
        }
        let indent = line.len() - rest.len();

        if let Some(after) = rest.strip_prefix(CONNECTOR) {
            let label = after.trim_start();
            let label_start = line.len() - label.len();
            let column = line[..indent].chars().count();
            return LineKind::NodeHeader {
                depth: column.saturating_sub(self.margin) / INDENT_STEP + 1,
                label_start,
                text: label
            };
        }

        if indent == self.margin && is_root_header(rest) {
            return LineKind::NodeHeader {
                depth: 0,
                label_start: indent,
                text: rest
            };
        }

        if indent > self.margin {
            LineKind::Annotation(line)
        } else {
            LineKind::Unrecognized(line)
        }
    }
}

fn is_root_header(text: &str) -> bool {
    if !text.starts_with(|c: char| c.is_ascii_uppercase()) || text.trim_end() == TITLE {
        return false;
    }
    has_numeric_group(text) || !KEY_VALUE.is_match(text)
}

fn has_numeric_group(text: &str) -> bool {
    text.contains("(cost=") || text.contains("(actual ") || text.contains("(never executed)")
}
