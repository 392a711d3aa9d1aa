//! Numeric field extraction from node headers.
//!
//! A header looks like
//!
//! ```text
//! Hash Join  (cost=1577.66..4433.51 rows=172434 width=27) (actual time=30.465..53.756 rows=195804 loops=1)
//! ```
//!
//! Each parenthesised group is located first and its fields are then read one
//! by one, so a damaged field only loses itself. Numbers are parsed with
//! [`str::parse`], which is locale independent.

use std::{ops::Range, sync::LazyLock};

use regex::Regex;

use super::types::{Actuals, CostEstimate, NodeMetrics};

static COST_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(cost=[^()]*\)").expect("valid regex"));
static ACTUAL_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(actual[^()]*\)").expect("valid regex"));
static NEVER_EXECUTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(never executed\)").expect("valid regex"));

static COST_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"cost=(?P<startup>\d+(?:\.\d+)?)\.\.(?P<total>\d+(?:\.\d+)?)").expect("valid regex")
});
static TIME_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"time=(?P<startup>\d+(?:\.\d+)?)\.\.(?P<total>\d+(?:\.\d+)?)").expect("valid regex")
});
static ROWS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\brows=(?P<v>\d+(?:\.\d+)?)").expect("valid regex"));
static WIDTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bwidth=(?P<v>\d+)").expect("valid regex"));
static LOOPS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bloops=(?P<v>\d+)").expect("valid regex"));

/// Result of reading one header.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderFields {
    /// Header with every recognised group removed, trimmed.
    pub operation:     String,
    pub metrics:       NodeMetrics,
    /// Byte offset where the first recognised group starts, if any.
    pub details_start: Option<usize>
}

/// Reads cost, row, width, time and loop figures out of a node header.
///
/// Never fails: fields whose pattern is absent or unparseable stay `None`.
pub fn extract(header: &str) -> HeaderFields {
    let mut metrics = NodeMetrics::default();
    let mut spans: Vec<Range<usize>> = Vec::with_capacity(3);

    if let Some(group) = COST_GROUP.find(header) {
        let text = group.as_str();
        metrics.cost = COST_PAIR.captures(text).and_then(|c| {
            let startup = number(c.name("startup")?.as_str())?;
            let total = number(c.name("total")?.as_str())?;
            (total >= startup).then_some(CostEstimate {
                startup,
                total
            })
        });
        metrics.plan_rows = capture(&ROWS, text);
        metrics.plan_width = capture(&WIDTH, text);
        spans.push(group.range());
    }

    if let Some(group) = ACTUAL_GROUP.find(header) {
        let text = group.as_str();
        let (startup_time_ms, total_time_ms) = TIME_PAIR
            .captures(text)
            .map(|c| {
                (
                    c.name("startup").and_then(|m| number(m.as_str())),
                    c.name("total").and_then(|m| number(m.as_str()))
                )
            })
            .unwrap_or((None, None));
        metrics.actuals = Some(Actuals {
            startup_time_ms,
            total_time_ms,
            rows: capture(&ROWS, text),
            loops: capture(&LOOPS, text)
        });
        spans.push(group.range());
    }

    if let Some(group) = NEVER_EXECUTED.find(header) {
        metrics.never_executed = true;
        spans.push(group.range());
    }

    let details_start = spans.iter().map(|s| s.start).min();
    HeaderFields {
        operation: strip(header, &mut spans),
        metrics,
        details_start
    }
}

fn number(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0)
}

fn capture<T: std::str::FromStr>(re: &Regex, text: &str) -> Option<T> {
    re.captures(text)?.name("v")?.as_str().parse().ok()
}

fn strip(header: &str, spans: &mut [Range<usize>]) -> String {
    spans.sort_by_key(|s| s.start);
    let mut out = String::with_capacity(header.len());
    let mut pos = 0;
    for span in spans.iter() {
        if span.start >= pos {
            out.push_str(&header[pos..span.start]);
            pos = span.end;
        }
    }
    out.push_str(&header[pos..]);
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
