//! Catalog of ready-made PostgreSQL administration queries.
//!
//! Templates are static SQL grouped by [`Category`]. The only value ever
//! substituted is the row limit; the remaining [`TemplateOptions`] switch
//! between fixed fragments of text.
//!
//! # Example
//!
//! ```
//! use pgpow::templates::{Category, Limit, TemplateOptions, lookup};
//!
//! let template = lookup(Category::Maintenance, "dead-tuples").unwrap();
//! let sql = template.render(&TemplateOptions {
//!     limit: Limit::Rows(5),
//!     ..TemplateOptions::default()
//! });
//! assert!(sql.ends_with("LIMIT 5"));
//! ```

mod activity;
mod maintenance;
mod performance;
mod statements;

use std::{fmt, str::FromStr, sync::LazyLock};

use indexmap::IndexMap;

/// Template group, mirroring the `query` subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Statements,
    Activity,
    Maintenance,
    Performance
}

impl Category {
    pub const ALL: [Category; 4] = [
        Self::Statements,
        Self::Activity,
        Self::Maintenance,
        Self::Performance
    ];

    pub fn description(&self) -> &'static str {
        match self {
            Self::Statements => "Statement statistics from pg_stat_statements",
            Self::Activity => "Queries related to database activity",
            Self::Maintenance => "Database maintenance",
            Self::Performance => "Index and cache performance"
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Statements => write!(f, "statements"),
            Self::Activity => write!(f, "activity"),
            Self::Maintenance => write!(f, "maintenance"),
            Self::Performance => write!(f, "performance")
        }
    }
}

/// Row limit requested for a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Limit {
    /// Use the template's own default.
    #[default]
    Default,
    /// No `LIMIT` clause.
    Disabled,
    Rows(u32)
}

impl FromStr for Limit {
    type Err = String;

    /// An empty value (`--limit=`) or `none` disables the limit.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("none") {
            return Ok(Self::Disabled);
        }
        s.parse::<u32>()
            .map(Self::Rows)
            .map_err(|_| format!("invalid limit '{}': expected a row count or nothing", s))
    }
}

/// Sort order offered by some templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Transaction age (`activity long-running`).
    Transaction,
    /// Query age (`activity long-running`).
    Query,
    /// Live rows (`performance index-utilization`).
    Rows,
    /// Index usage percentage (`performance index-utilization`).
    Index
}

/// Switches applied when rendering a template. Each template reads only the
/// fields that concern it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TemplateOptions {
    pub limit:                Limit,
    /// Leave out query text columns.
    pub compact:              bool,
    /// Leave out the statement text column.
    pub hide_query:           bool,
    /// Skip `*_pkey` indexes.
    pub exclude_primary_keys: bool,
    /// `Some(true)` for granted locks only, `Some(false)` for waiting ones.
    pub granted:              Option<bool>,
    pub order:                Option<SortKey>
}

/// A named query of the catalog.
#[derive(Debug, Clone)]
pub struct Template {
    pub category:      Category,
    pub name:          &'static str,
    pub summary:       &'static str,
    /// `None` when the template takes no limit at all.
    pub default_limit: Option<u32>,
    body:              fn(&TemplateOptions) -> String
}

impl Template {
    fn new(
        category: Category,
        name: &'static str,
        summary: &'static str,
        default_limit: Option<u32>,
        body: fn(&TemplateOptions) -> String
    ) -> Self {
        Self {
            category,
            name,
            summary,
            default_limit,
            body
        }
    }

    /// Limit that applies for `requested`, if any.
    pub fn effective_limit(&self, requested: Limit) -> Option<u32> {
        let default = self.default_limit?;
        match requested {
            Limit::Default => Some(default),
            Limit::Disabled => None,
            Limit::Rows(n) => Some(n)
        }
    }

    /// Produces the SQL text, without a trailing newline.
    pub fn render(&self, options: &TemplateOptions) -> String {
        let mut sql = (self.body)(options);
        if let Some(n) = self.effective_limit(options.limit) {
            sql.push_str(&format!("\nLIMIT {}", n));
        }
        sql
    }
}

static CATALOG: LazyLock<IndexMap<(Category, &'static str), Template>> = LazyLock::new(|| {
    [
        statements::templates(),
        activity::templates(),
        maintenance::templates(),
        performance::templates()
    ]
    .into_iter()
    .flatten()
    .map(|t| ((t.category, t.name), t))
    .collect()
});

/// Every template, grouped by category in declaration order.
pub fn catalog() -> impl Iterator<Item = &'static Template> {
    CATALOG.values()
}

/// Templates of one category.
pub fn by_category(category: Category) -> impl Iterator<Item = &'static Template> {
    catalog().filter(move |t| t.category == category)
}

pub fn lookup(category: Category, name: &str) -> Option<&'static Template> {
    CATALOG
        .iter()
        .find(|((c, n), _)| *c == category && *n == name)
        .map(|(_, t)| t)
}

/// Human-readable listing for `pgpow query list`.
pub fn listing() -> String {
    let mut out = String::new();
    for category in Category::ALL {
        out.push_str(&format!("{} - {}\n", category, category.description()));
        for template in by_category(category) {
            let limit = template
                .default_limit
                .map(|n| format!(" (limit {})", n))
                .unwrap_or_default();
            out.push_str(&format!("  {:<20}{}{}\n", template.name, template.summary, limit));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_parsing() {
        assert_eq!("".parse::<Limit>(), Ok(Limit::Disabled));
        assert_eq!("none".parse::<Limit>(), Ok(Limit::Disabled));
        assert_eq!("25".parse::<Limit>(), Ok(Limit::Rows(25)));
        assert!("-1".parse::<Limit>().is_err());
        assert!("ten".parse::<Limit>().is_err());
    }

    #[test]
    fn test_effective_limit() {
        let t = lookup(Category::Maintenance, "dead-tuples").unwrap();
        assert_eq!(t.effective_limit(Limit::Default), Some(30));
        assert_eq!(t.effective_limit(Limit::Disabled), None);
        assert_eq!(t.effective_limit(Limit::Rows(3)), Some(3));

        let t = lookup(Category::Performance, "cache-hit-ratio").unwrap();
        assert_eq!(t.effective_limit(Limit::Rows(3)), None);
    }

    #[test]
    fn test_catalog_keys_are_unique_and_ordered() {
        let names: Vec<_> = catalog().map(|t| (t.category, t.name)).collect();
        assert_eq!(names.len(), CATALOG.len());
        assert_eq!(names[0], (Category::Statements, "top"));
        let first_activity = names.iter().position(|(c, _)| *c == Category::Activity);
        let first_maintenance = names.iter().position(|(c, _)| *c == Category::Maintenance);
        assert!(first_activity < first_maintenance);
    }

    #[test]
    fn test_lookup_unknown() {
        assert!(lookup(Category::Activity, "nope").is_none());
    }

    #[test]
    fn test_listing_mentions_every_template() {
        let text = listing();
        for t in catalog() {
            assert!(text.contains(t.name));
        }
        assert!(text.contains("maintenance - Database maintenance"));
    }
}
